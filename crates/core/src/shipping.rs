//! Shipping fees

use serde::{Deserialize, Serialize};

use crate::serde_lenient;

/// Shipping option offered by the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFee {
    /// Shipping option identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Delivery method, e.g. "express".
    pub shipping_type: String,

    /// Area the fee applies to.
    pub area: String,

    /// Human readable delivery estimate.
    #[serde(default)]
    pub estimated_delivery_time: String,

    /// Fee in minor units.
    #[serde(deserialize_with = "serde_lenient::amount")]
    pub shipping_fee: u64,

    /// Free-form remarks.
    #[serde(default)]
    pub notes_or_remarks: Option<String>,
}

/// Find the selected shipping option; `None` when nothing is selected or the
/// id is unknown.
pub fn find_shipping_fee<'a>(fees: &'a [ShippingFee], id: Option<&str>) -> Option<&'a ShippingFee> {
    let id = id?;

    fees.iter().find(|fee| fee.id == id)
}

/// Fee of the selected shipping option, zero when none applies.
pub fn shipping_fee_amount(fees: &[ShippingFee], id: Option<&str>) -> u64 {
    find_shipping_fee(fees, id).map_or(0, |fee| fee.shipping_fee)
}
