//! Cart Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{orders::OrderData, pricing::PriceBreakdown};

/// Fully configured order waiting in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Client-generated identifier.
    pub id: String,

    /// Snapshot of the customer's selections.
    pub order_data: OrderData,

    /// Shipping fee chosen for this item.
    pub shipping_fee: u64,

    /// Chosen shipping option.
    #[serde(default)]
    pub selected_shipping_id: Option<String>,

    /// Promotion code accepted for this item.
    #[serde(default)]
    pub applied_promotion_code: Option<String>,

    /// Promotion discount.
    pub discount: u64,

    /// Product plus background total.
    pub subtotal: u64,

    /// `max(0, subtotal + shipping_fee - discount)`.
    pub total: u64,

    /// When the item was added.
    pub created_at: Timestamp,
}

/// Item to add to the cart; the store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    /// Snapshot of the customer's selections.
    pub order_data: OrderData,

    /// Shipping fee chosen for this item.
    pub shipping_fee: u64,

    /// Chosen shipping option.
    pub selected_shipping_id: Option<String>,

    /// Promotion code accepted for this item.
    pub applied_promotion_code: Option<String>,

    /// Promotion discount.
    pub discount: u64,

    /// Product plus background total.
    pub subtotal: u64,

    /// Amount to pay.
    pub total: u64,
}

impl NewCartItem {
    /// Build an item from the order snapshot and its computed pricing.
    pub fn priced(
        order_data: OrderData,
        pricing: &PriceBreakdown,
        selected_shipping_id: Option<String>,
        applied_promotion_code: Option<String>,
    ) -> Self {
        Self {
            order_data,
            shipping_fee: pricing.shipping_fee,
            selected_shipping_id,
            applied_promotion_code,
            discount: pricing.discount,
            subtotal: pricing.subtotal,
            total: pricing.total,
        }
    }

    pub(crate) fn into_item(self, id: String, created_at: Timestamp) -> CartItem {
        CartItem {
            id,
            order_data: self.order_data,
            shipping_fee: self.shipping_fee,
            selected_shipping_id: self.selected_shipping_id,
            applied_promotion_code: self.applied_promotion_code,
            discount: self.discount,
            subtotal: self.subtotal,
            total: self.total,
            created_at,
        }
    }
}

impl CartItem {
    /// Pricing of this item as a breakdown.
    pub fn pricing(&self) -> PriceBreakdown {
        PriceBreakdown {
            product_total: self.order_data.product_total_price,
            background_total: self.order_data.background_total_price,
            subtotal: self.subtotal,
            shipping_fee: self.shipping_fee,
            discount: self.discount,
            total: self.total,
        }
    }
}
