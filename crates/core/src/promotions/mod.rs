//! Promotions
//!
//! Discount codes fetched from the backend. A promotion is only ever applied
//! after [`Promotion::validate`] accepts it for the current order subtotal.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::serde_lenient;

mod validation;

pub use validation::PromotionRejection;

/// How a promotion's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionType {
    /// `value` is a percentage of the subtotal, optionally capped.
    Percentage,

    /// `value` is an amount in minor units taken off the subtotal.
    FixedAmount,
}

impl PromotionType {
    /// Wire name of the promotion type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "PERCENTAGE",
            Self::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

/// Discount code with validity window and usage constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Promotion identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Code the customer types at checkout.
    #[serde(default)]
    pub code: String,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Percentage or fixed amount.
    #[serde(rename = "type")]
    pub kind: PromotionType,

    /// Percentage points or minor units, depending on `kind`.
    #[serde(deserialize_with = "serde_lenient::float")]
    pub value: f64,

    /// Smallest subtotal the promotion applies to.
    #[serde(default, deserialize_with = "serde_lenient::amount")]
    pub min_order_value: u64,

    /// Upper bound on a percentage discount.
    #[serde(default, deserialize_with = "serde_lenient::optional_amount")]
    pub max_discount_amount: Option<u64>,

    /// First instant the promotion is valid.
    pub start_date: Timestamp,

    /// Last instant the promotion is valid; open-ended when absent.
    #[serde(default)]
    pub end_date: Option<Timestamp>,

    /// Maximum number of redemptions; unlimited when absent.
    #[serde(default)]
    pub usage_limit: Option<u32>,

    /// Redemptions so far.
    #[serde(default)]
    pub usage_count: u32,

    /// Admin on/off switch.
    pub is_active: bool,
}

impl Promotion {
    /// Check whether the promotion can be applied to an order with the given
    /// subtotal at `now`.
    ///
    /// Checks run in a fixed order and the first failure is reported: active
    /// flag, start date, end date, usage limit, minimum order value.
    ///
    /// # Errors
    ///
    /// Returns the [`PromotionRejection`] describing the first failed check.
    pub fn validate(&self, subtotal: u64, now: Timestamp) -> Result<(), PromotionRejection> {
        validation::validate(self, subtotal, now)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn deserializes_backend_payload() -> TestResult {
        let promotion: Promotion = serde_json::from_value(json!({
            "id": 3,
            "code": "TET10",
            "type": "PERCENTAGE",
            "value": "10.00",
            "minOrderValue": "200000.00",
            "maxDiscountAmount": 40000,
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": null,
            "usageLimit": 100,
            "usageCount": 12,
            "isActive": true
        }))?;

        assert_eq!(promotion.id, "3");
        assert_eq!(promotion.kind, PromotionType::Percentage);
        assert!((promotion.value - 10.0).abs() < f64::EPSILON);
        assert_eq!(promotion.min_order_value, 200_000);
        assert_eq!(promotion.max_discount_amount, Some(40_000));
        assert_eq!(promotion.end_date, None);
        assert_eq!(promotion.usage_limit, Some(100));

        Ok(())
    }

    #[test]
    fn promotion_type_wire_names() -> TestResult {
        assert_eq!(PromotionType::Percentage.as_str(), "PERCENTAGE");
        assert_eq!(
            serde_json::to_value(PromotionType::FixedAmount)?,
            json!("FIXED_AMOUNT")
        );

        Ok(())
    }
}
