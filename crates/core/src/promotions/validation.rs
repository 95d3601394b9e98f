//! Promotion acceptance checks

use jiff::Timestamp;
use thiserror::Error;

use super::Promotion;

/// Reason a promotion code was not accepted. The message is shown to the
/// customer as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionRejection {
    /// The promotion has been switched off.
    #[error("this promotion is not active")]
    Inactive,

    /// The validity window has not opened yet.
    #[error("this promotion starts on {starts_at}")]
    NotStarted {
        /// Start of the validity window.
        starts_at: Timestamp,
    },

    /// The validity window has closed.
    #[error("this promotion ended on {ended_at}")]
    Expired {
        /// End of the validity window.
        ended_at: Timestamp,
    },

    /// Every redemption has been used.
    #[error("this promotion has reached its usage limit of {limit}")]
    UsageLimitReached {
        /// Maximum number of redemptions.
        limit: u32,
    },

    /// The order is too small for the promotion.
    #[error("orders must be at least {minimum} to use this promotion (current subtotal {subtotal})")]
    BelowMinimumOrder {
        /// Required minimum subtotal.
        minimum: u64,

        /// Subtotal of the order being checked.
        subtotal: u64,
    },
}

pub(super) fn validate(
    promotion: &Promotion,
    subtotal: u64,
    now: Timestamp,
) -> Result<(), PromotionRejection> {
    if !promotion.is_active {
        return Err(PromotionRejection::Inactive);
    }

    if now < promotion.start_date {
        return Err(PromotionRejection::NotStarted {
            starts_at: promotion.start_date,
        });
    }

    if let Some(ended_at) = promotion.end_date
        && now > ended_at
    {
        return Err(PromotionRejection::Expired { ended_at });
    }

    if let Some(limit) = promotion.usage_limit
        && promotion.usage_count >= limit
    {
        return Err(PromotionRejection::UsageLimitReached { limit });
    }

    if subtotal < promotion.min_order_value {
        return Err(PromotionRejection::BelowMinimumOrder {
            minimum: promotion.min_order_value,
            subtotal,
        });
    }

    Ok(())
}
