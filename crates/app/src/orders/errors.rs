//! Order flow errors.

use giftbox::{
    cart::CartError,
    money::AmountError,
    orders::MissingCustomerField,
    pricing::PricingError,
    promotions::PromotionRejection,
};
use thiserror::Error;

use crate::api::ApiError;

/// Message shown when an order submission fails without a server message.
pub const ORDER_FAILED_MESSAGE: &str = "Could not place order";

/// Errors raised while pricing or composing an order from catalog data.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A catalog lookup failed.
    #[error("failed to load catalog data")]
    Api(#[from] ApiError),

    /// The picked product is not listed in its category.
    #[error("product {product_id} is not listed in category {category_id}")]
    UnknownCategoryProduct {
        /// Category the product was picked from.
        category_id: String,

        /// Picked product.
        product_id: String,
    },

    /// A quantity-weighted line price overflowed.
    #[error("line price for {id} overflowed at quantity {quantity}")]
    LineOverflow {
        /// Item identifier.
        id: String,

        /// Ordered quantity.
        quantity: u32,
    },

    /// Price arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// An amount could not be converted.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Errors raised by the cart and checkout flows.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart holds nothing to check out.
    #[error("your cart is empty")]
    EmptyCart,

    /// No cart item has this id.
    #[error("cart item {0} not found")]
    ItemNotFound(String),

    /// The selected shipping option does not exist.
    #[error("shipping option {0} not found")]
    UnknownShipping(String),

    /// No promotion has this code.
    #[error("promotion code {0} not found")]
    UnknownPromotion(String),

    /// The promotion cannot be used for this order.
    #[error(transparent)]
    Promotion(#[from] PromotionRejection),

    /// Customer details are incomplete.
    #[error(transparent)]
    Customer(#[from] MissingCustomerField),

    /// Pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Catalog data could not be gathered.
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// A lookup needed before submission failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend refused the order. The cart is left untouched.
    #[error("order submission failed")]
    Submit(#[source] ApiError),

    /// The cart could not be read or written.
    #[error(transparent)]
    Cart(#[from] CartError),
}

impl CheckoutError {
    /// Message to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Submit(error) => error.user_message(ORDER_FAILED_MESSAGE),
            Self::Api(error) | Self::Compose(ComposeError::Api(error)) => {
                error.user_message(&self.to_string())
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn failed_submission_uses_order_fallback() {
        let error = CheckoutError::Submit(ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        });

        assert_eq!(error.user_message(), "Could not place order");
    }

    #[test]
    fn rejected_promotion_explains_itself() {
        let error = CheckoutError::from(PromotionRejection::UsageLimitReached { limit: 100 });

        assert_eq!(
            error.user_message(),
            "this promotion has reached its usage limit of 100"
        );
    }

    #[test]
    fn lookup_failure_prefers_server_message() {
        let error = CheckoutError::Compose(ComposeError::Api(ApiError::Server {
            status: StatusCode::NOT_FOUND,
            message: Some("Variant not found".to_string()),
        }));

        assert_eq!(error.user_message(), "Variant not found");
    }
}
