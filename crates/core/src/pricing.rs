//! Pricing
//!
//! Pure functions deriving the numbers shown at checkout: subtotal,
//! promotion discount, shipping fee and grand total. They are recomputed on
//! every change to the order form, so none of them has side effects.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    money::{self, AmountError},
    promotions::{Promotion, PromotionRejection, PromotionType},
};

/// Errors that can occur while pricing an order.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The promotion's value cannot be applied (negative, not finite, or a
    /// percentage above 100).
    #[error("promotion {code:?} has an invalid {kind:?} value {value}")]
    InvalidPromotionValue {
        /// Promotion code.
        code: String,

        /// Promotion type.
        kind: PromotionType,

        /// Offending value.
        value: f64,
    },

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Quantity-weighted price overflowed.
    #[error("line price overflowed for quantity {0}")]
    QuantityOverflow(u32),

    /// Stored amount could not be converted.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Sum the variant price, the selected option prices and the
/// quantity-weighted custom product prices.
///
/// # Errors
///
/// - [`PricingError::QuantityOverflow`]: a quantity-weighted price overflowed.
/// - [`PricingError::Money`]: prices are in different currencies.
pub fn calculate_subtotal<'a>(
    variant_price: Money<'a, Currency>,
    option_prices: &[Money<'a, Currency>],
    custom_products: &[(Money<'a, Currency>, u32)],
) -> Result<Money<'a, Currency>, PricingError> {
    let with_options = option_prices
        .iter()
        .try_fold(variant_price, |acc, price| acc.add(*price))?;

    custom_products
        .iter()
        .try_fold(with_options, |acc, (price, quantity)| {
            Ok(acc.add(line_price(price, *quantity)?)?)
        })
}

/// Sum the prices of the selected backgrounds.
///
/// # Errors
///
/// Returns [`PricingError::Money`] when prices are in different currencies.
pub fn calculate_background_total<'a>(
    currency: &'a Currency,
    background_prices: &[Money<'a, Currency>],
) -> Result<Money<'a, Currency>, PricingError> {
    Ok(background_prices
        .iter()
        .try_fold(money::zero(currency), |acc, price| acc.add(*price))?)
}

/// Discount granted by an (already accepted) promotion on `subtotal`.
///
/// - no promotion: zero
/// - percentage: `subtotal * value / 100`, capped by `maxDiscountAmount`
/// - fixed amount: `value`
///
/// Either way the discount never exceeds the subtotal.
///
/// # Errors
///
/// - [`PricingError::InvalidPromotionValue`]: the promotion value is unusable.
/// - [`PricingError::PercentConversion`]: the percentage could not be represented.
pub fn calculate_discount<'a>(
    promotion: Option<&Promotion>,
    subtotal: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let Some(promotion) = promotion else {
        return Ok(money::zero(subtotal.currency()));
    };

    ensure_valid_value(promotion)?;

    let subtotal_minor = subtotal.to_minor_units();

    let discount_minor = match promotion.kind {
        PromotionType::Percentage => {
            let percent = Percentage::from(promotion.value / 100.0);
            let discount = percent_of_minor(&percent, subtotal_minor)?;

            match promotion.max_discount_amount {
                Some(cap) => discount.min(i64::try_from(cap).unwrap_or(i64::MAX)),
                None => discount,
            }
        }
        PromotionType::FixedAmount => fixed_minor(promotion, subtotal_minor),
    };

    Ok(Money::from_minor(
        discount_minor.clamp(0, subtotal_minor.max(0)),
        subtotal.currency(),
    ))
}

/// Grand total: `max(0, subtotal + shipping_fee - discount)`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] when amounts are in different currencies.
pub fn calculate_total<'a>(
    subtotal: Money<'a, Currency>,
    shipping_fee: Money<'a, Currency>,
    discount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = subtotal.add(shipping_fee)?.sub(discount)?;

    if total.to_minor_units() < 0 {
        return Ok(money::zero(total.currency()));
    }

    Ok(total)
}

/// Every number shown in an order summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Variant, options and custom products.
    pub product_total: u64,

    /// Selected backgrounds.
    pub background_total: u64,

    /// Product total plus background total.
    pub subtotal: u64,

    /// Selected shipping fee.
    pub shipping_fee: u64,

    /// Promotion discount.
    pub discount: u64,

    /// Amount to pay.
    pub total: u64,
}

/// Price an order from its stored component amounts.
///
/// # Errors
///
/// Propagates amount conversion and discount errors.
pub fn price_breakdown(
    currency: &Currency,
    product_total: u64,
    background_total: u64,
    shipping_fee: u64,
    promotion: Option<&Promotion>,
) -> Result<PriceBreakdown, PricingError> {
    let subtotal = money::to_money(product_total, currency)?
        .add(money::to_money(background_total, currency)?)?;

    let discount = calculate_discount(promotion, subtotal)?;
    let total = calculate_total(subtotal, money::to_money(shipping_fee, currency)?, discount)?;

    Ok(PriceBreakdown {
        product_total,
        background_total,
        subtotal: money::to_amount(&subtotal)?,
        shipping_fee,
        discount: money::to_amount(&discount)?,
        total: money::to_amount(&total)?,
    })
}

/// Live pricing state of the order form.
///
/// Holds the inputs that change as the customer configures a gift and keeps
/// at most one accepted promotion.
#[derive(Debug, Clone)]
pub struct OrderPricing<'a> {
    currency: &'a Currency,
    product_total: u64,
    background_total: u64,
    shipping_fee: u64,
    promotion: Option<Promotion>,
}

impl<'a> OrderPricing<'a> {
    /// Empty order in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            currency,
            product_total: 0,
            background_total: 0,
            shipping_fee: 0,
            promotion: None,
        }
    }

    /// Set the product total (variant, options, custom products).
    pub fn set_product_total(&mut self, amount: u64) {
        self.product_total = amount;
    }

    /// Set the background total.
    pub fn set_background_total(&mut self, amount: u64) {
        self.background_total = amount;
    }

    /// Set the selected shipping fee.
    pub fn set_shipping_fee(&mut self, amount: u64) {
        self.shipping_fee = amount;
    }

    /// Current subtotal used for promotion checks.
    pub fn subtotal(&self) -> u64 {
        self.product_total.saturating_add(self.background_total)
    }

    /// Validate and apply a promotion. A rejected promotion leaves the
    /// current selection untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`PromotionRejection`] of the first failed check.
    pub fn apply_promotion(
        &mut self,
        promotion: Promotion,
        now: Timestamp,
    ) -> Result<(), PromotionRejection> {
        promotion.validate(self.subtotal(), now)?;

        self.promotion = Some(promotion);

        Ok(())
    }

    /// Drop the applied promotion.
    pub fn remove_promotion(&mut self) {
        self.promotion = None;
    }

    /// Accepted promotion, if any.
    pub fn applied_promotion(&self) -> Option<&Promotion> {
        self.promotion.as_ref()
    }

    /// Price the current state.
    ///
    /// # Errors
    ///
    /// Propagates [`price_breakdown`] errors.
    pub fn breakdown(&self) -> Result<PriceBreakdown, PricingError> {
        price_breakdown(
            self.currency,
            self.product_total,
            self.background_total,
            self.shipping_fee,
            self.promotion.as_ref(),
        )
    }
}

fn ensure_valid_value(promotion: &Promotion) -> Result<(), PricingError> {
    let value = promotion.value;

    let out_of_range = match promotion.kind {
        PromotionType::Percentage => value > 100.0,
        PromotionType::FixedAmount => false,
    };

    if !value.is_finite() || value < 0.0 || out_of_range {
        return Err(PricingError::InvalidPromotionValue {
            code: promotion.code.clone(),
            kind: promotion.kind,
            value,
        });
    }

    Ok(())
}

/// Fixed discount in minor units, at most `subtotal_minor`. A value too large
/// to represent exceeds every subtotal.
fn fixed_minor(promotion: &Promotion, subtotal_minor: i64) -> i64 {
    Decimal::from_f64(promotion.value)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .map_or(subtotal_minor, |minor| minor.min(subtotal_minor))
}

fn line_price<'a>(
    price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::QuantityOverflow(quantity))?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Calculate a percentage of a minor unit amount, rounding half away from zero.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}
