//! Money
//!
//! Amounts travel through the cart and the order API as non-negative minor
//! units (`u64`). Arithmetic happens on [`Money`] so currency mismatches are
//! caught by `rusty_money` rather than silently added together.

use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY_CODE: &str = "VND";

/// Errors converting between stored amounts and [`Money`].
#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    /// The currency code is not an ISO 4217 code known to `rusty_money`.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),

    /// The amount does not fit the signed minor unit range used by `Money`.
    #[error("amount {0} is out of range")]
    OutOfRange(u64),

    /// A computed amount was negative where only non-negative values are valid.
    #[error("amount must not be negative, got {0}")]
    Negative(i64),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Look up an ISO currency by code, case-insensitively.
///
/// # Errors
///
/// Returns [`AmountError::UnknownCurrency`] when the code is not recognised.
pub fn currency(code: &str) -> Result<&'static Currency, AmountError> {
    iso::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| AmountError::UnknownCurrency(code.to_string()))
}

/// Wrap a stored amount in [`Money`].
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] when the amount exceeds `i64::MAX`.
pub fn to_money(amount: u64, currency: &Currency) -> Result<Money<'_, Currency>, AmountError> {
    let minor = i64::try_from(amount).map_err(|_overflow| AmountError::OutOfRange(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Unwrap [`Money`] into a stored amount.
///
/// # Errors
///
/// Returns [`AmountError::Negative`] for negative values.
pub fn to_amount(money: &Money<'_, Currency>) -> Result<u64, AmountError> {
    let minor = money.to_minor_units();

    u64::try_from(minor).map_err(|_negative| AmountError::Negative(minor))
}

/// Zero in the given currency.
pub fn zero(currency: &Currency) -> Money<'_, Currency> {
    Money::from_minor(0, currency)
}

/// Format a stored amount for display, e.g. `₫500,000`.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] when the amount exceeds `i64::MAX`.
pub fn display(amount: u64, currency: &Currency) -> Result<String, AmountError> {
    Ok(to_money(amount, currency)?.to_string())
}
