//! Receipt
//!
//! Terminal rendering of the cart and of a single order's price breakdown.

use std::io;

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartItem,
    money::{self, AmountError},
    pricing::PriceBreakdown,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be formatted.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the cart as a table followed by its grand total.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output cannot be
/// written.
pub fn write_cart(
    mut out: impl io::Write,
    items: &[CartItem],
    currency: &Currency,
) -> Result<(), ReceiptError> {
    if items.is_empty() {
        return writeln!(out, "Your cart is empty.").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record([
        "Item", "Product", "Variant", "Subtotal", "Shipping", "Discount", "Total", "Promotion",
    ]);

    let mut grand_total = 0_u64;

    for item in items {
        grand_total = grand_total.saturating_add(item.total);

        builder.push_record([
            item.id.clone(),
            item.order_data.product_id.clone(),
            item.order_data.variant_id.clone(),
            money::display(item.subtotal, currency)?,
            money::display(item.shipping_fee, currency)?,
            money::display(item.discount, currency)?,
            money::display(item.total, currency)?,
            item.applied_promotion_code.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..7), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

    write_summary_line(
        &mut out,
        &format!("Total ({} items):", items.len()),
        &money::display(grand_total, currency)?,
    )
}

/// Write the lines of a price breakdown.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output cannot be
/// written.
pub fn write_breakdown(
    mut out: impl io::Write,
    breakdown: &PriceBreakdown,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    let lines = [
        ("Products:", breakdown.product_total),
        ("Backgrounds:", breakdown.background_total),
        ("Subtotal:", breakdown.subtotal),
        ("Shipping:", breakdown.shipping_fee),
    ];

    for (label, amount) in lines {
        write_summary_line(&mut out, label, &money::display(amount, currency)?)?;
    }

    if breakdown.discount > 0 {
        write_summary_line(
            &mut out,
            "Discount:",
            &format!("-{}", money::display(breakdown.discount, currency)?),
        )?;
    }

    write_summary_line(&mut out, "Total:", &money::display(breakdown.total, currency)?)
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
) -> Result<(), ReceiptError> {
    writeln!(out, "{label:>20}  {value:>16}").map_err(|_err| ReceiptError::IO)
}
