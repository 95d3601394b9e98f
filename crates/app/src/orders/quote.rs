//! Quoting
//!
//! Turns the customer's raw choices into a priced [`OrderData`] snapshot
//! using current catalog prices.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use giftbox::{
    money,
    orders::{CategoryProductSelection, OrderData, SelectedOption},
    pricing,
};
use rusty_money::{Money, iso::Currency};
use serde_json::Value;

use crate::{api::CatalogApi, orders::errors::ComposeError};

/// Choices made while configuring a gift, before prices are attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftSelection {
    /// Product being ordered.
    pub product_id: String,

    /// Chosen variant.
    pub variant_id: String,

    /// Chosen options with their surcharges.
    pub selected_options: Vec<SelectedOption>,

    /// Custom product id to quantity.
    pub custom_quantities: BTreeMap<String, u32>,

    /// Products picked from categories.
    pub selected_category_products: Vec<CategoryProductSelection>,

    /// Chosen backgrounds.
    pub selected_background_ids: Vec<String>,

    /// Per-item customisation form.
    pub multi_item_customizations: Option<Value>,

    /// Background text/photo form.
    pub background_form_data: Option<Value>,
}

/// Price a selection against the catalog.
///
/// The product total is the variant price plus option surcharges plus
/// quantity-weighted custom products; the background total is the sum of the
/// chosen backgrounds.
///
/// # Errors
///
/// Returns an error if a catalog lookup fails or a price overflows.
#[tracing::instrument(
    name = "orders.quote",
    skip(catalog, currency, selection),
    fields(product_id = %selection.product_id, variant_id = %selection.variant_id),
    err
)]
pub async fn quote_order(
    catalog: &dyn CatalogApi,
    currency: &'static Currency,
    selection: GiftSelection,
) -> Result<OrderData, ComposeError> {
    let custom_quantities: Vec<(&str, u32)> = selection
        .custom_quantities
        .iter()
        .filter(|(_, quantity)| **quantity > 0)
        .map(|(id, quantity)| (id.as_str(), *quantity))
        .collect();

    let (_product, variant, custom_products, backgrounds) = tokio::try_join!(
        catalog.product(&selection.product_id),
        catalog.variant(&selection.variant_id),
        try_join_all(
            custom_quantities
                .iter()
                .map(|(id, _)| catalog.custom_product(id))
        ),
        try_join_all(
            selection
                .selected_background_ids
                .iter()
                .map(|id| catalog.background(id))
        ),
    )?;

    let option_prices = selection
        .selected_options
        .iter()
        .map(|option| money::to_money(option.price, currency))
        .collect::<Result<Vec<_>, _>>()?;

    let custom_lines = custom_products
        .iter()
        .zip(custom_quantities.iter().map(|(_, quantity)| *quantity))
        .map(|(product, quantity)| Ok((money::to_money(product.price, currency)?, quantity)))
        .collect::<Result<Vec<(Money<'_, Currency>, u32)>, ComposeError>>()?;

    let background_prices = backgrounds
        .iter()
        .map(|background| money::to_money(background.price, currency))
        .collect::<Result<Vec<_>, _>>()?;

    let product_total = pricing::calculate_subtotal(
        money::to_money(variant.price, currency)?,
        &option_prices,
        &custom_lines,
    )?;
    let background_total = pricing::calculate_background_total(currency, &background_prices)?;

    let product_total_price = money::to_amount(&product_total)?;
    let background_total_price = money::to_amount(&background_total)?;

    Ok(OrderData {
        product_id: selection.product_id,
        variant_id: selection.variant_id,
        selected_options: selection.selected_options,
        custom_quantities: selection.custom_quantities,
        selected_category_products: (!selection.selected_category_products.is_empty())
            .then_some(selection.selected_category_products),
        multi_item_customizations: selection.multi_item_customizations,
        product_total_price,
        selected_background_ids: selection.selected_background_ids,
        background_form_data: selection.background_form_data,
        background_total_price,
        total_price: product_total_price.saturating_add(background_total_price),
    })
}
