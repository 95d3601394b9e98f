//! Order Data
//!
//! Snapshot of everything a customer chose while configuring a gift.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Option picked on the product page (engraving, ribbon colour, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOption {
    /// Option name.
    pub name: String,

    /// Chosen value.
    pub value: String,

    /// Surcharge in minor units.
    #[serde(default)]
    pub price: u64,
}

/// Product chosen from a category to fill a multi-item gift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProductSelection {
    /// Category the product was picked from.
    pub category_id: String,

    /// Picked product.
    pub product_id: String,

    /// Number of units.
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// Configured product awaiting checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    /// Product being ordered.
    pub product_id: String,

    /// Chosen variant.
    pub variant_id: String,

    /// Chosen options.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,

    /// Custom product id to quantity.
    #[serde(default)]
    pub custom_quantities: BTreeMap<String, u32>,

    /// Products picked from categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_category_products: Option<Vec<CategoryProductSelection>>,

    /// Per-item customisation form, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_item_customizations: Option<serde_json::Value>,

    /// Variant, options and custom products.
    pub product_total_price: u64,

    /// Chosen backgrounds.
    #[serde(default)]
    pub selected_background_ids: Vec<String>,

    /// Background text/photo form, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_form_data: Option<serde_json::Value>,

    /// Sum of the chosen backgrounds.
    #[serde(default)]
    pub background_total_price: u64,

    /// Product total plus background total.
    pub total_price: u64,
}

impl OrderData {
    /// Custom products with a non-zero quantity, in id order.
    pub fn custom_product_quantities(&self) -> impl Iterator<Item = (&str, u32)> {
        self.custom_quantities
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(id, quantity)| (id.as_str(), *quantity))
    }

    /// Category products picked for this order.
    pub fn category_products(&self) -> &[CategoryProductSelection] {
        self.selected_category_products.as_deref().unwrap_or_default()
    }

    /// Distinct category ids referenced by the picked category products.
    pub fn category_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .category_products()
            .iter()
            .map(|selection| selection.category_id.as_str())
            .collect();

        ids.sort_unstable();
        ids.dedup();

        ids
    }
}
