//! Catalog reference entities
//!
//! Read-only shapes of the catalog records an order refers to. Only the
//! fields needed to compose an order are modelled; anything else the backend
//! sends is ignored.

use serde::{Deserialize, Serialize};

use crate::serde_lenient;

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Long description.
    #[serde(default)]
    pub description: Option<String>,

    /// Primary image URL.
    #[serde(default, alias = "imageUrl", alias = "thumbnail")]
    pub image: Option<String>,
}

/// Product variant (size, colour, packaging, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Variant identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in minor units.
    #[serde(deserialize_with = "serde_lenient::amount")]
    pub price: u64,

    /// Variant image URL.
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
}

/// Card or box background printed on a gift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    /// Background identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price in minor units.
    #[serde(default, deserialize_with = "serde_lenient::amount")]
    pub price: u64,

    /// Preview image URL.
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
}

/// Add-on product a customer can put into a gift in a chosen quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProduct {
    /// Custom product identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Long description.
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price in minor units.
    #[serde(deserialize_with = "serde_lenient::amount")]
    pub price: u64,

    /// Image URL.
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
}

/// Category, optionally with the products it lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Products in the category, when the backend embeds them.
    #[serde(default)]
    pub products: Vec<CategoryProduct>,
}

/// Product listed within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProduct {
    /// Product identifier.
    #[serde(deserialize_with = "serde_lenient::id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in minor units.
    #[serde(default, deserialize_with = "serde_lenient::amount")]
    pub price: u64,

    /// Image URL.
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
}

impl Category {
    /// Find an embedded product by id.
    pub fn product(&self, id: &str) -> Option<&CategoryProduct> {
        self.products.iter().find(|product| product.id == id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_accepts_numeric_id_and_image_alias() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": 12,
            "name": "Tet hamper",
            "imageUrl": "https://cdn.example.com/tet.png",
            "stock": 4
        }))?;

        assert_eq!(product.id, "12");
        assert_eq!(product.image.as_deref(), Some("https://cdn.example.com/tet.png"));
        assert_eq!(product.description, None);

        Ok(())
    }

    #[test]
    fn category_finds_embedded_product() -> TestResult {
        let category: Category = serde_json::from_value(json!({
            "id": "c1",
            "name": "Chocolates",
            "products": [
                { "id": "p1", "name": "Dark", "price": "45000.00" },
                { "id": "p2", "name": "Milk", "price": 40000 }
            ]
        }))?;

        assert_eq!(category.product("p1").map(|p| p.price), Some(45_000));
        assert_eq!(category.product("p2").map(|p| p.price), Some(40_000));
        assert!(category.product("p3").is_none());

        Ok(())
    }
}
