//! Catalog, shipping and promotion lookups.

use async_trait::async_trait;
use giftbox::{
    catalog::{Background, Category, CustomProduct, Product, Variant},
    promotions::Promotion,
    shipping::ShippingFee,
};
use mockall::automock;

use crate::api::{ApiClient, ApiError};

#[async_trait]
impl CatalogApi for ApiClient {
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("products").await
    }

    async fn product(&self, id: &str) -> Result<Product, ApiError> {
        self.get(&format!("products/{id}")).await
    }

    async fn variant(&self, id: &str) -> Result<Variant, ApiError> {
        self.get(&format!("variants/{id}")).await
    }

    async fn background(&self, id: &str) -> Result<Background, ApiError> {
        self.get(&format!("backgrounds/{id}")).await
    }

    async fn custom_product(&self, id: &str) -> Result<CustomProduct, ApiError> {
        self.get(&format!("custom-products/{id}")).await
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("categories").await
    }

    async fn category(&self, id: &str) -> Result<Category, ApiError> {
        self.get(&format!("categories/{id}")).await
    }

    async fn shipping_fees(&self) -> Result<Vec<ShippingFee>, ApiError> {
        self.get("shipping-fees").await
    }

    async fn promotion_by_code(&self, code: &str) -> Result<Promotion, ApiError> {
        self.get(&format!("promotions/code/{}", code.trim())).await
    }
}

/// Read access to the storefront catalog.
#[automock]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List products.
    async fn products(&self) -> Result<Vec<Product>, ApiError>;

    /// Retrieve a single product.
    async fn product(&self, id: &str) -> Result<Product, ApiError>;

    /// Retrieve a single variant.
    async fn variant(&self, id: &str) -> Result<Variant, ApiError>;

    /// Retrieve a single background.
    async fn background(&self, id: &str) -> Result<Background, ApiError>;

    /// Retrieve a single custom product.
    async fn custom_product(&self, id: &str) -> Result<CustomProduct, ApiError>;

    /// List categories.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Retrieve a category with its products.
    async fn category(&self, id: &str) -> Result<Category, ApiError>;

    /// List shipping options.
    async fn shipping_fees(&self) -> Result<Vec<ShippingFee>, ApiError>;

    /// Look up a promotion by the code the customer typed.
    async fn promotion_by_code(&self, code: &str) -> Result<Promotion, ApiError>;
}
