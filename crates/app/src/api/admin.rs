//! Admin CRUD
//!
//! Back-office entities are edited as plain JSON: the CLI passes through
//! whatever fields the backend accepts for each resource.

use std::fmt;

use serde_json::Value;

use crate::api::{ApiClient, ApiError};

/// Back-office resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AdminResource {
    /// Stock levels.
    Inventory,

    /// Catalog products.
    Products,

    /// Product categories.
    Categories,

    /// Staff roles.
    Roles,

    /// Role permissions.
    Permissions,

    /// Staff accounts.
    Users,

    /// Shipping options.
    ShippingFees,

    /// Promotion codes.
    Promotions,
}

impl AdminResource {
    /// Collection path under the API base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Roles => "roles",
            Self::Permissions => "permissions",
            Self::Users => "users",
            Self::ShippingFees => "shipping-fees",
            Self::Promotions => "promotions",
        }
    }
}

impl fmt::Display for AdminResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Paging and search for list requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// One-based page number.
    pub page: Option<u32>,

    /// Page size.
    pub limit: Option<u32>,

    /// Free-text filter.
    pub search: Option<String>,
}

impl ListQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("page", self.page.map(|page| page.to_string())),
            ("limit", self.limit.map(|limit| limit.to_string())),
            ("search", self.search.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

/// CRUD client for one back-office resource.
#[derive(Debug, Clone, Copy)]
pub struct AdminClient<'a> {
    api: &'a ApiClient,
    resource: AdminResource,
}

impl<'a> AdminClient<'a> {
    /// Client for `resource`.
    pub fn new(api: &'a ApiClient, resource: AdminResource) -> Self {
        Self { api, resource }
    }

    /// List records.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    #[tracing::instrument(name = "api.admin.list", skip(self), fields(resource = %self.resource), err)]
    pub async fn list(&self, query: &ListQuery) -> Result<Value, ApiError> {
        self.api
            .get_with_query(self.resource.path(), &query.pairs())
            .await
    }

    /// Retrieve one record.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    #[tracing::instrument(name = "api.admin.get", skip(self), fields(resource = %self.resource), err)]
    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.api.get(&self.item_path(id)).await
    }

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    #[tracing::instrument(name = "api.admin.create", skip(self, record), fields(resource = %self.resource), err)]
    pub async fn create(&self, record: &Value) -> Result<Value, ApiError> {
        self.api.post(self.resource.path(), record).await
    }

    /// Update the given fields of a record.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    #[tracing::instrument(name = "api.admin.update", skip(self, changes), fields(resource = %self.resource), err)]
    pub async fn update(&self, id: &str, changes: &Value) -> Result<Value, ApiError> {
        self.api.patch(&self.item_path(id), changes).await
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    #[tracing::instrument(name = "api.admin.delete", skip(self), fields(resource = %self.resource), err)]
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .delete::<Value>(&self.item_path(id))
            .await
            .map(|_deleted| ())
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.resource.path(), id.trim())
    }
}
