//! Storefront REST API

pub mod admin;
mod auth;
pub mod catalog;
mod client;
pub mod consultations;
mod errors;
pub mod orders;

pub use admin::{AdminClient, AdminResource, ListQuery};
pub use catalog::{CatalogApi, MockCatalogApi};
pub use client::{ApiClient, ApiConfig};
pub use consultations::ConsultationRequest;
pub use errors::ApiError;
pub use orders::{MockOrdersApi, OrdersApi};
