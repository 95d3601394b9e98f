//! Order creation and lookup.

use async_trait::async_trait;
use giftbox::{
    orders::{BatchOrderRequest, BatchReceipt, CreateOrderRequest, OrderReceipt, OrderSubmissionData},
    tracking::TrackedOrder,
};
use mockall::automock;
use serde::Deserialize;

use crate::api::{ApiClient, ApiError};

/// The search endpoint answers with one order or a list of matches.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResult {
    One(Box<TrackedOrder>),
    Many(Vec<TrackedOrder>),
}

#[async_trait]
impl OrdersApi for ApiClient {
    async fn create_order(&self, order: &OrderSubmissionData) -> Result<OrderReceipt, ApiError> {
        self.post("orders", &CreateOrderRequest::pending(order)).await
    }

    async fn create_batch(&self, batch: &BatchOrderRequest) -> Result<BatchReceipt, ApiError> {
        self.post("orders/batch", batch).await
    }

    async fn search_order(&self, code: &str) -> Result<Option<TrackedOrder>, ApiError> {
        let result: Option<SearchResult> = self
            .get_with_query("orders/search", &[("code", code.trim().to_string())])
            .await
            .or_else(|error| {
                if error.is_not_found() {
                    Ok(None)
                } else {
                    Err(error)
                }
            })?;

        Ok(match result {
            Some(SearchResult::One(order)) => Some(*order),
            Some(SearchResult::Many(orders)) => orders
                .into_iter()
                .find(|order| order.order_code.eq_ignore_ascii_case(code.trim())),
            None => None,
        })
    }
}

/// Order submission and tracking.
#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Create one pending order.
    async fn create_order(&self, order: &OrderSubmissionData) -> Result<OrderReceipt, ApiError>;

    /// Create every order of a batch; the backend accepts or rejects the batch
    /// as a whole.
    async fn create_batch(&self, batch: &BatchOrderRequest) -> Result<BatchReceipt, ApiError>;

    /// Find an order by its tracking code.
    async fn search_order(&self, code: &str) -> Result<Option<TrackedOrder>, ApiError>;
}
