//! Orders

mod customer;
mod data;
pub mod submission;

pub use customer::{CustomerInfo, MissingCustomerField};
pub use data::{CategoryProductSelection, OrderData, SelectedOption};
pub use submission::{
    BatchOrderRequest, BatchPricing, BatchReceipt, CreateOrderRequest, OrderReceipt,
    OrderSubmissionData,
};
