//! Cart, checkout and tracking flows built on the storefront API.

pub mod checkout;
pub mod compose;
mod errors;
pub mod quote;
pub mod tracking;

pub use checkout::{AddToCart, BatchCheckout, CheckoutService};
pub use compose::{SubmissionContext, compose_order};
pub use errors::{CheckoutError, ComposeError, ORDER_FAILED_MESSAGE};
pub use quote::{GiftSelection, quote_order};
pub use tracking::{TrackingError, track_order, write_progress};
