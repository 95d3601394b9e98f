//! Giftbox
//!
//! Storefront domain for the Giftbox gifting shop: pricing and promotion
//! rules, the persisted shopping cart, order snapshots and the wire types the
//! order API expects.

pub mod cart;
pub mod catalog;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod promotions;
pub mod receipt;
pub mod shipping;
pub mod tracking;

mod serde_lenient;
