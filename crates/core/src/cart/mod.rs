//! Cart

mod errors;
pub mod models;
pub mod storage;
mod store;

pub use errors::CartError;
pub use models::{CartItem, NewCartItem};
pub use storage::{CartStorage, FileCartStorage, MemoryCartStorage};
pub use store::{CartStore, generate_item_id};
