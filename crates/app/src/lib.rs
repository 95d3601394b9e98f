//! Storefront client: API access, session handling and the order flows.

pub mod api;
pub mod config;
pub mod observability;
pub mod orders;
pub mod session;

#[cfg(test)]
mod test;
