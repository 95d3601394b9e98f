//! Test support shared by the app crate's unit tests.

pub(crate) mod server;
