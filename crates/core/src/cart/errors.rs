//! Cart errors.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading or persisting the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart file exists but could not be read.
    #[error("failed to read cart from {path}")]
    Read {
        /// Cart file.
        path: PathBuf,

        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The cart file could not be written.
    #[error("failed to write cart to {path}")]
    Write {
        /// Cart file.
        path: PathBuf,

        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The stored cart is not valid JSON for the current schema.
    #[error("stored cart is corrupt")]
    Corrupt(#[source] serde_json::Error),

    /// The cart could not be serialized.
    #[error("failed to serialize cart")]
    Serialize(#[source] serde_json::Error),

    /// Another holder of the in-memory storage panicked.
    #[error("cart storage lock was poisoned")]
    Poisoned,
}
