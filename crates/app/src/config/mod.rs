//! Client configuration module

use std::{path::PathBuf, time::Duration};

use clap::Args;
use giftbox::{
    cart::FileCartStorage,
    money::{self, AmountError},
};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{api::ApiConfig, session::SessionFile};

pub mod observability;

pub use observability::{LogFormat, LoggingConfig};

/// File the session tokens are kept in, inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Errors raised while interpreting the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured currency is not a known ISO 4217 code.
    #[error("invalid GIFTBOX_CURRENCY")]
    Currency(#[source] AmountError),

    /// The API base URL is empty.
    #[error("GIFTBOX_API_URL must not be empty")]
    EmptyApiUrl,

    /// The HTTP timeout is zero.
    #[error("GIFTBOX_HTTP_TIMEOUT_SECONDS must be greater than zero")]
    ZeroTimeout,
}

/// Giftbox client configuration, read from flags, the environment and `.env`.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the storefront REST API
    #[arg(
        long,
        env = "GIFTBOX_API_URL",
        default_value = "http://localhost:3000/api",
        global = true
    )]
    pub api_url: String,

    /// Directory holding the cart and the session
    #[arg(long, env = "GIFTBOX_DATA_DIR", default_value = ".giftbox", global = true)]
    pub data_dir: PathBuf,

    /// ISO 4217 currency prices are expressed in
    #[arg(long, env = "GIFTBOX_CURRENCY", default_value = "VND", global = true)]
    pub currency: String,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        env = "GIFTBOX_HTTP_TIMEOUT_SECONDS",
        default_value_t = 30_u64,
        global = true
    )]
    pub http_timeout_seconds: u64,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Currency`] for unknown currency codes.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        money::currency(&self.currency).map_err(ConfigError::Currency)
    }

    /// Settings for the REST client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the timeout is zero.
    pub fn api(&self) -> Result<ApiConfig, ConfigError> {
        let base_url = self.api_url.trim().trim_end_matches('/');

        if base_url.is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }

        if self.http_timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(ApiConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(self.http_timeout_seconds),
        })
    }

    /// Where the session tokens are stored.
    #[must_use]
    pub fn session_file(&self) -> SessionFile {
        SessionFile::new(self.data_dir.join(SESSION_FILE_NAME))
    }

    /// Where the cart is stored.
    #[must_use]
    pub fn cart_storage(&self) -> FileCartStorage {
        FileCartStorage::new(&self.data_dir)
    }
}
