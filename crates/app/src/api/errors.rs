//! API client errors.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::session::SessionError;

/// Errors returned by the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS, ...
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}")]
    Server {
        /// Response status.
        status: StatusCode,

        /// Message extracted from the response body.
        message: Option<String>,
    },

    /// A 2xx response body did not have the expected shape.
    #[error("unexpected response from {path}")]
    Decode {
        /// Request path.
        path: String,

        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("failed to serialize request body")]
    Encode(#[source] serde_json::Error),

    /// The access token was rejected and could not be refreshed. The session
    /// has been cleared.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The session could not be persisted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Whether the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Message to show the user: the server's own message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::SessionExpired => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// Accepts `{"message": "..."}`, `{"message": ["...", ...]}` (validation
/// errors) and `{"error": "..."}`.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let message = match value.get("message") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Array(messages)) => messages
            .iter()
            .find_map(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    message
        .or_else(|| value.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_string_is_extracted() {
        assert_eq!(
            server_message(r#"{"statusCode":400,"message":"Out of stock"}"#),
            Some("Out of stock".to_string())
        );
    }

    #[test]
    fn first_validation_message_is_extracted() {
        assert_eq!(
            server_message(r#"{"message":["phone must be valid","address is required"]}"#),
            Some("phone must be valid".to_string())
        );
    }

    #[test]
    fn error_field_is_used_as_fallback() {
        assert_eq!(
            server_message(r#"{"error":"Unauthorized"}"#),
            Some("Unauthorized".to_string())
        );
    }

    #[test]
    fn non_json_body_has_no_message() {
        assert_eq!(server_message("<html>Bad gateway</html>"), None);
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn user_message_prefers_server_message() {
        let error = ApiError::Server {
            status: StatusCode::BAD_REQUEST,
            message: Some("Promotion already used".to_string()),
        };

        assert_eq!(error.user_message("Could not place order"), "Promotion already used");
    }

    #[test]
    fn user_message_falls_back() {
        let error = ApiError::Server {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };

        assert_eq!(error.user_message("Could not place order"), "Could not place order");
        assert!(!error.is_not_found());
    }
}
