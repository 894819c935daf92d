//! Error types for the Kythera KDX client.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

static NULL_PAYLOAD: Value = Value::Null;

/// Convenience alias used throughout the crate.
pub type Result<T, E = KdxError> = std::result::Result<T, E>;

/// Top-level error type. Every failure surfaced by the client is one of these.
#[derive(Error, Debug)]
pub enum KdxError {
    /// A required setting could not be resolved at construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The identity provider rejected the credentials, returned an unusable
    /// token, or the API still answered 401 after a forced refresh.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The transport could not reach the host.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// Non-2xx response, or an unclassified transport failure (`status` is `None`).
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        payload: Value,
    },

    /// A successful response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl KdxError {
    /// Build an [`KdxError::Api`] for an HTTP status with its parsed error body.
    pub fn api_status(status: u16, payload: Value) -> Self {
        Self::Api {
            message: format!("API request failed with status {}", status),
            status: Some(status),
            payload,
        }
    }

    /// HTTP status code, when the error came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Parsed error payload returned by the API (`Value::Null` otherwise).
    pub fn payload(&self) -> &Value {
        match self {
            Self::Api { payload, .. } => payload,
            _ => &NULL_PAYLOAD,
        }
    }

    /// Returns a user-friendly message for display.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Configuration(_) => {
                "Configuration error. Set KYTHERA_CLIENT_ID or pass a client id."
            }
            Self::Authentication(_) => "Sign-in failed. Check your credentials and try again.",
            Self::Connection(_) => "Network error. Check your connection.",
            Self::Timeout(_) => "The request timed out. Please try again.",
            Self::Api {
                status: Some(403), ..
            } => "Insufficient permissions for this operation.",
            Self::Api {
                status: Some(404), ..
            } => "The requested resource was not found.",
            Self::Api {
                status: Some(429), ..
            } => "Too many requests. Please wait a moment.",
            Self::Api { .. } => "The Kythera API returned an error.",
            Self::Decode(_) => "Unexpected response from the Kythera API.",
        }
    }

    /// Returns true if the caller should discard cached credentials and sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}
