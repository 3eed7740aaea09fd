//! Error types for chat-relay.
//!
//! Only failures that end a relay surface through [`RelayError`]. Faults inside a
//! single upstream item are recovered by the transcoder and never reach this type.

use thiserror::Error;

/// The main error type for chat-relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Missing or invalid configuration (API key, base URL, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the provider.
        body: String,
    },

    /// Transport-level failure talking to the provider.
    #[error("HTTP error: {message}")]
    Http {
        /// Error message.
        message: String,
        /// Whether the request timed out.
        is_timeout: bool,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelayError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API status error.
    #[must_use]
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error.
    #[must_use]
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http {
            message: msg.into(),
            is_timeout: false,
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Http {
            message: msg.into(),
            is_timeout: true,
        }
    }

    /// Whether the caller could reasonably retry the whole request.
    ///
    /// The relay itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Http { .. } => true,
            Self::Config(_) | Self::Json(_) => false,
        }
    }
}

/// Result type alias using [`RelayError`].
pub type RelayResult<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = RelayError::api(401, "invalid api key");
        assert_eq!(err.to_string(), "API error (status 401): invalid api key");
    }

    #[test]
    fn test_retryable() {
        assert!(RelayError::api(429, "slow down").is_retryable());
        assert!(RelayError::api(503, "unavailable").is_retryable());
        assert!(!RelayError::api(400, "bad request").is_retryable());
        assert!(RelayError::timeout("30s").is_retryable());
        assert!(!RelayError::config("missing OPENAI_API_KEY").is_retryable());
    }

    #[test]
    fn test_json_from() {
        let err: RelayError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, RelayError::Json(_)));
    }
}
