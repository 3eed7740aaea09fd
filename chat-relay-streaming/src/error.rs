//! Errors from decoding and transcoding an upstream stream.
//!
//! [`StreamError::is_recoverable`] draws the line the transcoding loop acts on:
//! recoverable errors cost one upstream item, the rest end the stream.

use thiserror::Error;

/// A failure on the upstream side of a relay.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A well-formed payload with a missing or mistyped field.
    #[error("Malformed upstream event: {0}")]
    ParseDelta(String),

    /// An SSE `data:` payload that is not JSON.
    #[error("Undecodable SSE payload: {0}")]
    ParseSse(String),

    /// JSON error while decoding one item.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport read failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The upstream connection failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The SSE buffer grew past its bound without an event boundary.
    #[error("SSE buffer overflow")]
    BufferOverflow,

    /// Rejected transcoder settings.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StreamError {
    /// True when only a single upstream item is lost.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ParseDelta(_) | Self::ParseSse(_) | Self::Json(_))
    }

    /// Wrap a transport error.
    pub fn connection<E: std::fmt::Display>(err: E) -> Self {
        Self::Connection(err.to_string())
    }
}

/// Result alias using [`StreamError`].
pub type StreamResult<T> = Result<T, StreamError>;
