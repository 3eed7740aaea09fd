//! # chat-relay
//!
//! Relay an OpenAI Responses API stream to a chat front-end.
//!
//! The provider's raw text deltas carry inline markers (`<think>`,
//! `<custom_data_citation>`) and interleaved tool-call fragments. chat-relay
//! demultiplexes them into typed text, reasoning, citation, and tool events,
//! executes tool calls through a [`ToolRegistry`], and encodes the result as a
//! Vercel AI SDK UI message stream.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chat_relay::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OpenAIResponsesClient::from_env()?;
//!     let messages = vec![UiMessage::new(Role::User, vec![UiPart::text("Hello!")])];
//!
//!     let mut frames = relay(&client, &messages, ToolRegistry::new(), &RelayConfig::default()).await?;
//!     while let Some(frame) = frames.next().await {
//!         print!("{}", String::from_utf8_lossy(&frame?));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`chat_relay_core`]: upstream events, UI messages, request conversion, errors
//! - [`chat_relay_tools`]: tool trait, definitions, and the dispatch registry
//! - [`chat_relay_streaming`]: SSE decoding and the stream transcoder
//! - [`chat_relay_ui`]: UI message stream and plain-text encoders
//!
//! This crate adds the HTTP client ([`client`]), relay settings ([`config`]),
//! and the [`relay()`] entry point that wires them together.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod relay;

pub use chat_relay_core::{RelayError, RelayResult, Role, RoleCoercion, UiMessage, UiPart};
pub use chat_relay_streaming::{TranscodeEvent, Transcoder, TranscoderConfig};
pub use chat_relay_tools::{Tool, ToolDefinition, ToolRegistry};
pub use client::{OpenAIResponsesClient, ResponsesBackend, ResponsesRequest, UpstreamStream};
pub use config::{Protocol, RelayConfig};
pub use relay::{build_request, relay, response_headers, FrameStream};

/// Prelude for common imports.
///
/// ```rust
/// use chat_relay::prelude::*;
///
/// let config = RelayConfig::default().with_protocol(Protocol::Text);
/// assert_eq!(config.protocol, Protocol::Text);
/// ```
pub mod prelude {
    pub use crate::client::{OpenAIResponsesClient, ResponsesBackend, ResponsesRequest};
    pub use crate::config::{Protocol, RelayConfig};
    pub use crate::relay::{relay, FrameStream};
    pub use chat_relay_core::prelude::*;
    pub use chat_relay_streaming::prelude::*;
    pub use chat_relay_tools::{FunctionTool, Tool, ToolArgs, ToolDefinition, ToolRegistry};
    pub use chat_relay_ui::{UiMessageStream, UI_MESSAGE_STREAM_HEADERS};
}
