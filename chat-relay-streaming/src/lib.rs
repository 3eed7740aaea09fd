//! # chat-relay-streaming
//!
//! Stream transcoding for chat-relay.
//!
//! This crate turns a provider's incremental output into typed transcoder
//! events. Content deltas are scanned character by character for in-band
//! markers that switch between answer text, reasoning and citations; tool-call
//! argument fragments are aggregated and dispatched once complete.
//!
//! ## Core Concepts
//!
//! - **[`TagDetector`]**: Recognizes `<think>`-style markers one character at a time
//! - **[`ModeState`]**: Routes content to the active channel and owns span ids
//! - **[`ToolCallAggregator`]**: Buffers argument fragments and invokes tools
//! - **[`Transcoder`]**: The per-request state machine combining the above
//! - **[`RelayStream`]**: Async, pull-based driver over an upstream stream
//! - **[`SseParser`]** / **[`ResponsesEventStream`]**: Decode an OpenAI Responses body
//!
//! ## Example
//!
//! ```rust
//! use chat_relay_core::UpstreamEvent;
//! use chat_relay_streaming::{RelayStreamExt, StreamResult, Transcoder};
//! use chat_relay_tools::ToolRegistry;
//! use futures::{stream, StreamExt};
//!
//! # tokio_test::block_on(async {
//! let upstream = stream::iter(vec![
//!     StreamResult::Ok(UpstreamEvent::content("<think>hmm</think>")),
//!     Ok(UpstreamEvent::content("Answer")),
//! ]);
//!
//! let events: Vec<_> = upstream
//!     .transcode(Transcoder::new(ToolRegistry::new()))
//!     .map(|e| e.unwrap().event_type())
//!     .collect()
//!     .await;
//!
//! assert_eq!(events.first(), Some(&"reasoning-start"));
//! assert_eq!(events.last(), Some(&"finish"));
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod mode;
pub mod relay_stream;
pub mod responses;
pub mod sse;
pub mod tags;
pub mod tool_calls;
pub mod transcoder;

// Re-exports
pub use config::{MarkerSet, TranscoderConfig, DEFAULT_PLACEHOLDER_TOOL_NAME, TAG_BUFFER_CEILING};
pub use error::{StreamError, StreamResult};
pub use events::TranscodeEvent;
pub use mode::{Citation, Mode, ModeState};
pub use relay_stream::{RelayState, RelayStream, RelayStreamExt};
pub use responses::{decode_payload, decode_sse_event, ResponsesEventStream};
pub use sse::{SseEvent, SseParser, SseStream};
pub use tags::{Detection, Marker, TagDetector};
pub use tool_calls::{ToolCallAggregator, ToolCallRecord};
pub use transcoder::Transcoder;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Citation, RelayStream, RelayStreamExt, ResponsesEventStream, StreamError, StreamResult,
        TranscodeEvent, Transcoder, TranscoderConfig,
    };
}
