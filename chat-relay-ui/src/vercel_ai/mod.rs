//! Vercel AI SDK UI message stream adapter.
//!
//! This module serializes transcoder events into the
//! [Vercel AI SDK](https://sdk.vercel.ai/) UI message stream protocol.
//!
//! # Example
//!
//! ```rust
//! use chat_relay_streaming::TranscodeEvent;
//! use chat_relay_ui::vercel_ai::{UiChunk, DONE_FRAME};
//!
//! let chunk = UiChunk::from(TranscodeEvent::TextDelta {
//!     id: "t1".into(),
//!     delta: "Hello".into(),
//! });
//! assert_eq!(
//!     chunk.to_frame(),
//!     "data: {\"type\":\"text-delta\",\"id\":\"t1\",\"delta\":\"Hello\"}\n\n"
//! );
//! assert_eq!(DONE_FRAME, "data: [DONE]\n\n");
//! ```
//!
//! # Protocol Details
//!
//! Every chunk is a JSON object with a `type` field, sent as one SSE `data:`
//! line followed by a blank line:
//!
//! - **Text**: `text-start`, `text-delta`, `text-end`
//! - **Reasoning**: `reasoning-start`, `reasoning-delta`, `reasoning-end`
//! - **Citations**: `data-citation`
//! - **Tool calls**: `tool-input-start`, `tool-input-delta`, `tool-input-available`
//! - **Tool results**: `tool-output-available`
//! - **Lifecycle**: `finish`, then the literal `data: [DONE]`

mod stream;
mod types;

pub use stream::{events_to_sse, UiMessageStream, UI_MESSAGE_STREAM_HEADERS};
pub use types::{encode_event, UiChunk, DONE_FRAME};
