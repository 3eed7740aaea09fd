//! UI protocol adapters for chat-relay.
//!
//! This crate turns transcoder output into the bytes a front-end client
//! receives:
//!
//! - **[`vercel_ai`]**: Vercel AI SDK UI message stream (SSE frames, `[DONE]` terminator)
//! - **[`text`]**: Plain-text protocol streaming raw content deltas
//!
//! # Example
//!
//! ```rust
//! use chat_relay_core::UpstreamEvent;
//! use chat_relay_streaming::{RelayStreamExt, StreamResult, Transcoder};
//! use chat_relay_tools::ToolRegistry;
//! use chat_relay_ui::UiMessageStream;
//! use futures::{stream, StreamExt};
//!
//! # tokio_test::block_on(async {
//! let upstream = stream::iter(vec![StreamResult::Ok(UpstreamEvent::content("Hello"))]);
//! let relay = upstream.transcode(Transcoder::new(ToolRegistry::new()));
//!
//! let body: Vec<u8> = UiMessageStream::new(relay)
//!     .map(|frame| frame.unwrap().to_vec())
//!     .concat()
//!     .await;
//! let body = String::from_utf8(body).unwrap();
//!
//! assert!(body.starts_with("data: {\"type\":\"text-start\""));
//! assert!(body.ends_with("data: {\"type\":\"finish\"}\n\ndata: [DONE]\n\n"));
//! # });
//! ```
//!
//! # Chunk Types
//!
//! | Category | Chunks |
//! |----------|--------|
//! | Text | `text-start`, `text-delta`, `text-end` |
//! | Reasoning | `reasoning-start`, `reasoning-delta`, `reasoning-end` |
//! | Data | `data-citation` |
//! | Tool Input | `tool-input-start`, `tool-input-delta`, `tool-input-available` |
//! | Tool Output | `tool-output-available` |
//! | Lifecycle | `finish` |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod text;
pub mod vercel_ai;

pub use text::TextStream;
pub use vercel_ai::{
    encode_event, events_to_sse, UiChunk, UiMessageStream, DONE_FRAME, UI_MESSAGE_STREAM_HEADERS,
};
