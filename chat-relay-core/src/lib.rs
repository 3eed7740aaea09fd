//! # chat-relay-core
//!
//! Core types and error handling for the chat-relay workspace.
//!
//! This crate provides the types shared by every other chat-relay crate:
//!
//! - **Upstream events**: the provider-neutral [`UpstreamEvent`] the transcoder consumes
//! - **Messages**: UI chat messages and their conversion into provider input
//! - **Errors**: [`RelayError`] and the [`RelayResult`] alias
//! - **Identifiers**: span, citation, and message id generation
//!
//! ## Example
//!
//! ```rust
//! use chat_relay_core::{
//!     messages::{to_provider_input, RequestOptions, Role, UiMessage, UiPart},
//!     UpstreamEvent,
//! };
//!
//! let messages = vec![UiMessage::new(Role::User, vec![UiPart::text("Hello!")])];
//! let input = to_provider_input(&messages, &RequestOptions::new("Be brief."));
//! assert_eq!(input.len(), 2);
//!
//! let event = UpstreamEvent::content("Hi");
//! assert_eq!(event, UpstreamEvent::ContentDelta { text: "Hi".into() });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod errors;
pub mod identifier;
pub mod messages;
pub mod upstream;

// Re-exports for convenience
pub use errors::{RelayError, RelayResult};
pub use identifier::{generate_citation_id, generate_span_id};
pub use messages::{
    to_provider_input, InputContent, InputMessage, RequestOptions, Role, RoleCoercion, UiMessage,
    UiPart,
};
pub use upstream::UpstreamEvent;

/// Prelude module for common imports.
///
/// ```rust
/// use chat_relay_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::errors::{RelayError, RelayResult};
    pub use crate::identifier::{generate_citation_id, generate_span_id};
    pub use crate::messages::{
        to_provider_input, RequestOptions, Role, RoleCoercion, UiMessage, UiPart,
    };
    pub use crate::upstream::UpstreamEvent;
}
