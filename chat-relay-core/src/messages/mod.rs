//! Chat message types.
//!
//! This module covers both ends of a chat request:
//!
//! - **UI messages**: [`UiMessage`] and [`UiPart`], as posted by the front-end client
//! - **Provider input**: [`InputMessage`] and [`InputContent`], the Responses API input items
//! - **Conversion**: [`to_provider_input`], driven by [`RequestOptions`]
//!
//! ## Example
//!
//! ```rust
//! use chat_relay_core::messages::{
//!     to_provider_input, RequestOptions, Role, RoleCoercion, UiMessage, UiPart,
//! };
//!
//! let messages = vec![
//!     UiMessage::new(Role::User, vec![UiPart::text("What's the weather in Oslo?")]),
//!     UiMessage::new(Role::Assistant, vec![UiPart::text("Let me check.")]),
//! ];
//!
//! let options = RequestOptions::new("You are helpful.").with_role_coercion(RoleCoercion::Preserve);
//! let input = to_provider_input(&messages, &options);
//!
//! assert_eq!(input[0].role, Role::System);
//! assert_eq!(input[2].role, Role::Assistant);
//! ```

pub mod parts;
pub mod request;

pub use parts::{Role, UiMessage, UiPart};
pub use request::{to_provider_input, InputContent, InputMessage, RequestOptions, RoleCoercion};
