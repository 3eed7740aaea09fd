//! # chat-relay-tools
//!
//! Tool dispatch for chat-relay.
//!
//! When the model finishes streaming a tool call, the transcoder looks the tool
//! up by name in a [`ToolRegistry`] and invokes it synchronously with the parsed
//! argument map. The result is relayed to the client as-is.
//!
//! ## Core Concepts
//!
//! - **[`Tool`]**: Trait for synchronous tools taking a JSON argument map
//! - **[`FunctionTool`]**: Build a tool from a closure
//! - **[`ToolRegistry`]**: The name → tool dispatch table
//! - **[`ToolDefinition`]**: JSON Schema tool description sent to the model
//!
//! ## Defining Tools
//!
//! ```rust
//! use chat_relay_tools::{Tool, ToolArgs, ToolDefinition, ToolRegistry, ToolResult};
//! use serde_json::json;
//!
//! struct Echo;
//!
//! impl Tool for Echo {
//!     fn definition(&self) -> ToolDefinition {
//!         ToolDefinition::new("echo", "Echo the message back")
//!     }
//!
//!     fn call(&self, args: &ToolArgs) -> ToolResult {
//!         Ok(args.get("message").cloned().unwrap_or_default())
//!     }
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(Echo);
//!
//! let args = json!({"message": "hi"});
//! let out = registry.call("echo", args.as_object().unwrap()).unwrap();
//! assert_eq!(out, json!("hi"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod definition;
pub mod errors;
pub mod registry;
pub mod tool;

// Re-export core types
pub use definition::{get_current_weather_definition, ObjectJsonSchema, ToolDefinition};
pub use errors::ToolError;
pub use registry::ToolRegistry;
pub use tool::{parse_args, BoxedTool, FunctionTool, Tool, ToolArgs, ToolResult};
