//! Core tool trait and implementations.
//!
//! Tools are synchronous: the transcoder calls them inline, between two
//! upstream events. A slow tool stalls the stream for its duration.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use crate::{definition::ToolDefinition, errors::ToolError};

/// Parsed tool arguments: always a JSON object.
pub type ToolArgs = Map<String, JsonValue>;

/// Result of a tool invocation.
pub type ToolResult = Result<JsonValue, ToolError>;

/// Core trait for all tools.
///
/// # Example
///
/// ```rust
/// use chat_relay_tools::{Tool, ToolArgs, ToolDefinition, ToolResult};
/// use serde_json::json;
///
/// struct Greet;
///
/// impl Tool for Greet {
///     fn definition(&self) -> ToolDefinition {
///         ToolDefinition::new("greet", "Greet someone")
///     }
///
///     fn call(&self, args: &ToolArgs) -> ToolResult {
///         let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("World");
///         Ok(json!(format!("Hello, {name}!")))
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// Get the tool's definition.
    ///
    /// The name in the definition is the key the registry dispatches on.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with parsed arguments.
    fn call(&self, args: &ToolArgs) -> ToolResult;

    /// Get the tool name.
    fn name(&self) -> String {
        self.definition().name
    }
}

/// Type-erased shared tool.
pub type BoxedTool = Arc<dyn Tool>;

/// Deserialize a tool's argument map into a typed struct.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] if the map does not match `T`.
pub fn parse_args<T: DeserializeOwned>(args: &ToolArgs) -> Result<T, ToolError> {
    serde_json::from_value(JsonValue::Object(args.clone()))
        .map_err(|e| ToolError::invalid_args(e.to_string()))
}

/// Wrapper for closure-based tools.
///
/// # Example
///
/// ```rust
/// use chat_relay_tools::{FunctionTool, Tool};
/// use serde_json::json;
///
/// let add = FunctionTool::new("add", "Add two numbers", |args| {
///     let a = args.get("a").and_then(|v| v.as_f64()).unwrap_or(0.0);
///     let b = args.get("b").and_then(|v| v.as_f64()).unwrap_or(0.0);
///     Ok(json!(a + b))
/// });
///
/// let args = json!({"a": 1.0, "b": 2.0});
/// assert_eq!(add.call(args.as_object().unwrap()).unwrap(), json!(3.0));
/// ```
pub struct FunctionTool<F> {
    definition: ToolDefinition,
    function: F,
}

impl<F> FunctionTool<F>
where
    F: Fn(&ToolArgs) -> ToolResult + Send + Sync,
{
    /// Create a new function tool with an empty parameter schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>, function: F) -> Self {
        Self {
            definition: ToolDefinition::new(name, description),
            function,
        }
    }

    /// Create a function tool from a full definition.
    pub fn from_definition(definition: ToolDefinition, function: F) -> Self {
        Self {
            definition,
            function,
        }
    }

    /// Set the parameter schema.
    #[must_use]
    pub fn with_parameters(mut self, schema: impl Into<JsonValue>) -> Self {
        self.definition = self.definition.with_parameters(schema);
        self
    }
}

impl<F> Tool for FunctionTool<F>
where
    F: Fn(&ToolArgs) -> ToolResult + Send + Sync,
{
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn call(&self, args: &ToolArgs) -> ToolResult {
        (self.function)(args)
    }
}

impl<F> std::fmt::Debug for FunctionTool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.definition.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct WeatherArgs {
        location: String,
    }

    fn args(value: JsonValue) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_function_tool_call() {
        let tool = FunctionTool::new("shout", "Uppercase the input", |args| {
            let text = args.get("text").and_then(|v| v.as_str()).unwrap_or_default();
            Ok(json!(text.to_uppercase()))
        });

        assert_eq!(tool.name(), "shout");
        assert_eq!(tool.call(&args(json!({"text": "hi"}))).unwrap(), json!("HI"));
    }

    #[test]
    fn test_function_tool_error() {
        let tool = FunctionTool::new("fail", "Always fails", |_| Err("nope".into()));
        let err = tool.call(&ToolArgs::new()).unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }

    #[test]
    fn test_parse_args() {
        let parsed: WeatherArgs = parse_args(&args(json!({"location": "Oslo, Norway"}))).unwrap();
        assert_eq!(parsed.location, "Oslo, Norway");
    }

    #[test]
    fn test_parse_args_invalid() {
        let result: Result<WeatherArgs, _> = parse_args(&args(json!({"city": "Oslo"})));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_debug() {
        let tool = FunctionTool::new("noop", "Does nothing", |_| Ok(JsonValue::Null));
        assert!(format!("{tool:?}").contains("noop"));
    }
}
