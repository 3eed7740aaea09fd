//! Errors raised while dispatching or running a tool.
//!
//! None of these end a relay. The transcoder logs them and moves on without
//! emitting a tool output.

use thiserror::Error;

/// Why a tool call produced no output.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under the requested name.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments did not match what the tool expects.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran and reported a failure.
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Failure bubbled up from the tool's own dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolError {
    /// Unknown tool name.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Arguments rejected by the tool.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Failure reported by the tool body.
    #[must_use]
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Whether the model, not the tool, is at fault: an unknown name or
    /// arguments that do not fit the schema.
    #[must_use]
    pub fn is_model_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidArguments(_))
    }
}

impl From<String> for ToolError {
    fn from(msg: String) -> Self {
        Self::ExecutionFailed(msg)
    }
}

impl From<&str> for ToolError {
    fn from(msg: &str) -> Self {
        Self::ExecutionFailed(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ToolError::not_found("get_stock"), "Tool not found: get_stock", true)]
    #[case(
        ToolError::invalid_args("missing location"),
        "Invalid arguments: missing location",
        true
    )]
    #[case(
        ToolError::from("weather service returned 503"),
        "Tool execution failed: weather service returned 503",
        false
    )]
    #[case(
        ToolError::from(anyhow::anyhow!("dns lookup failed")),
        "dns lookup failed",
        false
    )]
    fn test_display_and_fault(
        #[case] err: ToolError,
        #[case] message: &str,
        #[case] model_error: bool,
    ) {
        assert_eq!(err.to_string(), message);
        assert_eq!(err.is_model_error(), model_error);
    }
}
