//! Transcoder output events.
//!
//! These are protocol-neutral; `chat-relay-ui` maps them onto the UI message
//! stream wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::mode::Citation;

/// Events emitted by the transcoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscodeEvent {
    /// A text span opened.
    TextStart {
        /// Span id.
        id: String,
    },
    /// Text for the open text span.
    TextDelta {
        /// Span id.
        id: String,
        /// The text.
        delta: String,
    },
    /// A text span closed.
    TextEnd {
        /// Span id.
        id: String,
    },
    /// A reasoning span opened.
    ReasoningStart {
        /// Span id.
        id: String,
    },
    /// Text for the open reasoning span.
    ReasoningDelta {
        /// Span id.
        id: String,
        /// The text.
        delta: String,
    },
    /// A reasoning span closed.
    ReasoningEnd {
        /// Span id.
        id: String,
    },
    /// A parsed citation.
    Citation {
        /// Citation id.
        id: String,
        /// Parsed citation record.
        data: Citation,
    },
    /// A tool call started streaming its arguments.
    ToolInputStart {
        /// Provider call id.
        tool_call_id: String,
        /// Tool name (possibly a placeholder).
        tool_name: String,
    },
    /// A raw argument fragment.
    ToolInputDelta {
        /// Provider call id.
        tool_call_id: String,
        /// The fragment, unparsed.
        input_text_delta: String,
    },
    /// The complete, parsed tool input.
    ToolInputAvailable {
        /// Provider call id.
        tool_call_id: String,
        /// Tool name.
        tool_name: String,
        /// Parsed arguments.
        input: JsonValue,
    },
    /// The tool's result.
    ToolOutputAvailable {
        /// Provider call id.
        tool_call_id: String,
        /// Tool result.
        output: JsonValue,
    },
    /// The response finished.
    Finish,
}

impl TranscodeEvent {
    /// The UI message stream `type` for this event.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TextStart { .. } => "text-start",
            Self::TextDelta { .. } => "text-delta",
            Self::TextEnd { .. } => "text-end",
            Self::ReasoningStart { .. } => "reasoning-start",
            Self::ReasoningDelta { .. } => "reasoning-delta",
            Self::ReasoningEnd { .. } => "reasoning-end",
            Self::Citation { .. } => "data-citation",
            Self::ToolInputStart { .. } => "tool-input-start",
            Self::ToolInputDelta { .. } => "tool-input-delta",
            Self::ToolInputAvailable { .. } => "tool-input-available",
            Self::ToolOutputAvailable { .. } => "tool-output-available",
            Self::Finish => "finish",
        }
    }

    /// The span id, for span events.
    #[must_use]
    pub fn span_id(&self) -> Option<&str> {
        match self {
            Self::TextStart { id }
            | Self::TextDelta { id, .. }
            | Self::TextEnd { id }
            | Self::ReasoningStart { id }
            | Self::ReasoningDelta { id, .. }
            | Self::ReasoningEnd { id } => Some(id),
            _ => None,
        }
    }

    /// The tool call id, for tool events.
    #[must_use]
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Self::ToolInputStart { tool_call_id, .. }
            | Self::ToolInputDelta { tool_call_id, .. }
            | Self::ToolInputAvailable { tool_call_id, .. }
            | Self::ToolOutputAvailable { tool_call_id, .. } => Some(tool_call_id),
            _ => None,
        }
    }

    /// Append `next` to this event if both are deltas of the same span.
    ///
    /// Returns `next` back if it could not be merged.
    pub(crate) fn try_merge(&mut self, next: TranscodeEvent) -> Option<TranscodeEvent> {
        match (self, next) {
            (Self::TextDelta { id, delta }, Self::TextDelta { id: next_id, delta: more })
            | (
                Self::ReasoningDelta { id, delta },
                Self::ReasoningDelta {
                    id: next_id,
                    delta: more,
                },
            ) if *id == next_id => {
                delta.push_str(&more);
                None
            }
            (_, next) => Some(next),
        }
    }
}

impl fmt::Display for TranscodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextDelta { delta, .. } | Self::ReasoningDelta { delta, .. } => {
                write!(f, "{}({delta:?})", self.event_type())
            }
            Self::ToolInputStart { tool_name, .. } => {
                write!(f, "{}({tool_name})", self.event_type())
            }
            Self::ToolInputDelta {
                input_text_delta, ..
            } => write!(f, "{}({input_text_delta:?})", self.event_type()),
            Self::ToolInputAvailable { input, .. } => {
                write!(f, "{}({input})", self.event_type())
            }
            Self::ToolOutputAvailable { output, .. } => {
                write!(f, "{}({output})", self.event_type())
            }
            Self::Citation { data, .. } => write!(f, "{}({})", self.event_type(), data.number),
            _ => f.write_str(self.event_type()),
        }
    }
}
