//! UI message stream chunk types.
//!
//! Based on: https://ai-sdk.dev/docs/ai-sdk-ui/stream-protocol
//!
//! Each chunk is one JSON object with a `type` discriminator, sent as an SSE
//! `data:` line. Only the chunk types the relay produces are modelled.

use chat_relay_streaming::{Citation, TranscodeEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `data: [DONE]` frame that terminates a UI message stream.
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// One UI message stream chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiChunk {
    /// Start of a text part.
    TextStart {
        /// Text part id.
        id: String,
    },
    /// Text content.
    TextDelta {
        /// Text part id.
        id: String,
        /// The text.
        delta: String,
    },
    /// End of a text part.
    TextEnd {
        /// Text part id.
        id: String,
    },
    /// Start of a reasoning part.
    ReasoningStart {
        /// Reasoning part id.
        id: String,
    },
    /// Reasoning content.
    ReasoningDelta {
        /// Reasoning part id.
        id: String,
        /// The text.
        delta: String,
    },
    /// End of a reasoning part.
    ReasoningEnd {
        /// Reasoning part id.
        id: String,
    },
    /// A `data-citation` custom data part.
    DataCitation {
        /// Data part id.
        id: String,
        /// Citation record.
        data: Citation,
    },
    /// A tool call started.
    #[serde(rename_all = "camelCase")]
    ToolInputStart {
        /// Tool call id.
        tool_call_id: String,
        /// Tool name.
        tool_name: String,
    },
    /// Streaming tool input.
    #[serde(rename_all = "camelCase")]
    ToolInputDelta {
        /// Tool call id.
        tool_call_id: String,
        /// Raw input fragment.
        input_text_delta: String,
    },
    /// Tool input is complete.
    #[serde(rename_all = "camelCase")]
    ToolInputAvailable {
        /// Tool call id.
        tool_call_id: String,
        /// Tool name.
        tool_name: String,
        /// Parsed input.
        input: Value,
    },
    /// Tool output.
    #[serde(rename_all = "camelCase")]
    ToolOutputAvailable {
        /// Tool call id.
        tool_call_id: String,
        /// Tool result.
        output: Value,
    },
    /// End of the message.
    Finish,
}

impl UiChunk {
    /// Get the chunk type identifier.
    #[must_use]
    pub fn chunk_type(&self) -> &'static str {
        match self {
            Self::TextStart { .. } => "text-start",
            Self::TextDelta { .. } => "text-delta",
            Self::TextEnd { .. } => "text-end",
            Self::ReasoningStart { .. } => "reasoning-start",
            Self::ReasoningDelta { .. } => "reasoning-delta",
            Self::ReasoningEnd { .. } => "reasoning-end",
            Self::DataCitation { .. } => "data-citation",
            Self::ToolInputStart { .. } => "tool-input-start",
            Self::ToolInputDelta { .. } => "tool-input-delta",
            Self::ToolInputAvailable { .. } => "tool-input-available",
            Self::ToolOutputAvailable { .. } => "tool-output-available",
            Self::Finish => "finish",
        }
    }

    /// Encode the chunk as JSON.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Encode the chunk as an SSE `data:` frame.
    #[must_use]
    pub fn to_frame(&self) -> String {
        format!("data: {}\n\n", self.encode())
    }
}

impl From<TranscodeEvent> for UiChunk {
    fn from(event: TranscodeEvent) -> Self {
        match event {
            TranscodeEvent::TextStart { id } => Self::TextStart { id },
            TranscodeEvent::TextDelta { id, delta } => Self::TextDelta { id, delta },
            TranscodeEvent::TextEnd { id } => Self::TextEnd { id },
            TranscodeEvent::ReasoningStart { id } => Self::ReasoningStart { id },
            TranscodeEvent::ReasoningDelta { id, delta } => Self::ReasoningDelta { id, delta },
            TranscodeEvent::ReasoningEnd { id } => Self::ReasoningEnd { id },
            TranscodeEvent::Citation { id, data } => Self::DataCitation { id, data },
            TranscodeEvent::ToolInputStart {
                tool_call_id,
                tool_name,
            } => Self::ToolInputStart {
                tool_call_id,
                tool_name,
            },
            TranscodeEvent::ToolInputDelta {
                tool_call_id,
                input_text_delta,
            } => Self::ToolInputDelta {
                tool_call_id,
                input_text_delta,
            },
            TranscodeEvent::ToolInputAvailable {
                tool_call_id,
                tool_name,
                input,
            } => Self::ToolInputAvailable {
                tool_call_id,
                tool_name,
                input,
            },
            TranscodeEvent::ToolOutputAvailable {
                tool_call_id,
                output,
            } => Self::ToolOutputAvailable {
                tool_call_id,
                output,
            },
            TranscodeEvent::Finish => Self::Finish,
        }
    }
}

/// Encode a transcoder event as an SSE frame.
#[must_use]
pub fn encode_event(event: TranscodeEvent) -> String {
    UiChunk::from(event).to_frame()
}
