//! Provider-neutral upstream events.
//!
//! Every provider adapter decodes its native stream into [`UpstreamEvent`]s.
//! The transcoder only ever sees these three shapes (plus skipped lifecycle
//! events), which keeps it independent of any one provider's wire format.

use serde::{Deserialize, Serialize};

/// One item of the upstream generation stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpstreamEvent {
    /// Incremental model output text (may contain in-band markers).
    ContentDelta {
        /// The text fragment.
        text: String,
    },
    /// A fragment of a tool call's JSON arguments.
    ToolArgsDelta {
        /// Provider-assigned call identifier.
        call_id: String,
        /// Raw argument fragment.
        delta: String,
    },
    /// The provider finished streaming a tool call's arguments.
    ToolArgsDone {
        /// Provider-assigned call identifier.
        call_id: String,
        /// Name of the tool to invoke.
        tool_name: String,
        /// Complete argument text.
        arguments: String,
    },
    /// A lifecycle event the transcoder has no use for.
    Ignored {
        /// Provider event type, for logging.
        event_type: String,
    },
}

impl UpstreamEvent {
    /// Create a content delta.
    pub fn content(text: impl Into<String>) -> Self {
        Self::ContentDelta { text: text.into() }
    }

    /// Create a tool argument delta.
    pub fn tool_args_delta(call_id: impl Into<String>, delta: impl Into<String>) -> Self {
        Self::ToolArgsDelta {
            call_id: call_id.into(),
            delta: delta.into(),
        }
    }

    /// Create a tool arguments completion.
    pub fn tool_args_done(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self::ToolArgsDone {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments: arguments.into(),
        }
    }

    /// Create an ignored event.
    pub fn ignored(event_type: impl Into<String>) -> Self {
        Self::Ignored {
            event_type: event_type.into(),
        }
    }
}
