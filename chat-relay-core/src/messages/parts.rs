//! UI message types.
//!
//! These mirror the message shape the front-end chat hook posts: a role and a
//! list of typed parts. Part types the relay does not understand (tool parts,
//! step markers, ...) deserialize as [`UiPart::Unknown`] instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// End user.
    User,
    /// The model.
    Assistant,
}

/// One part of a UI message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiPart {
    /// Plain text.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },

    /// Reasoning text from a previous assistant turn.
    #[serde(rename = "reasoning")]
    Reasoning {
        /// The reasoning content.
        text: String,
    },

    /// An attached file (data URL or remote URL).
    #[serde(rename = "file")]
    File {
        /// IANA media type, e.g. `image/png`.
        #[serde(rename = "mediaType")]
        media_type: String,
        /// Original filename, if the client sent one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        /// File location.
        url: String,
    },

    /// Citation data emitted by a previous assistant turn.
    #[serde(rename = "data-citation")]
    DataCitation {
        /// The citation record.
        data: Value,
    },

    /// Any part type the relay does not convert.
    #[serde(other)]
    Unknown,
}

impl UiPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a file part.
    pub fn file(
        media_type: impl Into<String>,
        filename: Option<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::File {
            media_type: media_type.into(),
            filename,
            url: url.into(),
        }
    }

    /// Create a citation part.
    pub fn citation(data: Value) -> Self {
        Self::DataCitation { data }
    }
}

/// A chat message as sent by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMessage {
    /// Client-side message id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Message author.
    pub role: Role,
    /// Message parts, in display order.
    #[serde(default)]
    pub parts: Vec<UiPart>,
}

impl UiMessage {
    /// Create a new message without an id.
    pub fn new(role: Role, parts: Vec<UiPart>) -> Self {
        Self {
            id: None,
            role,
            parts,
        }
    }

    /// Set the message id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
