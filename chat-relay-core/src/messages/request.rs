//! Conversion from UI messages to provider input items.

use serde::{Deserialize, Serialize};

use super::parts::{Role, UiMessage, UiPart};
use crate::identifier::generate_file_id;

/// Which role converted messages are sent with.
///
/// The Responses API rejects `input_text` content on assistant messages, so the
/// default flattens every turn into a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCoercion {
    /// Send every UI message as `user`.
    #[default]
    AllUser,
    /// Keep each message's own role.
    Preserve,
}

/// Options controlling [`to_provider_input`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// System prompt prepended to the conversation.
    pub system_prompt: String,
    /// Role policy for converted messages.
    #[serde(default)]
    pub role_coercion: RoleCoercion,
}

impl RequestOptions {
    /// Create options with the given system prompt and the default role policy.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            role_coercion: RoleCoercion::default(),
        }
    }

    /// Set the role policy.
    #[must_use]
    pub fn with_role_coercion(mut self, coercion: RoleCoercion) -> Self {
        self.role_coercion = coercion;
        self
    }
}

/// One content item of a provider input message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    /// Text input.
    InputText {
        /// The text.
        text: String,
    },
    /// Image input.
    InputImage {
        /// Detail level requested from the vision model.
        detail: String,
        /// Image location.
        image_url: String,
        /// Sanitized file identifier.
        file_id: String,
    },
    /// Generic file input.
    InputFile {
        /// Original filename.
        filename: String,
        /// File location.
        file_url: String,
    },
}

impl InputContent {
    /// Create a text input.
    pub fn text(text: impl Into<String>) -> Self {
        Self::InputText { text: text.into() }
    }
}

/// A provider input message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    /// Message role.
    pub role: Role,
    /// Content items.
    pub content: Vec<InputContent>,
}

/// Convert UI messages into provider input, system prompt first.
///
/// Part mapping:
/// - `text` becomes `input_text`
/// - `data-citation` becomes `input_text` holding the JSON-encoded data
/// - a PNG `file` becomes `input_image`; any other `file` becomes `input_file`
/// - everything else is dropped
#[must_use]
pub fn to_provider_input(messages: &[UiMessage], options: &RequestOptions) -> Vec<InputMessage> {
    let mut input = Vec::with_capacity(messages.len() + 1);

    input.push(InputMessage {
        role: Role::System,
        content: vec![InputContent::text(&options.system_prompt)],
    });

    for message in messages {
        let content = message.parts.iter().filter_map(convert_part).collect();

        let role = match options.role_coercion {
            RoleCoercion::AllUser => Role::User,
            RoleCoercion::Preserve => message.role,
        };

        input.push(InputMessage { role, content });
    }

    input
}

fn convert_part(part: &UiPart) -> Option<InputContent> {
    match part {
        UiPart::Text { text } => Some(InputContent::text(text)),
        UiPart::DataCitation { data } => Some(InputContent::text(data.to_string())),
        UiPart::File {
            media_type,
            filename,
            url,
        } if media_type == "image/png" => Some(InputContent::InputImage {
            detail: "auto".to_string(),
            image_url: url.clone(),
            file_id: sanitized_file_id(filename.as_deref()),
        }),
        UiPart::File { filename, url, .. } => Some(InputContent::InputFile {
            filename: filename.clone().unwrap_or_else(|| "None".to_string()),
            file_url: url.clone(),
        }),
        UiPart::Reasoning { .. } | UiPart::Unknown => None,
    }
}

fn sanitized_file_id(filename: Option<&str>) -> String {
    match filename {
        Some(name) => {
            let cleaned: String = name
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
                .collect();
            format!("file-{cleaned}")
        }
        None => generate_file_id(),
    }
}
