//! Relay configuration.

use chat_relay_core::{RequestOptions, RoleCoercion};
use chat_relay_streaming::TranscoderConfig;
use serde::{Deserialize, Serialize};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gpt-5-nano";

/// System prompt for regular answers.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer concisely. \
When you rely on a source, emit it inline as \
<custom_data_citation>{\"title\": \"...\", \"url\": \"...\", \"description\": \"...\", \"number\": 1}</custom_data_citation> \
and refer to it by its number.";

/// System prompt used when reasoning is requested.
pub const DEFAULT_REASONING_SYSTEM_PROMPT: &str = "You are a helpful assistant. \
Before answering, think step by step inside <think></think> tags, then give the final answer \
outside the tags. When you rely on a source, emit it inline as \
<custom_data_citation>{\"title\": \"...\", \"url\": \"...\", \"description\": \"...\", \"number\": 1}</custom_data_citation> \
and refer to it by its number.";

/// Output protocol for the relayed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Vercel AI SDK UI message stream.
    #[default]
    Data,
    /// Raw content deltas as plain text.
    Text,
}

/// Settings for one relayed chat request.
///
/// # Example
///
/// ```rust
/// use chat_relay::{Protocol, RelayConfig};
///
/// let config: RelayConfig = serde_json::from_str(r#"{"model": "gpt-5", "search": true}"#).unwrap();
/// assert_eq!(config.model, "gpt-5");
/// assert_eq!(config.protocol, Protocol::Data);
/// assert!(config.search);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Provider model name.
    pub model: String,
    /// Output protocol.
    pub protocol: Protocol,
    /// Offer the hosted `web_search` tool.
    pub search: bool,
    /// Use the reasoning system prompt.
    pub reasoning: bool,
    /// Role policy for converted messages.
    pub role_coercion: RoleCoercion,
    /// System prompt when `reasoning` is off.
    pub system_prompt: String,
    /// System prompt when `reasoning` is on.
    pub reasoning_system_prompt: String,
    /// Transcoder settings for the data protocol.
    pub transcoder: TranscoderConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            protocol: Protocol::default(),
            search: false,
            reasoning: false,
            role_coercion: RoleCoercion::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            reasoning_system_prompt: DEFAULT_REASONING_SYSTEM_PROMPT.to_string(),
            transcoder: TranscoderConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output protocol.
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Enable or disable web search.
    #[must_use]
    pub fn with_search(mut self, search: bool) -> Self {
        self.search = search;
        self
    }

    /// Enable or disable the reasoning prompt.
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: bool) -> Self {
        self.reasoning = reasoning;
        self
    }

    /// Set the role policy.
    #[must_use]
    pub fn with_role_coercion(mut self, coercion: RoleCoercion) -> Self {
        self.role_coercion = coercion;
        self
    }

    /// Set the regular system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the reasoning system prompt.
    #[must_use]
    pub fn with_reasoning_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.reasoning_system_prompt = prompt.into();
        self
    }

    /// Set the transcoder settings.
    #[must_use]
    pub fn with_transcoder(mut self, transcoder: TranscoderConfig) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// The system prompt this config selects.
    pub fn active_system_prompt(&self) -> &str {
        if self.reasoning {
            &self.reasoning_system_prompt
        } else {
            &self.system_prompt
        }
    }

    /// Options for converting UI messages into provider input.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions::new(self.active_system_prompt()).with_role_coercion(self.role_coercion)
    }
}
