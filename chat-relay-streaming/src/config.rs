//! Transcoder configuration.

use serde::{Deserialize, Serialize};

use crate::error::{StreamError, StreamResult};
use crate::tags::Marker;

/// Maximum number of characters the tag detector buffers after a `<` before
/// giving up and passing the buffer through as content.
///
/// This is a policy choice: it must exceed the longest marker literal, and it
/// bounds how long a stray `<` can hold back output.
pub const TAG_BUFFER_CEILING: usize = 30;

/// Tool name reported in `tool-input-start` before the real name is known.
pub const DEFAULT_PLACEHOLDER_TOOL_NAME: &str = "get_current_weather";

/// The four in-band marker literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    /// Opens a reasoning span.
    pub reasoning_open: String,
    /// Closes a reasoning span.
    pub reasoning_close: String,
    /// Opens a citation block.
    pub citation_open: String,
    /// Closes a citation block.
    pub citation_close: String,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            reasoning_open: "<think>".to_string(),
            reasoning_close: "</think>".to_string(),
            citation_open: "<custom_data_citation>".to_string(),
            citation_close: "</custom_data_citation>".to_string(),
        }
    }
}

impl MarkerSet {
    /// Get the literal text of a marker.
    #[must_use]
    pub fn literal(&self, marker: Marker) -> &str {
        match marker {
            Marker::ReasoningOpen => &self.reasoning_open,
            Marker::ReasoningClose => &self.reasoning_close,
            Marker::CitationOpen => &self.citation_open,
            Marker::CitationClose => &self.citation_close,
        }
    }

    /// Find the marker whose literal equals `text` exactly.
    #[must_use]
    pub fn match_literal(&self, text: &str) -> Option<Marker> {
        Marker::ALL
            .into_iter()
            .find(|marker| self.literal(*marker) == text)
    }

    /// Check that every literal is detectable under the given ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Config`] if a literal does not start with `<`,
    /// contains a second `<`, is longer than `ceiling` characters, or
    /// duplicates another marker.
    pub fn validate(&self, ceiling: usize) -> StreamResult<()> {
        for marker in Marker::ALL {
            let literal = self.literal(marker);
            if !literal.starts_with('<') {
                return Err(StreamError::Config(format!(
                    "marker {literal:?} must start with '<'"
                )));
            }
            if literal[1..].contains('<') {
                return Err(StreamError::Config(format!(
                    "marker {literal:?} must contain exactly one '<'"
                )));
            }
            if literal.chars().count() > ceiling {
                return Err(StreamError::Config(format!(
                    "marker {literal:?} is longer than the tag buffer ceiling ({ceiling})"
                )));
            }
            if self.match_literal(literal) != Some(marker) {
                return Err(StreamError::Config(format!(
                    "marker {literal:?} is used more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for a [`Transcoder`](crate::Transcoder).
///
/// # Example
///
/// ```rust
/// use chat_relay_streaming::{TranscoderConfig, TAG_BUFFER_CEILING};
///
/// let config = TranscoderConfig::new().with_tag_buffer_ceiling(64);
/// assert_eq!(TranscoderConfig::default().tag_buffer_ceiling, TAG_BUFFER_CEILING);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    /// In-band marker literals.
    pub markers: MarkerSet,
    /// Tag buffer ceiling, in characters.
    pub tag_buffer_ceiling: usize,
    /// Name used for `tool-input-start` before the completion event names the tool.
    pub placeholder_tool_name: String,
    /// Merge consecutive deltas of one span within a single upstream event.
    ///
    /// Off by default: every content character gets its own delta.
    pub coalesce_deltas: bool,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            markers: MarkerSet::default(),
            tag_buffer_ceiling: TAG_BUFFER_CEILING,
            placeholder_tool_name: DEFAULT_PLACEHOLDER_TOOL_NAME.to_string(),
            coalesce_deltas: false,
        }
    }
}

impl TranscoderConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker literals.
    #[must_use]
    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    /// Set the tag buffer ceiling.
    #[must_use]
    pub fn with_tag_buffer_ceiling(mut self, ceiling: usize) -> Self {
        self.tag_buffer_ceiling = ceiling;
        self
    }

    /// Set the placeholder tool name.
    #[must_use]
    pub fn with_placeholder_tool_name(mut self, name: impl Into<String>) -> Self {
        self.placeholder_tool_name = name.into();
        self
    }

    /// Merge same-span deltas within each upstream event.
    #[must_use]
    pub fn with_coalesced_deltas(mut self, coalesce: bool) -> Self {
        self.coalesce_deltas = coalesce;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Config`] if a marker cannot be detected.
    pub fn validate(&self) -> StreamResult<()> {
        self.markers.validate(self.tag_buffer_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = TranscoderConfig::default();
        assert_eq!(config.tag_buffer_ceiling, 30);
        assert_eq!(config.placeholder_tool_name, "get_current_weather");
        assert_eq!(config.markers.reasoning_open, "<think>");
        assert!(!config.coalesce_deltas);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("<think>", Some(Marker::ReasoningOpen))]
    #[case("</think>", Some(Marker::ReasoningClose))]
    #[case("<custom_data_citation>", Some(Marker::CitationOpen))]
    #[case("</custom_data_citation>", Some(Marker::CitationClose))]
    #[case("<THINK>", None)]
    #[case("<think", None)]
    fn test_match_literal(#[case] text: &str, #[case] expected: Option<Marker>) {
        assert_eq!(MarkerSet::default().match_literal(text), expected);
    }

    #[test]
    fn test_ceiling_too_small() {
        let config = TranscoderConfig::new().with_tag_buffer_ceiling(10);
        assert!(matches!(config.validate(), Err(StreamError::Config(_))));
    }

    #[test]
    fn test_marker_without_angle_bracket() {
        let markers = MarkerSet {
            reasoning_open: "[think]".into(),
            ..MarkerSet::default()
        };
        assert!(markers.validate(TAG_BUFFER_CEILING).is_err());
    }

    #[test]
    fn test_duplicate_marker() {
        let markers = MarkerSet {
            reasoning_close: "<think>".into(),
            ..MarkerSet::default()
        };
        assert!(markers.validate(TAG_BUFFER_CEILING).is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TranscoderConfig =
            serde_json::from_str(r#"{"markers": {"reasoning_open": "<reason>"}}"#).unwrap();
        assert_eq!(config.markers.reasoning_open, "<reason>");
        assert_eq!(config.markers.reasoning_close, "</think>");
        assert_eq!(config.tag_buffer_ceiling, TAG_BUFFER_CEILING);
    }
}
