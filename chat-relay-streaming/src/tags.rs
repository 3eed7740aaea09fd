//! In-band marker detection.
//!
//! The model interleaves answer text with literal markers such as `<think>`.
//! [`TagDetector`] consumes content one character at a time and reports when a
//! marker has been recognized. Characters that might start a marker are held
//! back until they either complete one or are released as passthrough text.

use crate::config::{MarkerSet, TranscoderConfig};

/// A recognized in-band marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Start of a reasoning span (`<think>`).
    ReasoningOpen,
    /// End of a reasoning span (`</think>`).
    ReasoningClose,
    /// Start of a citation block (`<custom_data_citation>`).
    CitationOpen,
    /// End of a citation block (`</custom_data_citation>`).
    CitationClose,
}

impl Marker {
    /// All markers, in matching order.
    pub const ALL: [Marker; 4] = [
        Marker::ReasoningOpen,
        Marker::ReasoningClose,
        Marker::CitationOpen,
        Marker::CitationClose,
    ];
}

/// Result of feeding one character to the detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Not a marker candidate; route the character as content.
    NoMatch,
    /// The character was consumed into the tag buffer.
    Buffering,
    /// The buffer completed a marker.
    Matched(Marker),
    /// Buffered text that turned out not to be a marker; route it as content.
    ///
    /// The character that triggered the release is not part of the text:
    /// it is either the last character of an overflowed buffer (included) or
    /// a fresh `<` that now starts a new buffer.
    Passthrough(String),
}

/// Character-level marker detector.
///
/// # Example
///
/// ```rust
/// use chat_relay_streaming::tags::{Detection, Marker, TagDetector};
///
/// let mut detector = TagDetector::default();
/// let detections: Vec<_> = "<think>".chars().map(|c| detector.feed(c)).collect();
/// assert_eq!(detections.last(), Some(&Detection::Matched(Marker::ReasoningOpen)));
/// ```
#[derive(Debug, Clone)]
pub struct TagDetector {
    markers: MarkerSet,
    ceiling: usize,
    buffer: String,
    buffered_chars: usize,
    detecting: bool,
}

impl TagDetector {
    /// Create a detector for the given markers and ceiling.
    #[must_use]
    pub fn new(markers: MarkerSet, ceiling: usize) -> Self {
        Self {
            markers,
            ceiling,
            buffer: String::new(),
            buffered_chars: 0,
            detecting: false,
        }
    }

    /// Create a detector from a transcoder configuration.
    #[must_use]
    pub fn from_config(config: &TranscoderConfig) -> Self {
        Self::new(config.markers.clone(), config.tag_buffer_ceiling)
    }

    /// Feed a single character.
    pub fn feed(&mut self, ch: char) -> Detection {
        if !self.detecting {
            if ch == '<' {
                self.start_buffer();
                return Detection::Buffering;
            }
            return Detection::NoMatch;
        }

        if ch == '<' {
            let prefix = std::mem::take(&mut self.buffer);
            self.start_buffer();
            return Detection::Passthrough(prefix);
        }

        self.buffer.push(ch);
        self.buffered_chars += 1;

        if let Some(marker) = self.markers.match_literal(&self.buffer) {
            self.reset();
            return Detection::Matched(marker);
        }

        if self.buffered_chars > self.ceiling {
            let overflowed = std::mem::take(&mut self.buffer);
            self.reset();
            return Detection::Passthrough(overflowed);
        }

        Detection::Buffering
    }

    /// Release any pending buffer, returning the detector to idle.
    pub fn flush(&mut self) -> Option<String> {
        if !self.detecting {
            return None;
        }
        let pending = std::mem::take(&mut self.buffer);
        self.reset();
        Some(pending)
    }

    /// Whether a potential marker is being buffered.
    #[must_use]
    pub fn is_detecting(&self) -> bool {
        self.detecting
    }

    /// The currently buffered text.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    fn start_buffer(&mut self) {
        self.buffer.clear();
        self.buffer.push('<');
        self.buffered_chars = 1;
        self.detecting = true;
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.buffered_chars = 0;
        self.detecting = false;
    }
}

impl Default for TagDetector {
    fn default() -> Self {
        Self::from_config(&TranscoderConfig::default())
    }
}
