//! The mode state machine.
//!
//! [`ModeState`] owns the current output channel and the ids of the open spans.
//! Each detector result is turned into zero or more [`TranscodeEvent`]s by
//! [`ModeState::advance`]. At most one of the text and reasoning spans is open
//! at any time.

use chat_relay_core::{generate_citation_id, generate_span_id};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::config::MarkerSet;
use crate::events::TranscodeEvent;
use crate::tags::{Detection, Marker};

/// The channel content is currently routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Answer text.
    #[default]
    Text,
    /// Reasoning text.
    Reasoning,
    /// Inside a citation block; content is buffered.
    Citation,
}

/// A citation record embedded in the model output.
///
/// The four named fields are required. Any other keys the model adds are
/// kept in `extra` and serialized back alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Title of the cited source.
    pub title: String,
    /// URL of the cited source.
    pub url: String,
    /// Short description of the source.
    pub description: String,
    /// Citation number as referenced in the answer, as the model wrote it.
    pub number: JsonValue,
    /// Additional keys.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Citation {
    /// Citation with no extra keys.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        number: impl Into<JsonValue>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
            number: number.into(),
            extra: Map::new(),
        }
    }

    /// Parse the raw text collected between the citation markers.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the trimmed text is not a citation record.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw.trim())
    }
}

/// Mode and span state for one response.
#[derive(Debug, Clone)]
pub struct ModeState {
    markers: MarkerSet,
    mode: Mode,
    text_span: Option<String>,
    reasoning_span: Option<String>,
    citation_buffer: String,
}

impl ModeState {
    /// Create a new state in text mode with no open spans.
    #[must_use]
    pub fn new(markers: MarkerSet) -> Self {
        Self {
            markers,
            mode: Mode::Text,
            text_span: None,
            reasoning_span: None,
            citation_buffer: String::new(),
        }
    }

    /// The current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Id of the open text span, if any.
    #[must_use]
    pub fn text_span(&self) -> Option<&str> {
        self.text_span.as_deref()
    }

    /// Id of the open reasoning span, if any.
    #[must_use]
    pub fn reasoning_span(&self) -> Option<&str> {
        self.reasoning_span.as_deref()
    }

    /// Apply one detector result for character `ch`.
    pub fn advance(&mut self, detection: Detection, ch: char) -> Vec<TranscodeEvent> {
        let mut events = Vec::new();
        match detection {
            Detection::Buffering => {}
            Detection::NoMatch => {
                let mut buf = [0u8; 4];
                self.route(ch.encode_utf8(&mut buf), &mut events);
            }
            Detection::Passthrough(text) => self.route(&text, &mut events),
            Detection::Matched(marker) => self.transition(marker, &mut events),
        }
        events
    }

    /// Close everything at the end of the stream.
    ///
    /// `pending` is the detector's unflushed tag buffer; it is routed as
    /// content before spans are closed.
    pub fn finish(&mut self, pending: Option<String>) -> Vec<TranscodeEvent> {
        let mut events = Vec::new();
        if let Some(text) = pending {
            self.route(&text, &mut events);
        }
        self.close_spans(&mut events);

        if self.mode == Mode::Citation {
            tracing::warn!(
                buffered = self.citation_buffer.len(),
                "Discarding unterminated citation at end of stream"
            );
            self.citation_buffer.clear();
        }
        self.mode = Mode::Text;
        events
    }

    fn transition(&mut self, marker: Marker, events: &mut Vec<TranscodeEvent>) {
        match (self.mode, marker) {
            (Mode::Text, Marker::ReasoningOpen) => {
                self.close_text(events);
                self.mode = Mode::Reasoning;
                self.open_reasoning(events);
            }
            (Mode::Reasoning, Marker::ReasoningClose) => {
                self.close_reasoning(events);
                self.mode = Mode::Text;
            }
            (Mode::Text | Mode::Reasoning, Marker::CitationOpen) => {
                self.close_spans(events);
                self.citation_buffer.clear();
                self.mode = Mode::Citation;
            }
            (Mode::Citation, Marker::CitationClose) => {
                let raw = std::mem::take(&mut self.citation_buffer);
                match Citation::parse(&raw) {
                    Ok(data) => events.push(TranscodeEvent::Citation {
                        id: generate_citation_id(),
                        data,
                    }),
                    Err(e) => {
                        tracing::warn!(error = %e, raw = %raw, "Dropping unparsable citation");
                    }
                }
                self.mode = Mode::Text;
            }
            (mode, marker) => {
                tracing::trace!(?mode, ?marker, "Marker has no transition, routing as text");
                let literal = self.markers.literal(marker).to_string();
                self.route(&literal, events);
            }
        }
    }

    fn route(&mut self, text: &str, events: &mut Vec<TranscodeEvent>) {
        if text.is_empty() {
            return;
        }
        match self.mode {
            Mode::Text => {
                let id = match &self.text_span {
                    Some(id) => id.clone(),
                    None => {
                        let id = generate_span_id();
                        events.push(TranscodeEvent::TextStart { id: id.clone() });
                        self.text_span = Some(id.clone());
                        id
                    }
                };
                events.push(TranscodeEvent::TextDelta {
                    id,
                    delta: text.to_string(),
                });
            }
            Mode::Reasoning => {
                if self.reasoning_span.is_none() {
                    self.open_reasoning(events);
                }
                if let Some(id) = &self.reasoning_span {
                    events.push(TranscodeEvent::ReasoningDelta {
                        id: id.clone(),
                        delta: text.to_string(),
                    });
                }
            }
            Mode::Citation => self.citation_buffer.push_str(text),
        }
    }

    fn open_reasoning(&mut self, events: &mut Vec<TranscodeEvent>) {
        let id = generate_span_id();
        events.push(TranscodeEvent::ReasoningStart { id: id.clone() });
        self.reasoning_span = Some(id);
    }

    fn close_text(&mut self, events: &mut Vec<TranscodeEvent>) {
        if let Some(id) = self.text_span.take() {
            events.push(TranscodeEvent::TextEnd { id });
        }
    }

    fn close_reasoning(&mut self, events: &mut Vec<TranscodeEvent>) {
        if let Some(id) = self.reasoning_span.take() {
            events.push(TranscodeEvent::ReasoningEnd { id });
        }
    }

    fn close_spans(&mut self, events: &mut Vec<TranscodeEvent>) {
        self.close_text(events);
        self.close_reasoning(events);
    }
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new(MarkerSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(events: &[TranscodeEvent]) -> Vec<String> {
        events.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_text_opens_lazily() {
        let mut state = ModeState::default();
        let events = state.advance(Detection::NoMatch, 'a');
        assert_eq!(names(&events), vec!["text-start", r#"text-delta("a")"#]);

        let events = state.advance(Detection::NoMatch, 'b');
        assert_eq!(names(&events), vec![r#"text-delta("b")"#]);
    }

    #[test]
    fn test_buffering_emits_nothing() {
        let mut state = ModeState::default();
        assert!(state.advance(Detection::Buffering, '<').is_empty());
        assert!(state.text_span().is_none());
    }

    #[test]
    fn test_reasoning_open_closes_text() {
        let mut state = ModeState::default();
        state.advance(Detection::NoMatch, 'a');
        let text_id = state.text_span().unwrap().to_string();

        let events = state.advance(Detection::Matched(Marker::ReasoningOpen), '>');
        assert_eq!(names(&events), vec!["text-end", "reasoning-start"]);
        assert_eq!(events[0].span_id(), Some(text_id.as_str()));
        assert_eq!(state.mode(), Mode::Reasoning);
        assert!(state.text_span().is_none());
        assert!(state.reasoning_span().is_some());
    }

    #[test]
    fn test_reasoning_close() {
        let mut state = ModeState::default();
        state.advance(Detection::Matched(Marker::ReasoningOpen), '>');
        state.advance(Detection::NoMatch, 'x');
        let events = state.advance(Detection::Matched(Marker::ReasoningClose), '>');
        assert_eq!(names(&events), vec!["reasoning-end"]);
        assert_eq!(state.mode(), Mode::Text);
    }

    #[test]
    fn test_unmatched_close_is_literal_text() {
        let mut state = ModeState::default();
        let events = state.advance(Detection::Matched(Marker::ReasoningClose), '>');
        assert_eq!(names(&events), vec!["text-start", r#"text-delta("</think>")"#]);
        assert_eq!(state.mode(), Mode::Text);
    }

    #[test]
    fn test_nested_open_is_literal_reasoning() {
        let mut state = ModeState::default();
        state.advance(Detection::Matched(Marker::ReasoningOpen), '>');
        let events = state.advance(Detection::Matched(Marker::ReasoningOpen), '>');
        assert_eq!(names(&events), vec![r#"reasoning-delta("<think>")"#]);
        assert_eq!(state.mode(), Mode::Reasoning);
    }

    #[test]
    fn test_citation_roundtrip() {
        let mut state = ModeState::default();
        state.advance(Detection::NoMatch, 'a');
        let events = state.advance(Detection::Matched(Marker::CitationOpen), '>');
        assert_eq!(names(&events), vec!["text-end"]);

        let raw = r#" {"title":"Rust","url":"https://rust-lang.org","description":"Lang","number":1} "#;
        for ch in raw.chars() {
            assert!(state.advance(Detection::NoMatch, ch).is_empty());
        }

        let events = state.advance(Detection::Matched(Marker::CitationClose), '>');
        assert_eq!(events.len(), 1);
        match &events[0] {
            TranscodeEvent::Citation { data, .. } => {
                assert_eq!(
                    *data,
                    Citation::new("Rust", "https://rust-lang.org", "Lang", 1)
                );
            }
            other => panic!("expected citation, got {other:?}"),
        }
        assert_eq!(state.mode(), Mode::Text);
    }

    #[test]
    fn test_malformed_citation_is_dropped() {
        let mut state = ModeState::default();
        state.advance(Detection::Matched(Marker::CitationOpen), '>');
        state.advance(Detection::Passthrough("{not json".into()), 'n');
        let events = state.advance(Detection::Matched(Marker::CitationClose), '>');
        assert!(events.is_empty());
        assert_eq!(state.mode(), Mode::Text);
    }

    #[test]
    fn test_citation_keeps_extra_keys() {
        let raw = r#"{"title":"T","url":"U","description":"D","number":1,"date":"2024"}"#;
        let citation = Citation::parse(raw).unwrap();
        assert_eq!(citation.extra["date"], "2024");
        assert_eq!(
            serde_json::to_value(&citation).unwrap(),
            serde_json::from_str::<JsonValue>(raw).unwrap()
        );
    }

    #[rstest::rstest]
    #[case(r#""1""#)]
    #[case("1.5")]
    #[case("7")]
    fn test_citation_number_kept_verbatim(#[case] number: &str) {
        let raw = format!(r#"{{"title":"T","url":"U","description":"D","number":{number}}}"#);
        let citation = Citation::parse(&raw).unwrap();
        assert_eq!(
            citation.number,
            serde_json::from_str::<JsonValue>(number).unwrap()
        );
    }

    #[test]
    fn test_citation_with_extra_key_is_emitted() {
        let mut state = ModeState::default();
        state.advance(Detection::Matched(Marker::CitationOpen), '>');
        state.advance(
            Detection::Passthrough(
                r#"{"title":"T","url":"U","description":"D","number":"1","date":"2024"}"#.into(),
            ),
            '}',
        );
        let events = state.advance(Detection::Matched(Marker::CitationClose), '>');
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TranscodeEvent::Citation { .. }));
    }

    #[test]
    fn test_citation_missing_field_is_dropped() {
        let mut state = ModeState::default();
        state.advance(Detection::Matched(Marker::CitationOpen), '>');
        state.advance(Detection::Passthrough(r#"{"title":"t"}"#.into()), '}');
        assert!(state
            .advance(Detection::Matched(Marker::CitationClose), '>')
            .is_empty());
    }

    #[test]
    fn test_finish_routes_pending_and_closes() {
        let mut state = ModeState::default();
        state.advance(Detection::NoMatch, 'a');
        let events = state.finish(Some("<thi".into()));
        assert_eq!(names(&events), vec![r#"text-delta("<thi")"#, "text-end"]);
        assert!(state.text_span().is_none());
    }

    #[test]
    fn test_finish_discards_unterminated_citation() {
        let mut state = ModeState::default();
        state.advance(Detection::Matched(Marker::CitationOpen), '>');
        state.advance(Detection::NoMatch, '{');
        assert!(state.finish(None).is_empty());
        assert_eq!(state.mode(), Mode::Text);
    }

    #[test]
    fn test_finish_closes_reasoning() {
        let mut state = ModeState::default();
        state.advance(Detection::Matched(Marker::ReasoningOpen), '>');
        let events = state.finish(None);
        assert_eq!(names(&events), vec!["reasoning-end"]);
    }
}
