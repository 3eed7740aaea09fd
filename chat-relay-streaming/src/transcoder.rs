//! The synchronous transcoder.
//!
//! [`Transcoder`] is the per-request state that turns [`UpstreamEvent`]s into
//! [`TranscodeEvent`]s. It does no I/O; [`RelayStream`](crate::RelayStream)
//! drives it over an async upstream.

use chat_relay_core::UpstreamEvent;
use chat_relay_tools::ToolRegistry;

use crate::config::TranscoderConfig;
use crate::error::StreamResult;
use crate::events::TranscodeEvent;
use crate::mode::{Mode, ModeState};
use crate::tags::TagDetector;
use crate::tool_calls::ToolCallAggregator;

/// Per-request transcoding state.
///
/// # Example
///
/// ```rust
/// use chat_relay_core::UpstreamEvent;
/// use chat_relay_streaming::{Transcoder, TranscodeEvent};
/// use chat_relay_tools::ToolRegistry;
///
/// let mut transcoder = Transcoder::new(ToolRegistry::new());
/// let mut events = transcoder.process(UpstreamEvent::content("<think>plan</think>ok"));
/// events.extend(transcoder.finish());
///
/// let types: Vec<_> = events.iter().map(TranscodeEvent::event_type).collect();
/// assert_eq!(
///     types,
///     [
///         "reasoning-start",
///         "reasoning-delta", "reasoning-delta", "reasoning-delta", "reasoning-delta",
///         "reasoning-end",
///         "text-start", "text-delta", "text-delta", "text-end", "finish",
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Transcoder {
    detector: TagDetector,
    state: ModeState,
    tool_calls: ToolCallAggregator,
    coalesce_deltas: bool,
    finished: bool,
}

impl Transcoder {
    /// Create a transcoder with the default configuration.
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self::from_parts(registry, &TranscoderConfig::default())
    }

    /// Create a transcoder with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Config`](crate::StreamError::Config) if the
    /// markers cannot be detected under the configured ceiling.
    pub fn with_config(registry: ToolRegistry, config: &TranscoderConfig) -> StreamResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(registry, config))
    }

    fn from_parts(registry: ToolRegistry, config: &TranscoderConfig) -> Self {
        Self {
            detector: TagDetector::from_config(config),
            state: ModeState::new(config.markers.clone()),
            tool_calls: ToolCallAggregator::new(registry, config.placeholder_tool_name.clone()),
            coalesce_deltas: config.coalesce_deltas,
            finished: false,
        }
    }

    /// The current content mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// Whether [`finish`](Self::finish) has run.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Process one upstream event.
    ///
    /// Each content character yields its own delta unless
    /// [`TranscoderConfig::coalesce_deltas`] is set, in which case consecutive
    /// deltas of the same span within this event are merged.
    pub fn process(&mut self, event: UpstreamEvent) -> Vec<TranscodeEvent> {
        if self.finished {
            tracing::debug!("Ignoring upstream event after finish");
            return Vec::new();
        }

        match event {
            UpstreamEvent::ContentDelta { text } => {
                let mut events = Vec::new();
                for ch in text.chars() {
                    let detection = self.detector.feed(ch);
                    for event in self.state.advance(detection, ch) {
                        self.push(&mut events, event);
                    }
                }
                events
            }
            UpstreamEvent::ToolArgsDelta { call_id, delta } => {
                self.tool_calls.on_argument_delta(&call_id, &delta)
            }
            UpstreamEvent::ToolArgsDone {
                call_id,
                tool_name,
                arguments,
            } => self
                .tool_calls
                .on_arguments_complete(&call_id, &tool_name, &arguments),
            UpstreamEvent::Ignored { event_type } => {
                tracing::trace!(event_type = %event_type, "Skipping upstream event");
                Vec::new()
            }
        }
    }

    /// Flush pending state and emit `finish`.
    ///
    /// Calling this more than once yields nothing after the first call.
    pub fn finish(&mut self) -> Vec<TranscodeEvent> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;

        if self.tool_calls.in_flight() > 0 {
            tracing::warn!(
                in_flight = self.tool_calls.in_flight(),
                "Stream ended with incomplete tool calls"
            );
        }

        let mut events = Vec::new();
        for event in self.state.finish(self.detector.flush()) {
            self.push(&mut events, event);
        }
        events.push(TranscodeEvent::Finish);
        events
    }

    fn push(&self, events: &mut Vec<TranscodeEvent>, event: TranscodeEvent) {
        let rest = match events.last_mut() {
            Some(last) if self.coalesce_deltas => last.try_merge(event),
            _ => Some(event),
        };
        if let Some(event) = rest {
            events.push(event);
        }
    }
}
