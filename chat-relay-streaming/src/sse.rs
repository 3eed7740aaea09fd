//! Server-Sent Events (SSE) parsing.
//!
//! This module provides utilities for parsing SSE streams from HTTP responses.
//! Provider-specific decoding of the event payloads lives in
//! [`responses`](crate::responses).

use crate::error::{StreamError, StreamResult};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

const MAX_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// A parsed SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type (if specified).
    pub event: Option<String>,
    /// Event data, multi-line payloads joined with `\n`.
    pub data: String,
    /// Event ID (if specified).
    pub id: Option<String>,
}

impl SseEvent {
    /// Create a new SSE event with just data.
    pub fn data(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
        }
    }

    /// Set the event type.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Check if this is the `[DONE]` sentinel.
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }

    /// Parse the data as JSON.
    pub fn parse_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.data)
    }
}

/// Incremental parser for Server-Sent Events.
///
/// Bytes may be split anywhere, including inside a multi-byte UTF-8
/// character; incomplete trailing bytes are carried into the next chunk.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    carry: Vec<u8>,
    last_event_id: Option<String>,
}

impl SseParser {
    /// Create a new SSE parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the parser and return the events they complete.
    ///
    /// The parser keeps no completed events of its own.
    pub fn feed(&mut self, bytes: &Bytes) -> StreamResult<Vec<SseEvent>> {
        self.carry.extend_from_slice(bytes);
        let valid_up_to = match std::str::from_utf8(&self.carry) {
            Ok(_) => self.carry.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => {
                // Invalid (not merely incomplete) sequence: decode lossily.
                let text = String::from_utf8_lossy(&self.carry).into_owned();
                self.carry.clear();
                return self.feed_str(&text);
            }
        };

        let tail = self.carry.split_off(valid_up_to);
        let head = std::mem::replace(&mut self.carry, tail);
        let text = String::from_utf8_lossy(&head).into_owned();
        self.feed_str(&text)
    }

    /// Feed a string into the parser.
    pub fn feed_str(&mut self, s: &str) -> StreamResult<Vec<SseEvent>> {
        self.buffer.push_str(s);

        if self.buffer.len() > MAX_BUFFER_SIZE {
            return Err(StreamError::BufferOverflow);
        }

        Ok(self.parse_buffer())
    }

    /// Call when stream ends to flush any remaining event.
    pub fn finish(&mut self) -> StreamResult<Vec<SseEvent>> {
        if !self.carry.is_empty() {
            let text = String::from_utf8_lossy(&self.carry).into_owned();
            self.carry.clear();
            self.buffer.push_str(&text);
        }

        let mut events = self.parse_buffer();

        let rest = std::mem::take(&mut self.buffer);
        if let Some(event) = self.parse_event(rest.trim_end_matches(['\n', '\r'])) {
            self.record(&event);
            events.push(event);
        }

        Ok(events)
    }

    /// Get the last event ID.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    fn record(&mut self, event: &SseEvent) {
        if let Some(id) = &event.id {
            self.last_event_id = Some(id.clone());
        }
    }

    fn parse_buffer(&mut self) -> Vec<SseEvent> {
        let mut parsed_events = Vec::new();

        while let Some((pos, delimiter_len)) = self.find_event_boundary() {
            let block: String = self.buffer.drain(..pos + delimiter_len).collect();
            if let Some(event) = self.parse_event(&block[..pos]) {
                self.record(&event);
                parsed_events.push(event);
            }
        }

        parsed_events
    }

    fn find_event_boundary(&self) -> Option<(usize, usize)> {
        let newline = self.buffer.find("\n\n").map(|pos| (pos, 2));
        let carriage = self.buffer.find("\r\n\r\n").map(|pos| (pos, 4));

        match (newline, carriage) {
            (Some(nl), Some(cr)) => Some(if cr.0 < nl.0 { cr } else { nl }),
            (nl, cr) => nl.or(cr),
        }
    }

    fn parse_event(&self, block: &str) -> Option<SseEvent> {
        let mut event = None;
        let mut data_lines = Vec::new();
        let mut id = None;

        for line in block.lines() {
            // Comments start with ':'
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };

            match field {
                "event" => event = Some(value.trim().to_string()),
                "data" => data_lines.push(value),
                "id" => id = Some(value.trim().to_string()),
                _ => {}
            }
        }

        if data_lines.is_empty() {
            return None;
        }

        Some(SseEvent {
            event,
            data: data_lines.join("\n"),
            id,
        })
    }
}

pin_project! {
    /// Stream adapter that parses SSE from a byte stream.
    pub struct SseStream<S> {
        #[pin]
        inner: S,
        parser: SseParser,
        pending: VecDeque<SseEvent>,
        finished: bool,
    }
}

impl<S, E> SseStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<StreamError>,
{
    /// Create a new SSE stream from a byte stream.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            parser: SseParser::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

impl<S, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<StreamError>,
{
    type Item = StreamResult<SseEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            if *this.finished {
                return Poll::Ready(None);
            }

            match this.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(bytes))) => match this.parser.feed(&bytes) {
                    Ok(events) => this.pending.extend(events),
                    Err(error) => {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(error)));
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => {
                    *this.finished = true;
                    match this.parser.finish() {
                        Ok(events) => this.pending.extend(events),
                        Err(error) => return Poll::Ready(Some(Err(error))),
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
