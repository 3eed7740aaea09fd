//! OpenAI Responses API stream decoding.
//!
//! Maps the Responses API's streaming events onto [`UpstreamEvent`]s:
//!
//! | Event `type` | Upstream event |
//! |---|---|
//! | `response.function_call_arguments.delta` | `ToolArgsDelta` keyed by `item_id` |
//! | `response.function_call_arguments.done` | `ToolArgsDone` with `item_id`, `name`, `arguments` |
//! | anything else carrying a string `delta` | `ContentDelta` |
//! | anything else | `Ignored` |

use bytes::Bytes;
use chat_relay_core::UpstreamEvent;
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use serde_json::Value as JsonValue;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{StreamError, StreamResult};
use crate::sse::{SseEvent, SseStream};

const FUNCTION_CALL_ARGUMENTS_DELTA: &str = "response.function_call_arguments.delta";
const FUNCTION_CALL_ARGUMENTS_DONE: &str = "response.function_call_arguments.done";

/// Decode one Responses API event payload.
///
/// # Errors
///
/// Returns [`StreamError::ParseDelta`] if a function-call event is missing a
/// required field. The error is recoverable.
pub fn decode_payload(payload: &JsonValue) -> StreamResult<UpstreamEvent> {
    let event_type = payload
        .get("type")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();

    match event_type {
        FUNCTION_CALL_ARGUMENTS_DELTA => Ok(UpstreamEvent::tool_args_delta(
            required_str(payload, event_type, "item_id")?,
            required_str(payload, event_type, "delta")?,
        )),
        FUNCTION_CALL_ARGUMENTS_DONE => Ok(UpstreamEvent::tool_args_done(
            required_str(payload, event_type, "item_id")?,
            required_str(payload, event_type, "name")?,
            payload
                .get("arguments")
                .and_then(JsonValue::as_str)
                .unwrap_or_default(),
        )),
        _ => match payload.get("delta").and_then(JsonValue::as_str) {
            Some(delta) => Ok(UpstreamEvent::content(delta)),
            None => Ok(UpstreamEvent::ignored(event_type)),
        },
    }
}

/// Decode one SSE event.
///
/// Returns `Ok(None)` for the `[DONE]` sentinel.
///
/// # Errors
///
/// Returns [`StreamError::ParseSse`] if the data is not JSON, or the errors of
/// [`decode_payload`]. Both are recoverable.
pub fn decode_sse_event(event: &SseEvent) -> StreamResult<Option<UpstreamEvent>> {
    if event.is_done() {
        return Ok(None);
    }

    let payload: JsonValue = event
        .parse_data()
        .map_err(|e| StreamError::ParseSse(format!("{e}: {}", truncate(&event.data))))?;

    // The `type` normally rides in the payload; fall back to the SSE event name.
    if payload.get("type").is_none() {
        if let (Some(name), JsonValue::Object(mut map)) = (event.event.as_deref(), payload.clone())
        {
            map.insert("type".to_string(), JsonValue::String(name.to_string()));
            return decode_payload(&JsonValue::Object(map)).map(Some);
        }
    }

    decode_payload(&payload).map(Some)
}

fn required_str<'a>(payload: &'a JsonValue, event_type: &str, field: &str) -> StreamResult<&'a str> {
    payload
        .get(field)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| StreamError::ParseDelta(format!("{event_type} is missing `{field}`")))
}

fn truncate(data: &str) -> &str {
    match data.char_indices().nth(200) {
        Some((idx, _)) => &data[..idx],
        None => data,
    }
}

pin_project! {
    /// Stream of [`UpstreamEvent`]s decoded from a Responses API SSE body.
    ///
    /// Ends at the `[DONE]` sentinel or when the body ends.
    pub struct ResponsesEventStream<S> {
        #[pin]
        inner: S,
        done: bool,
    }
}

impl<S> ResponsesEventStream<S>
where
    S: Stream<Item = StreamResult<SseEvent>>,
{
    /// Decode an already-parsed SSE event stream.
    pub fn new(inner: S) -> Self {
        Self { inner, done: false }
    }
}

impl<B, E> ResponsesEventStream<SseStream<B>>
where
    B: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<StreamError>,
{
    /// Decode a raw response body.
    pub fn from_bytes(body: B) -> Self {
        Self::new(SseStream::new(body))
    }
}

impl<S> Stream for ResponsesEventStream<S>
where
    S: Stream<Item = StreamResult<SseEvent>> + Unpin,
{
    type Item = StreamResult<UpstreamEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(event))) => match decode_sse_event(&event) {
                Ok(Some(upstream)) => Poll::Ready(Some(Ok(upstream))),
                Ok(None) => {
                    *this.done = true;
                    Poll::Ready(None)
                }
                Err(e) => Poll::Ready(Some(Err(e))),
            },
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
