//! UI message stream framing.
//!
//! [`UiMessageStream`] turns transcoder events into SSE frames and appends the
//! `data: [DONE]` terminator once the events run out.

use bytes::Bytes;
use chat_relay_streaming::{StreamResult, TranscodeEvent};
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::types::{UiChunk, DONE_FRAME};

/// HTTP headers for UI message stream responses.
pub const UI_MESSAGE_STREAM_HEADERS: &[(&str, &str)] = &[
    ("cache-control", "no-cache"),
    ("x-vercel-ai-data-stream", "v1"),
    ("content-type", "text/event-stream"),
    ("connection", "keep-alive"),
    ("x-accel-buffering", "no"),
];

pin_project! {
    /// SSE frames for a stream of transcoder events.
    ///
    /// A fatal error from the inner stream is passed through and ends the
    /// stream without the terminator.
    pub struct UiMessageStream<S> {
        #[pin]
        inner: S,
        done: bool,
    }
}

impl<S> UiMessageStream<S>
where
    S: Stream<Item = StreamResult<TranscodeEvent>>,
{
    /// Frame the given event stream.
    pub fn new(inner: S) -> Self {
        Self { inner, done: false }
    }
}

impl<S> Stream for UiMessageStream<S>
where
    S: Stream<Item = StreamResult<TranscodeEvent>> + Unpin,
{
    type Item = StreamResult<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(event))) => {
                let frame = UiChunk::from(event).to_frame();
                Poll::Ready(Some(Ok(Bytes::from(frame))))
            }
            Poll::Ready(Some(Err(e))) => {
                *this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(Some(Ok(Bytes::from_static(DONE_FRAME.as_bytes()))))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Encode a batch of events as concatenated SSE frames.
#[must_use]
pub fn events_to_sse(events: impl IntoIterator<Item = TranscodeEvent>) -> String {
    events
        .into_iter()
        .map(|event| UiChunk::from(event).to_frame())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_relay_core::UpstreamEvent;
    use chat_relay_streaming::{RelayStreamExt, StreamError, Transcoder};
    use chat_relay_tools::ToolRegistry;
    use futures::stream;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    async fn frames<S>(stream: UiMessageStream<S>) -> Vec<String>
    where
        S: Stream<Item = StreamResult<TranscodeEvent>> + Unpin,
    {
        stream
            .map(|frame| String::from_utf8(frame.unwrap().to_vec()).unwrap())
            .collect()
            .await
    }

    fn frame_types(frames: &[String]) -> Vec<String> {
        frames
            .iter()
            .map(|frame| {
                let payload = frame
                    .strip_prefix("data: ")
                    .and_then(|f| f.strip_suffix("\n\n"))
                    .unwrap();
                match serde_json::from_str::<Value>(payload) {
                    Ok(json) => json["type"].as_str().unwrap().to_string(),
                    Err(_) => payload.to_string(),
                }
            })
            .collect()
    }

    #[test]
    fn test_headers() {
        let headers: std::collections::HashMap<_, _> =
            UI_MESSAGE_STREAM_HEADERS.iter().copied().collect();
        assert_eq!(headers["x-vercel-ai-data-stream"], "v1");
        assert_eq!(headers["content-type"], "text/event-stream");
        assert_eq!(headers["x-accel-buffering"], "no");
        assert_eq!(headers.len(), 5);
    }

    #[tokio::test]
    async fn test_end_to_end_frames() {
        let upstream = stream::iter(vec![Ok(UpstreamEvent::content("a<think>b</think>c"))]);
        let relay = upstream.transcode(Transcoder::new(ToolRegistry::new()));

        let frames = frames(UiMessageStream::new(relay)).await;
        assert_eq!(
            frame_types(&frames),
            vec![
                "text-start",
                "text-delta",
                "text-end",
                "reasoning-start",
                "reasoning-delta",
                "reasoning-end",
                "text-start",
                "text-delta",
                "text-end",
                "finish",
                "[DONE]"
            ]
        );
        assert_eq!(frames[frames.len() - 2], "data: {\"type\":\"finish\"}\n\n");
        assert_eq!(frames.last().unwrap(), DONE_FRAME);
    }

    #[tokio::test]
    async fn test_fatal_error_skips_terminator() {
        let events = stream::iter(vec![
            Ok(TranscodeEvent::TextStart { id: "a".into() }),
            Err(StreamError::BufferOverflow),
        ]);
        let results: Vec<_> = UiMessageStream::new(events).collect().await;
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(StreamError::BufferOverflow)));
    }

    #[test]
    fn test_events_to_sse() {
        let sse = events_to_sse(vec![
            TranscodeEvent::TextStart { id: "a".into() },
            TranscodeEvent::TextEnd { id: "a".into() },
        ]);
        assert_eq!(
            sse,
            "data: {\"type\":\"text-start\",\"id\":\"a\"}\n\ndata: {\"type\":\"text-end\",\"id\":\"a\"}\n\n"
        );
    }
}
