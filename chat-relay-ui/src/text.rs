//! Plain-text stream protocol.
//!
//! Forwards every upstream delta verbatim with no framing and no marker
//! parsing: content text and tool-call argument fragments alike. Completion
//! and lifecycle events carry no delta and are dropped. Tools are not run.

use bytes::Bytes;
use chat_relay_core::UpstreamEvent;
use chat_relay_streaming::StreamResult;
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Raw text chunks for an upstream event stream.
    pub struct TextStream<S> {
        #[pin]
        inner: S,
        done: bool,
    }
}

impl<S> TextStream<S>
where
    S: Stream<Item = StreamResult<UpstreamEvent>>,
{
    /// Wrap an upstream event stream.
    pub fn new(inner: S) -> Self {
        Self { inner, done: false }
    }
}

impl<S> Stream for TextStream<S>
where
    S: Stream<Item = StreamResult<UpstreamEvent>> + Unpin,
{
    type Item = StreamResult<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }

            match this.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if let Some(delta) = delta_text(event) {
                        return Poll::Ready(Some(Ok(Bytes::from(delta))));
                    }
                }
                Poll::Ready(Some(Err(e))) if e.is_recoverable() => {
                    tracing::warn!(error = %e, "Skipping malformed upstream item");
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

fn delta_text(event: UpstreamEvent) -> Option<String> {
    let delta = match event {
        UpstreamEvent::ContentDelta { text } => text,
        UpstreamEvent::ToolArgsDelta { delta, .. } => delta,
        UpstreamEvent::ToolArgsDone { .. } | UpstreamEvent::Ignored { .. } => return None,
    };
    (!delta.is_empty()).then_some(delta)
}
