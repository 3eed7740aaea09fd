//! Async transcoding loop.
//!
//! [`RelayStream`] pulls upstream events one at a time, feeds them through a
//! [`Transcoder`] and yields the resulting events. Nothing is read from
//! upstream until the consumer polls, and dropping the stream drops upstream.

use chat_relay_core::UpstreamEvent;
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::StreamResult;
use crate::events::TranscodeEvent;
use crate::transcoder::Transcoder;

/// State of the relay stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Pulling from upstream.
    Streaming,
    /// Upstream ended; draining the final events.
    Finishing,
    /// All events delivered.
    Completed,
    /// Ended on a fatal upstream error.
    Failed,
}

pin_project! {
    /// Stream of transcoder events over an upstream event stream.
    pub struct RelayStream<S> {
        #[pin]
        upstream: S,
        transcoder: Transcoder,
        pending: VecDeque<TranscodeEvent>,
        state: RelayState,
        skipped: usize,
    }
}

impl<S> RelayStream<S>
where
    S: Stream<Item = StreamResult<UpstreamEvent>>,
{
    /// Wrap `upstream` with the given transcoder.
    pub fn new(upstream: S, transcoder: Transcoder) -> Self {
        tracing::debug!("Starting relay stream");
        Self {
            upstream,
            transcoder,
            pending: VecDeque::new(),
            state: RelayState::Streaming,
            skipped: 0,
        }
    }

    /// The current state.
    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Number of upstream items skipped as recoverable errors.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<S> Stream for RelayStream<S>
where
    S: Stream<Item = StreamResult<UpstreamEvent>> + Unpin,
{
    type Item = StreamResult<TranscodeEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            match *this.state {
                RelayState::Streaming => {}
                RelayState::Finishing => {
                    *this.state = RelayState::Completed;
                    tracing::debug!(skipped = *this.skipped, "Relay stream complete");
                    return Poll::Ready(None);
                }
                RelayState::Completed | RelayState::Failed => return Poll::Ready(None),
            }

            match this.upstream.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    this.pending.extend(this.transcoder.process(event));
                }
                Poll::Ready(Some(Err(e))) if e.is_recoverable() => {
                    *this.skipped += 1;
                    tracing::warn!(error = %e, "Skipping malformed upstream item");
                }
                Poll::Ready(Some(Err(e))) => {
                    tracing::warn!(error = %e, "Upstream failed, ending relay stream");
                    *this.state = RelayState::Failed;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    this.pending.extend(this.transcoder.finish());
                    *this.state = RelayState::Finishing;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Extension trait for driving a transcoder over an upstream stream.
pub trait RelayStreamExt: Stream<Item = StreamResult<UpstreamEvent>> + Sized {
    /// Transcode this upstream stream.
    fn transcode(self, transcoder: Transcoder) -> RelayStream<Self> {
        RelayStream::new(self, transcoder)
    }
}

impl<S> RelayStreamExt for S where S: Stream<Item = StreamResult<UpstreamEvent>> + Sized {}
