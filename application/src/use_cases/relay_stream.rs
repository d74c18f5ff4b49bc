//! Stream relay use case.
//!
//! Bridges a pull-based [`StreamSession`] to a push-based [`FrameSink`]:
//!
//! 1. Await the next fragment (or cancellation)
//! 2. Emit exactly one frame for it and flush
//! 3. Repeat until end of stream, upstream failure, disconnect or cancellation
//! 4. Release the session, exactly once
//!
//! At most one frame is ever in flight, fragments are forwarded in upstream
//! order, and exactly one terminal frame (`[DONE]` or `error`) closes a
//! stream that reaches `Completed` or `Failed`.

use crate::ports::chat_model::StreamSession;
use crate::ports::frame_sink::FrameSink;
use relay_domain::{Frame, RelayEvent, RelayState};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a relay run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Terminal state: `Completed`, `Failed` or `Abandoned`.
    pub state: RelayState,
    /// Number of content frames delivered.
    pub fragments: usize,
    /// Upstream error description, if the stream failed.
    pub error: Option<String>,
}

impl RelayOutcome {
    pub fn is_completed(&self) -> bool {
        self.state == RelayState::Completed
    }
}

enum Delivery {
    Sent,
    SinkClosed,
    Cancelled,
}

/// Drives one [`StreamSession`] into one [`FrameSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamRelay;

impl StreamRelay {
    pub fn new() -> Self {
        Self
    }

    /// Relay `session` into `sink` until a terminal state is reached.
    ///
    /// Never fails: disconnects and cancellation end in
    /// [`RelayState::Abandoned`], upstream errors in [`RelayState::Failed`].
    pub async fn run<S>(
        &self,
        mut session: Box<dyn StreamSession>,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> RelayOutcome
    where
        S: FrameSink + ?Sized,
    {
        let mut state = RelayState::Idle.on(RelayEvent::StreamOpened);
        let mut fragments = 0usize;
        let mut error = None;

        while !state.is_terminal() {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                step = session.next() => Some(step),
            };

            let event = match step {
                None => RelayEvent::Cancelled,
                Some(Ok(Some(fragment))) => {
                    match deliver(sink, Frame::Data(fragment.content), cancel).await {
                        Delivery::Sent => {
                            fragments += 1;
                            RelayEvent::Fragment
                        }
                        Delivery::SinkClosed => RelayEvent::SinkClosed,
                        Delivery::Cancelled => RelayEvent::Cancelled,
                    }
                }
                Some(Ok(None)) => match deliver(sink, Frame::Done, cancel).await {
                    Delivery::Sent => RelayEvent::EndOfStream,
                    Delivery::SinkClosed => RelayEvent::SinkClosed,
                    Delivery::Cancelled => RelayEvent::Cancelled,
                },
                Some(Err(e)) if e.is_cancelled() => RelayEvent::Cancelled,
                Some(Err(e)) => {
                    let description = e.to_string();
                    warn!(error = %description, fragments, "Upstream stream failed");
                    let event = match deliver(sink, Frame::Error(description.clone()), cancel).await
                    {
                        Delivery::Sent => RelayEvent::UpstreamFailed,
                        Delivery::SinkClosed => RelayEvent::SinkClosed,
                        Delivery::Cancelled => RelayEvent::Cancelled,
                    };
                    error = Some(description);
                    event
                }
            };

            let next = state.on(event);
            if next != state {
                debug!(from = %state, to = %next, ?event, "Relay transition");
            }
            state = next;
        }

        session.release();

        match state {
            RelayState::Completed => info!(fragments, "Stream relayed to completion"),
            RelayState::Abandoned => info!(fragments, "Stream abandoned by the client"),
            _ => {}
        }

        RelayOutcome {
            state,
            fragments,
            error,
        }
    }
}

/// Emit and flush one frame, giving up if `cancel` fires first.
async fn deliver<S>(sink: &mut S, frame: Frame, cancel: &CancellationToken) -> Delivery
where
    S: FrameSink + ?Sized,
{
    let write = async {
        sink.emit(frame).await?;
        sink.flush().await
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Delivery::Cancelled,
        result = write => match result {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::SinkClosed,
        },
    }
}
