//! SSE transport for relayed frames.
//!
//! The relay task writes into a [`ChannelFrameSink`]; the response body reads
//! the other end of a capacity-1 channel, so at most one frame is in flight.
//! The body owns a [`DropGuard`] of the request token: when the client goes
//! away and hyper drops the body, the relay is cancelled.

use async_trait::async_trait;
use axum::http::HeaderName;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::Stream;
use relay_application::ports::chat_model::StreamSession;
use relay_application::ports::frame_sink::{FrameSink, SinkError};
use relay_application::RunChatUseCase;
use relay_domain::Frame;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// [`FrameSink`] backed by a bounded channel.
///
/// `emit` stages the frame; `flush` hands it to the channel and waits for
/// room, which is where backpressure from a slow client lands.
pub struct ChannelFrameSink {
    tx: mpsc::Sender<Frame>,
    pending: Option<Frame>,
}

impl ChannelFrameSink {
    pub fn new(tx: mpsc::Sender<Frame>) -> Self {
        Self { tx, pending: None }
    }
}

#[async_trait]
impl FrameSink for ChannelFrameSink {
    async fn emit(&mut self, frame: Frame) -> Result<(), SinkError> {
        if self.tx.is_closed() {
            return Err(SinkError::Closed);
        }
        self.pending = Some(frame);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        match self.pending.take() {
            Some(frame) => self.tx.send(frame).await.map_err(|_| SinkError::Closed),
            None => Ok(()),
        }
    }
}

/// A sink and the receiver the response body drains.
pub fn frame_channel() -> (ChannelFrameSink, mpsc::Receiver<Frame>) {
    let (tx, rx) = mpsc::channel(1);
    (ChannelFrameSink::new(tx), rx)
}

/// Render a frame as an SSE event.
///
/// SSE has no escape for carriage returns, so `\r\n` and `\r` are folded
/// into `\n`; multi-line payloads become several `data:` lines.
pub fn to_event(frame: &Frame) -> Event {
    let payload = frame.payload().replace("\r\n", "\n").replace('\r', "\n");
    Event::default().event(frame.event()).data(payload)
}

/// Body stream: one event per received frame, ending when the sink is dropped.
pub fn event_stream(
    rx: mpsc::Receiver<Frame>,
    guard: DropGuard,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let frame = rx.recv().await?;
        Some((Ok(to_event(&frame)), (rx, guard)))
    })
}

/// Spawn the relay for `session` and return the streaming response.
pub fn relay_response(
    chat: Arc<RunChatUseCase>,
    session: Box<dyn StreamSession>,
    cancel: CancellationToken,
) -> Response {
    let (mut sink, rx) = frame_channel();
    let guard = cancel.clone().drop_guard();

    tokio::spawn(async move {
        let outcome = chat.relay(session, &mut sink, &cancel).await;
        debug!(state = %outcome.state, fragments = outcome.fragments, "Relay task finished");
    });

    (
        [(X_ACCEL_BUFFERING, "no")],
        Sse::new(event_stream(rx, guard)).keep_alive(KeepAlive::default()),
    )
        .into_response()
}
