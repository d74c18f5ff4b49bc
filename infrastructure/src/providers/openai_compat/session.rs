//! Streaming session over an upstream SSE response.
//!
//! Provides [`SseStreamSession`] which implements [`StreamSession`] by
//! decoding `data:` lines from a chat-completions response body.

use super::error::ProviderError;
use super::protocol::{ChunkOutcome, parse_chunk};
use async_trait::async_trait;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use relay_application::ports::chat_model::{GatewayError, StreamSession};
use relay_domain::MessageFragment;
use std::fmt;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, trace};

type EventItem = Result<Event, EventStreamError<reqwest::Error>>;
type EventStream = Pin<Box<dyn Stream<Item = EventItem> + Send>>;

/// A live chat-completions stream.
///
/// The response body is dropped on [`release`](StreamSession::release), at
/// end of stream and on the first error, which closes the upstream
/// connection. After that `next` keeps returning `Ok(None)`.
pub struct SseStreamSession {
    events: Option<EventStream>,
    idle_timeout: Duration,
    received: usize,
}

impl SseStreamSession {
    /// Wrap a successful streaming response.
    pub fn new(response: reqwest::Response, idle_timeout: Duration) -> Self {
        Self::from_events(Box::pin(response.bytes_stream().eventsource()), idle_timeout)
    }

    fn from_events(events: EventStream, idle_timeout: Duration) -> Self {
        Self {
            events: Some(events),
            idle_timeout,
            received: 0,
        }
    }

    fn fail(&mut self, err: ProviderError) -> GatewayError {
        self.release();
        err.into()
    }
}

impl fmt::Debug for SseStreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SseStreamSession")
            .field("open", &self.events.is_some())
            .field("received", &self.received)
            .field("idle_timeout", &self.idle_timeout)
            .finish_non_exhaustive()
    }
}

/// Transport failures keep their HTTP classification; only undecodable
/// bytes count as a malformed payload.
fn decode_error(err: EventStreamError<reqwest::Error>) -> ProviderError {
    match err {
        EventStreamError::Transport(e) => ProviderError::Http(e),
        other => ProviderError::Sse(other.to_string()),
    }
}

#[async_trait]
impl StreamSession for SseStreamSession {
    async fn next(&mut self) -> Result<Option<MessageFragment>, GatewayError> {
        loop {
            let Some(events) = self.events.as_mut() else {
                return Ok(None);
            };

            let item = match tokio::time::timeout(self.idle_timeout, events.next()).await {
                Ok(item) => item,
                Err(_) => return Err(self.fail(ProviderError::Timeout)),
            };

            let event = match item {
                Some(Ok(event)) => event,
                Some(Err(e)) => return Err(self.fail(decode_error(e))),
                // Body ended without the sentinel; treat as a normal end.
                None => {
                    self.release();
                    return Ok(None);
                }
            };

            match parse_chunk(&event.data) {
                Ok(ChunkOutcome::Fragment(fragment)) => {
                    self.received += 1;
                    trace!(bytes = fragment.content.len(), "Upstream fragment");
                    return Ok(Some(fragment));
                }
                Ok(ChunkOutcome::Skip) => continue,
                Ok(ChunkOutcome::End) => {
                    self.release();
                    return Ok(None);
                }
                Err(e) => return Err(self.fail(e)),
            }
        }
    }

    fn release(&mut self) {
        if self.events.take().is_some() {
            debug!(fragments = self.received, "Upstream stream released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(data: &str) -> Event {
        Event {
            event: "message".to_string(),
            data: data.to_string(),
            id: String::new(),
            retry: None,
        }
    }

    fn chunk(content: &str) -> Event {
        event(&format!(
            r#"{{"choices":[{{"index":0,"delta":{{"content":"{}"}}}}]}}"#,
            content
        ))
    }

    async fn refused_connection() -> reqwest::Error {
        reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_idle_upstream_times_out_and_closes() {
        let events: EventStream = Box::pin(futures::stream::pending::<EventItem>());
        let mut session = SseStreamSession::from_events(events, Duration::from_millis(20));

        assert_eq!(session.next().await.unwrap_err(), GatewayError::Timeout);
        assert!(session.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transport_break_is_not_a_protocol_error() {
        let items = vec![
            Ok(chunk("Hel")),
            Err(EventStreamError::Transport(refused_connection().await)),
        ];
        let events: EventStream = Box::pin(futures::stream::iter(items));
        let mut session = SseStreamSession::from_events(events, Duration::from_secs(5));

        assert_eq!(session.next().await.unwrap().unwrap().content, "Hel");
        let err = session.next().await.unwrap_err();
        assert!(
            matches!(
                err,
                GatewayError::ConnectionError(_) | GatewayError::RequestFailed(_)
            ),
            "unexpected error: {err:?}"
        );
        assert!(session.next().await.unwrap().is_none());
    }

    #[test]
    fn test_undecodable_bytes_are_protocol_errors() {
        let utf8 = String::from_utf8(vec![0xff]).unwrap_err();
        let err: GatewayError = decode_error(EventStreamError::Utf8(utf8)).into();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[test]
    fn test_debug_hides_the_body_stream() {
        let events: EventStream = Box::pin(futures::stream::empty::<EventItem>());
        let session = SseStreamSession::from_events(events, Duration::from_secs(1));
        let text = format!("{session:?}");
        assert!(text.starts_with("SseStreamSession"));
        assert!(text.contains("received: 0"));
    }
}
