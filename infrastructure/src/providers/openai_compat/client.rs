//! HTTP client for OpenAI-compatible chat-completions endpoints.

use super::error::{ProviderError, Result};
use super::protocol::{ChatCompletion, ChatCompletionRequest, error_message};
use super::session::SseStreamSession;
use relay_application::ports::chat_model::GatewayError;
use relay_domain::{GenerationParams, Message};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Client for `POST {base_url}/chat/completions`.
///
/// Holds only immutable configuration; one instance serves every request.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiCompatClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request the complete answer in one response.
    pub async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationParams,
        cancel: &CancellationToken,
    ) -> std::result::Result<Message, GatewayError> {
        let request = ChatCompletionRequest::new(&self.model, messages, params, false);
        self.bounded(cancel, async {
            let completion: ChatCompletion = self.send(&request).await?.json().await?;
            completion.into_message()
        })
        .await
    }

    /// Open a streaming response. Returns once the upstream status is known.
    pub async fn open_stream(
        &self,
        messages: &[Message],
        params: &GenerationParams,
        cancel: &CancellationToken,
    ) -> std::result::Result<SseStreamSession, GatewayError> {
        let request = ChatCompletionRequest::new(&self.model, messages, params, true);
        let response = self.bounded(cancel, self.send(&request)).await?;
        Ok(SseStreamSession::new(response, self.timeout))
    }

    async fn send(&self, request: &ChatCompletionRequest<'_>) -> Result<reqwest::Response> {
        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            stream = request.stream,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let mut builder = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request);
        if request.stream {
            builder = builder.header(reqwest::header::ACCEPT, "text/event-stream");
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }
        Ok(response)
    }

    /// Race `call` against `cancel` and the configured timeout.
    async fn bounded<T>(
        &self,
        cancel: &CancellationToken,
        call: impl Future<Output = Result<T>>,
    ) -> std::result::Result<T, GatewayError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GatewayError::Cancelled),
            result = tokio::time::timeout(self.timeout, call) => match result {
                Ok(inner) => inner.map_err(GatewayError::from),
                Err(_) => Err(GatewayError::Timeout),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_application::ports::chat_model::StreamSession;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenAiCompatClient {
        OpenAiCompatClient::new(&server.uri(), "test-key", "test-model", Duration::from_secs(5))
            .unwrap()
    }

    fn sse(lines: &[&str]) -> String {
        lines.iter().map(|l| format!("data: {l}\n\n")).collect()
    }

    #[tokio::test]
    async fn test_stream_yields_fragments_in_order() {
        let server = MockServer::start().await;
        let body = sse(&[
            r#"{"choices":[{"delta":{"role":"assistant","content":""}}]}"#,
            r#"{"choices":[{"delta":{"content":"Hel"}}]}"#,
            r#"{"choices":[{"delta":{"content":"lo"}}]}"#,
            r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#,
            "[DONE]",
        ]);
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"model": "test-model", "stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = client(&server)
            .open_stream(
                &[Message::user("hi")],
                &GenerationParams::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let mut parts = Vec::new();
        while let Some(fragment) = session.next().await.unwrap() {
            parts.push(fragment.content);
        }
        assert_eq!(parts, vec!["Hel", "lo"]);
        // Exhausted sessions stay exhausted
        assert_eq!(session.next().await.unwrap(), None);
        session.release();
    }

    #[tokio::test]
    async fn test_stream_malformed_chunk_is_protocol_error() {
        let server = MockServer::start().await;
        let body = sse(&[r#"{"choices":[{"delta":{"content":"A"}}]}"#, "{broken"]);
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let mut session = client(&server)
            .open_stream(
                &[Message::user("hi")],
                &GenerationParams::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(session.next().await.unwrap().unwrap().content, "A");
        assert!(matches!(
            session.next().await.unwrap_err(),
            GatewayError::Protocol(_)
        ));
        assert_eq!(session.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_setup_failure_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "invalid api key"}})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .open_stream(
                &[Message::user("hi")],
                &GenerationParams::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Status {
                status: 401,
                body: "invalid api key".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_complete_passes_params_and_parses_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"stream": false, "max_tokens": 32})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "42"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server)
            .complete(
                &[Message::user("meaning of life?")],
                &GenerationParams::default().with_max_tokens(32),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(answer, Message::assistant("42"));
    }

    #[tokio::test]
    async fn test_cancelled_before_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client(&server)
            .complete(&[Message::user("hi")], &GenerationParams::default(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Cancelled);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::new(
            &server.uri(),
            "k",
            "m",
            Duration::from_millis(100),
        )
        .unwrap();
        let err = client
            .open_stream(
                &[Message::user("hi")],
                &GenerationParams::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
    }
}
