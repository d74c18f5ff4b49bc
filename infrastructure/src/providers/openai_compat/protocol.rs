//! Wire types for the chat-completions API.
//!
//! Only the fields the relay reads are modelled; everything else in the
//! upstream payloads is ignored.

use super::error::{ProviderError, Result};
use relay_domain::{GenerationParams, Message, MessageFragment};
use serde::{Deserialize, Serialize};

/// Sentinel data line that ends an upstream SSE stream.
pub const STREAM_END: &str = "[DONE]";

/// Body of `POST {base}/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn new(
        model: &'a str,
        messages: &'a [Message],
        params: &GenerationParams,
        stream: bool,
    ) -> Self {
        Self {
            model,
            messages,
            stream,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

/// Non-streaming response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// The first choice as an assistant message.
    pub fn into_message(self) -> Result<Message> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyChoices)?;
        Ok(Message::assistant(choice.message.content.unwrap_or_default()))
    }
}

/// One `data:` payload of a streaming response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Some endpoints report failures in-band instead of via HTTP status.
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} ({})", self.message, kind),
            None => f.write_str(&self.message),
        }
    }
}

/// What one SSE data line means for the stream.
#[derive(Debug, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Upstream signalled the end of the stream.
    End,
    /// A non-empty piece of answer text.
    Fragment(MessageFragment),
    /// Role announcements, finish markers, keep-alives.
    Skip,
}

/// Interpret one SSE `data:` payload.
pub fn parse_chunk(data: &str) -> Result<ChunkOutcome> {
    let data = data.trim();
    if data == STREAM_END {
        return Ok(ChunkOutcome::End);
    }
    if data.is_empty() {
        return Ok(ChunkOutcome::Skip);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Err(ProviderError::Upstream(error.to_string()));
    }

    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty());

    Ok(match content {
        Some(content) => ChunkOutcome::Fragment(MessageFragment::new(content)),
        None => ChunkOutcome::Skip,
    })
}

/// Best-effort extraction of an error message from a non-2xx body.
pub fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: ErrorBody,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.error.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization_skips_unset_params() {
        let messages = vec![Message::system("be brief"), Message::user("hi")];
        let request =
            ChatCompletionRequest::new("m-1", &messages, &GenerationParams::default(), true);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "model": "m-1",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "stream": true
            })
        );

        let params = GenerationParams::default()
            .with_temperature(0.2)
            .with_max_tokens(64);
        let value =
            serde_json::to_value(ChatCompletionRequest::new("m-1", &messages, &params, false))
                .unwrap();
        assert_eq!(value["max_tokens"], 64);
        assert!(value["temperature"].as_f64().is_some());
    }

    #[test]
    fn test_parse_chunk_content_and_sentinel() {
        let data = r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Hel"}}]}"#;
        assert_eq!(
            parse_chunk(data).unwrap(),
            ChunkOutcome::Fragment(MessageFragment::new("Hel"))
        );
        assert_eq!(parse_chunk(" [DONE] ").unwrap(), ChunkOutcome::End);
    }

    #[test]
    fn test_parse_chunk_skips_empty_deltas() {
        let role_only = r#"{"choices":[{"delta":{"role":"assistant","content":""}}]}"#;
        let finish = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        let usage_only = r#"{"choices":[],"usage":{"total_tokens":12}}"#;
        for data in [role_only, finish, usage_only, ""] {
            assert_eq!(parse_chunk(data).unwrap(), ChunkOutcome::Skip, "{data}");
        }
    }

    #[test]
    fn test_parse_chunk_in_band_error() {
        let data = r#"{"error":{"message":"quota exceeded","type":"rate_limit"}}"#;
        let err = parse_chunk(data).unwrap_err();
        assert_eq!(err.to_string(), "Upstream error: quota exceeded (rate_limit)");
    }

    #[test]
    fn test_parse_chunk_rejects_garbage() {
        assert!(matches!(
            parse_chunk("not json").unwrap_err(),
            ProviderError::Json(_)
        ));
    }

    #[test]
    fn test_completion_into_message() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "42"}}]
        }))
        .unwrap();
        assert_eq!(completion.into_message().unwrap(), Message::assistant("42"));

        let empty: ChatCompletion = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            empty.into_message().unwrap_err(),
            ProviderError::EmptyChoices
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":{"message":"bad key"}}"#),
            "bad key"
        );
        assert_eq!(error_message("  gateway down \n"), "gateway down");
    }
}
