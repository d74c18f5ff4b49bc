//! `POST /chat` request body.

use relay_application::ChatRequest;
use relay_domain::GenerationParams;
use serde::Deserialize;

/// JSON body accepted by `POST /chat`.
///
/// `stream` defaults to `true`; the endpoint streams unless told otherwise.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_stream() -> bool {
    true
}

impl From<ChatBody> for ChatRequest {
    fn from(body: ChatBody) -> Self {
        ChatRequest {
            query: body.query,
            system: body.system,
            params: GenerationParams {
                temperature: body.temperature,
                max_tokens: body.max_tokens,
            },
            stream: body.stream,
        }
    }
}
