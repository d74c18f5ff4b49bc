//! Generic OpenAI-compatible provider (SiliconFlow, OpenAI, local servers).

use super::openai_compat::OpenAiCompatClient;
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use relay_application::ports::chat_model::{ChatModel, GatewayError, StreamSession};
use relay_domain::{GenerationParams, Message};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: OpenAiCompatClient,
}

impl OpenAiChatModel {
    pub fn from_config(config: &FileOpenAiConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingCredentials("SF_API_KEY is not set".to_string()))?;

        let model = config
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .ok_or_else(|| GatewayError::InvalidModel("SF_MODEL_ID is not set".to_string()))?;

        let client = OpenAiCompatClient::new(
            &config.base_url,
            api_key,
            model,
            Duration::from_secs(config.timeout_secs),
        )
        .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        info!(model = %client.model(), endpoint = %client.endpoint(), "OpenAI-compatible provider ready");
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn provider(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        messages: &[Message],
        params: &GenerationParams,
        cancel: &CancellationToken,
    ) -> Result<Message, GatewayError> {
        self.client.complete(messages, params, cancel).await
    }

    async fn stream(
        &self,
        messages: &[Message],
        params: &GenerationParams,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn StreamSession>, GatewayError> {
        let session = self.client.open_stream(messages, params, cancel).await?;
        Ok(Box::new(session))
    }
}
