//! Volcengine Ark provider.

use super::openai_compat::OpenAiCompatClient;
use crate::config::FileArkConfig;
use async_trait::async_trait;
use relay_application::ports::chat_model::{ChatModel, GatewayError, StreamSession};
use relay_domain::{GenerationParams, Message};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// [`ChatModel`] backed by Ark's OpenAI-compatible API.
///
/// Authenticates with the API key only.
#[derive(Debug, Clone)]
pub struct ArkChatModel {
    client: OpenAiCompatClient,
}

impl ArkChatModel {
    pub fn from_config(config: &FileArkConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingCredentials("ARK_API_KEY is not set".to_string()))?;

        if config.model.trim().is_empty() {
            return Err(GatewayError::InvalidModel("ARK_MODEL_ID is empty".to_string()));
        }

        let client = OpenAiCompatClient::new(
            &config.endpoint(),
            api_key,
            config.model.trim(),
            Duration::from_secs(config.timeout_secs),
        )
        .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        info!(
            region = %config.region,
            model = %client.model(),
            endpoint = %client.endpoint(),
            "Ark provider ready"
        );
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatModel for ArkChatModel {
    fn provider(&self) -> &str {
        "ark"
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
