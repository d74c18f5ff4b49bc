//! Generation backends implementing the [`ChatModel`] port.

pub mod ark;
pub mod openai;
pub mod openai_compat;

pub use ark::ArkChatModel;
pub use openai::OpenAiChatModel;

use crate::config::{FileProvidersConfig, ProviderKind};
use relay_application::ports::chat_model::{ChatModel, GatewayError};
use std::sync::Arc;

/// Build the configured default provider.
pub fn build_chat_model(config: &FileProvidersConfig) -> Result<Arc<dyn ChatModel>, GatewayError> {
    let model: Arc<dyn ChatModel> = match config.default {
        ProviderKind::Ark => Arc::new(ArkChatModel::from_config(&config.ark)?),
        ProviderKind::OpenAi => Arc::new(OpenAiChatModel::from_config(&config.openai)?),
    };
    Ok(model)
}
