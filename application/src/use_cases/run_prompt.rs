//! Run Prompt use case
//!
//! Formats a [`PromptTemplate`] against a variable map and sends the result
//! to the model, either as a one-shot generation or relayed to a sink.

use crate::ports::chat_model::{ChatModel, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::frame_sink::FrameSink;
use crate::use_cases::relay_stream::{RelayOutcome, StreamRelay};
use relay_domain::{GenerationParams, Message, PromptTemplate, TemplateError, TemplateVariables};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can occur while running a templated prompt
#[derive(Error, Debug)]
pub enum RunPromptError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("stream setup failed: {0}")]
    Setup(GatewayError),

    #[error("generation failed: {0}")]
    Upstream(GatewayError),

    #[error("prompt cancelled")]
    Cancelled,
}

/// Use case for templated prompts
pub struct RunPromptUseCase {
    model: Arc<dyn ChatModel>,
    relay: StreamRelay,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunPromptUseCase {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            relay: StreamRelay::new(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Format and generate one complete answer.
    pub async fn execute(
        &self,
        template: &PromptTemplate,
        variables: &TemplateVariables,
        params: &GenerationParams,
        cancel: &CancellationToken,
    ) -> Result<Message, RunPromptError> {
        let messages = self.format(template, variables)?;

        let answer = self
            .model
            .generate(&messages, params, cancel)
            .await
            .map_err(|e| match e {
                GatewayError::Cancelled => RunPromptError::Cancelled,
                other => RunPromptError::Upstream(other),
            })?;

        self.conversation_logger.log(ConversationEvent::new(
            "generate_response",
            serde_json::json!({
                "provider": self.model.provider(),
                "bytes": answer.content().len(),
                "text": answer.content(),
            }),
        ));

        Ok(answer)
    }

    /// Format, open a stream and relay it into `sink`.
    pub async fn stream_to<S>(
        &self,
        template: &PromptTemplate,
        variables: &TemplateVariables,
        params: &GenerationParams,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<RelayOutcome, RunPromptError>
    where
        S: FrameSink + ?Sized,
    {
        let messages = self.format(template, variables)?;

        let session = self
            .model
            .stream(&messages, params, cancel)
            .await
            .map_err(|e| match e {
                GatewayError::Cancelled => RunPromptError::Cancelled,
                other => RunPromptError::Setup(other),
            })?;

        let outcome = self.relay.run(session, sink, cancel).await;

        self.conversation_logger.log(ConversationEvent::new(
            "stream_outcome",
            serde_json::json!({
                "provider": self.model.provider(),
                "state": outcome.state.as_str(),
                "fragments": outcome.fragments,
                "error": outcome.error,
            }),
        ));

        Ok(outcome)
    }

    fn format(
        &self,
        template: &PromptTemplate,
        variables: &TemplateVariables,
    ) -> Result<Vec<Message>, TemplateError> {
        let messages = template.format(variables)?;

        info!(
            provider = self.model.provider(),
            "Formatted prompt into {} messages",
            messages.len()
        );
        for message in &messages {
            debug!(role = %message.role(), "{}", message.content());
        }

        self.conversation_logger.log(ConversationEvent::new(
            "prompt_formatted",
            serde_json::json!({ "messages": &messages }),
        ));

        Ok(messages)
    }
}
