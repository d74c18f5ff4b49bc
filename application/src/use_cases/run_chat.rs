//! Run Chat use case.
//!
//! The ad-hoc chat flow behind `POST /chat`: validate the request, build the
//! message list from the optional system text and the query, then either
//! generate one complete answer or open a stream for [`StreamRelay`].
//!
//! Validation happens before the model is touched; a malformed request never
//! reaches [`ChatModel`].

use crate::ports::chat_model::{ChatModel, GatewayError, StreamSession};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::frame_sink::FrameSink;
use crate::use_cases::relay_stream::{RelayOutcome, StreamRelay};
use relay_domain::util::preview;
use relay_domain::{DomainError, GenerationParams, Message, Query};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while serving a chat request.
#[derive(Error, Debug)]
pub enum RunChatError {
    /// Malformed request; reported to the caller as a client error.
    #[error("invalid request: {0}")]
    Validation(#[from] DomainError),

    /// The model could not be reached or refused to start.
    #[error("stream setup failed: {0}")]
    Setup(GatewayError),

    /// The model failed while producing a complete answer.
    #[error("generation failed: {0}")]
    Upstream(GatewayError),

    #[error("request cancelled")]
    Cancelled,
}

impl RunChatError {
    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RunChatError::Validation(_))
    }
}

/// Raw chat request as received from a client.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub query: String,
    pub system: Option<String>,
    pub params: GenerationParams,
    pub stream: bool,
}

/// A validated chat request.
#[derive(Debug, Clone)]
pub struct ChatInput {
    query: Query,
    system: Option<String>,
    params: GenerationParams,
}

impl ChatInput {
    /// Validate the query; blank system text counts as absent.
    pub fn new(
        query: impl Into<String>,
        system: Option<String>,
        params: GenerationParams,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            query: Query::try_new(query)?,
            system: system.filter(|s| !s.trim().is_empty()),
            params,
        })
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// `[system?, user]`
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(self.query.content()));
        messages
    }
}

impl TryFrom<ChatRequest> for ChatInput {
    type Error = DomainError;

    fn try_from(request: ChatRequest) -> Result<Self, Self::Error> {
        ChatInput::new(request.query, request.system, request.params)
    }
}

/// What a dispatched chat request produced.
pub enum ChatReply {
    /// The complete answer.
    Complete(Message),
    /// An open stream, ready for [`RunChatUseCase::relay`].
    Stream(Box<dyn StreamSession>),
}

impl std::fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatReply::Complete(message) => f.debug_tuple("Complete").field(message).finish(),
            ChatReply::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Use case for the ad-hoc chat flow.
pub struct RunChatUseCase {
    model: Arc<dyn ChatModel>,
    relay: StreamRelay,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for RunChatUseCase {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            relay: self.relay,
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl RunChatUseCase {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            relay: StreamRelay::new(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Label of the backing provider.
    pub fn provider(&self) -> &str {
        self.model.provider()
    }

    /// Validate `request` and route it to generate or stream.
    pub async fn dispatch(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatReply, RunChatError> {
        let stream = request.stream;
        let input = ChatInput::try_from(request)?;

        if stream {
            self.open_stream(&input, cancel).await.map(ChatReply::Stream)
        } else {
            self.generate(&input, cancel).await.map(ChatReply::Complete)
        }
    }

    /// Produce one complete answer.
    pub async fn generate(
        &self,
        input: &ChatInput,
        cancel: &CancellationToken,
    ) -> Result<Message, RunChatError> {
        self.log_request(input, false);

        let message = self
            .model
            .generate(&input.messages(), input.params(), cancel)
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    RunChatError::Cancelled
                } else {
                    warn!(provider = self.model.provider(), "Generate failed: {}", e);
                    RunChatError::Upstream(e)
                }
            })?;

        debug!("Generated {} bytes", message.content().len());
        self.conversation_logger.log(ConversationEvent::new(
            "generate_response",
            serde_json::json!({
                "provider": self.model.provider(),
                "bytes": message.content().len(),
                "text": message.content(),
            }),
        ));

        Ok(message)
    }

    /// Open an upstream stream. Failures here are setup failures and are
    /// never turned into frames.
    pub async fn open_stream(
        &self,
        input: &ChatInput,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn StreamSession>, RunChatError> {
        self.log_request(input, true);

        self.model
            .stream(&input.messages(), input.params(), cancel)
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    RunChatError::Cancelled
                } else {
                    warn!(provider = self.model.provider(), "Stream setup failed: {}", e);
                    RunChatError::Setup(e)
                }
            })
    }

    /// Relay an opened session into `sink` and record the outcome.
    pub async fn relay<S>(
        &self,
        session: Box<dyn StreamSession>,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> RelayOutcome
    where
        S: FrameSink + ?Sized,
    {
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

        outcome
    }

    fn log_request(&self, input: &ChatInput, stream: bool) {
        info!(
            provider = self.model.provider(),
            stream,
            "Chat request: {}",
            preview(input.query().content(), 100)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "chat_request",
            serde_json::json!({
                "provider": self.model.provider(),
                "stream": stream,
                "query": input.query().content(),
                "params": input.params(),
            }),
        ));
    }
}
