//! Test doubles for the HTTP surface.

use async_trait::async_trait;
use relay_application::ports::chat_model::{ChatModel, GatewayError, StreamSession};
use relay_domain::{GenerationParams, Message, MessageFragment};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// What the scripted model does when asked to stream.
#[derive(Clone)]
pub enum Script {
    /// Fragments, then either end of stream or a failure.
    Stream(Vec<&'static str>, Option<GatewayError>),
    /// Refuse to open the stream.
    Refuse(GatewayError),
}

pub struct ScriptedModel {
    script: Script,
    answer: &'static str,
    pub calls: AtomicUsize,
    pub releases: Arc<AtomicUsize>,
}

impl ScriptedModel {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            answer: "complete answer",
            calls: AtomicUsize::new(0),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

struct ScriptedStream {
    steps: VecDeque<Result<Option<MessageFragment>, GatewayError>>,
    releases: Arc<AtomicUsize>,
}

#[async_trait]
impl StreamSession for ScriptedStream {
    async fn next(&mut self) -> Result<Option<MessageFragment>, GatewayError> {
        self.steps.pop_front().unwrap_or(Ok(None))
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn provider(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        _messages: &[Message],
        _params: &GenerationParams,
        _cancel: &CancellationToken,
    ) -> Result<Message, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Refuse(error) => Err(error.clone()),
            Script::Stream(..) => Ok(Message::assistant(self.answer)),
        }
    }

    async fn stream(
        &self,
        _messages: &[Message],
        _params: &GenerationParams,
        _cancel: &CancellationToken,
    ) -> Result<Box<dyn StreamSession>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Refuse(error) => Err(error.clone()),
            Script::Stream(parts, failure) => {
                let mut steps: VecDeque<_> = parts
                    .iter()
                    .map(|p| Ok(Some(MessageFragment::new(*p))))
                    .collect();
                steps.push_back(match failure {
                    Some(error) => Err(error.clone()),
                    None => Ok(None),
                });
                Ok(Box::new(ScriptedStream {
                    steps,
                    releases: self.releases.clone(),
                }))
            }
        }
    }
}
