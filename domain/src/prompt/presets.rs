//! Built-in templates.

use super::template::{PromptTemplate, Segment};

/// Variable holding prior conversation turns in the built-in templates.
pub const CHAT_HISTORY: &str = "chat_history";

impl PromptTemplate {
    /// Supportive counselor persona for programmers (Chinese prompt text).
    ///
    /// Variables: `role`, `style`, `question`, and optionally
    /// [`CHAT_HISTORY`] for earlier turns.
    pub fn counselor() -> Self {
        PromptTemplate::new(vec![
            Segment::system(
                "你是一个{role}，你需要用{style}的语气来回答用户的问题。\
                 你的目标是帮助程序员保持积极乐观的心态, \
                 提供技术建议的同时也要关注他们的心理健康。",
            ),
            Segment::history(CHAT_HISTORY, true),
            Segment::user("问题: {question}"),
        ])
    }
}
