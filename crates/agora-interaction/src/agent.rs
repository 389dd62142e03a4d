//! The agent abstraction.
//!
//! An [`Agent`] accepts a conversation history and returns either a text
//! reply or, internally, a round of tool invocations it resolves before
//! replying. The trait is the seam the middleware chain composes around.

use agora_core::{ConversationHistory, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Token usage accumulated over one agent run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn add(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }

    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// The final reply of one agent run.
#[derive(Debug, Clone, Default)]
pub struct AgentReply {
    pub text: String,
    pub usage: TokenUsage,
}

impl AgentReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
        }
    }
}

/// An entity that turns a conversation history into a reply.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, history: &ConversationHistory) -> Result<AgentReply>;
}

/// Maps one pending dangerous tool invocation to an accept/reject
/// decision. Implementations block until the operator decides.
#[async_trait]
pub trait ApprovalHandler: Send + Sync {
    async fn request_approval(&self, function_name: &str, arguments: &Value) -> bool;
}
