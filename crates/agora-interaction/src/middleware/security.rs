//! Security middleware stage.

use super::{Middleware, Next};
use crate::agent::AgentReply;
use agora_core::{AgoraError, ConversationHistory, Result};
use async_trait::async_trait;

/// Keywords that block a request outright.
pub const BLOCKED_KEYWORDS: [&str; 5] = ["password", "secret", "hack", "exploit", "bypass"];

/// Blocks requests whose most recent user message contains a denylisted
/// keyword. Only the latest user-authored message is inspected; earlier
/// turns have already been screened.
pub struct SecurityMiddleware {
    keywords: Vec<String>,
}

impl SecurityMiddleware {
    pub fn new() -> Self {
        Self {
            keywords: BLOCKED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn with_keywords(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl Default for SecurityMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for SecurityMiddleware {
    fn name(&self) -> &str {
        "security"
    }

    async fn handle(&self, history: &ConversationHistory, next: Next<'_>) -> Result<AgentReply> {
        if let Some(message) = history.last_user_message() {
            let lowered = message.to_lowercase();
            if let Some(keyword) = self.keywords.iter().find(|k| lowered.contains(k.as_str())) {
                tracing::warn!(keyword = %keyword, "request blocked by security middleware");
                println!("[security] request blocked, detected: '{keyword}'");
                return Err(AgoraError::SecurityBlocked {
                    keyword: keyword.clone(),
                });
            }
        }

        next.run(history).await
    }
}
