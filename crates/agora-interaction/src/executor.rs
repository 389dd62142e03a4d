//! Agents as workflow executors.

use crate::agent::Agent;
use crate::chat_agent::ChatAgent;
use agora_core::workflow::Executor;
use agora_core::{ConversationHistory, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Wraps a named agent as a workflow node.
///
/// The node's input becomes a single-message conversation; the output is
/// prefixed with the node id so fan-in joins read as "Author: text".
pub struct AgentExecutor {
    id: String,
    agent: Arc<dyn Agent>,
}

impl AgentExecutor {
    pub fn new(id: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self {
            id: id.into(),
            agent,
        }
    }

    /// Uses the chat agent's own name as the node id.
    pub fn from_chat_agent(agent: ChatAgent) -> Self {
        let id = agent.name().unwrap_or("agent").to_string();
        Self {
            id,
            agent: Arc::new(agent),
        }
    }
}

#[async_trait]
impl Executor for AgentExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn handle(&self, input: &str) -> Result<String> {
        let mut history = ConversationHistory::new();
        history.push_user(input);
        let reply = self.agent.run(&history).await?;
        Ok(format!("{}: {}", self.id, reply.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentReply;

    struct CannedAgent;

    #[async_trait]
    impl Agent for CannedAgent {
        async fn run(&self, history: &ConversationHistory) -> Result<AgentReply> {
            Ok(AgentReply::text(format!(
                "echo {}",
                history.last_user_message().unwrap_or_default()
            )))
        }
    }

    #[tokio::test]
    async fn output_is_prefixed_with_the_node_id() {
        let executor = AgentExecutor::new("Physicist", Arc::new(CannedAgent));
        let output = executor.handle("What is temperature?").await.unwrap();
        assert_eq!(output, "Physicist: echo What is temperature?");
    }
}
