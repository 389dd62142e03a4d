//! Timing middleware stage.

use super::{Middleware, Next};
use crate::agent::AgentReply;
use agora_core::{ConversationHistory, Result};
use async_trait::async_trait;
use chrono::Local;
use std::time::Instant;

/// Records how long each agent run takes. Never blocks a request.
pub struct TimingMiddleware;

#[async_trait]
impl Middleware for TimingMiddleware {
    fn name(&self) -> &str {
        "timing"
    }

    async fn handle(&self, history: &ConversationHistory, next: Next<'_>) -> Result<AgentReply> {
        let started_at = Local::now();
        let timer = Instant::now();
        println!("[timing] started at {}", started_at.format("%H:%M:%S"));

        let reply = next.run(history).await;

        let elapsed = timer.elapsed();
        println!("[timing] completed in {:.2}s", elapsed.as_secs_f64());
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "agent run timed");

        reply
    }
}

#[cfg(test)]
mod tests {
    use super::super::MiddlewarePipeline;
    use super::super::testing::MockAgent;
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn timing_never_blocks() {
        let (agent, calls) = MockAgent::new("timed");
        let pipeline = MiddlewarePipeline::builder(agent)
            .with(TimingMiddleware)
            .build();

        let mut history = ConversationHistory::new();
        history.push_user("anything at all");

        let reply = crate::agent::Agent::run(&pipeline, &history).await.unwrap();
        assert_eq!(reply.text, "timed");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
