//! Middleware chain around agent runs.
//!
//! Stages compose by nesting in registration order: the stage registered
//! first is outermost, observes the request first, and can veto
//! everything inside it. A stage short-circuits by returning an error
//! instead of calling [`Next::run`]; no inner stage or the agent itself
//! executes after that.

mod security;
mod timing;

pub use security::SecurityMiddleware;
pub use timing::TimingMiddleware;

use crate::agent::{Agent, AgentReply};
use agora_core::{ConversationHistory, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// The continuation of a middleware chain: the remaining stages plus the
/// terminal agent call.
pub struct Next<'a> {
    stages: &'a [Arc<dyn Middleware>],
    agent: &'a dyn Agent,
}

impl Next<'_> {
    pub async fn run(self, history: &ConversationHistory) -> Result<AgentReply> {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                stage
                    .handle(
                        history,
                        Next {
                            stages: rest,
                            agent: self.agent,
                        },
                    )
                    .await
            }
            None => self.agent.run(history).await,
        }
    }
}

/// One stage wrapped around the "run agent turn" operation.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Stage name, used in log output.
    fn name(&self) -> &str;

    /// Inspect the request, then either delegate via `next.run(..)` or
    /// short-circuit by returning without delegating.
    async fn handle(&self, history: &ConversationHistory, next: Next<'_>) -> Result<AgentReply>;
}

/// An ordered middleware chain composed around an agent.
///
/// Built from an explicit stage list so ordering and short-circuit
/// semantics are testable in isolation from any real agent.
pub struct MiddlewarePipeline {
    stages: Vec<Arc<dyn Middleware>>,
    agent: Arc<dyn Agent>,
}

impl MiddlewarePipeline {
    pub fn builder(agent: impl Agent + 'static) -> MiddlewarePipelineBuilder {
        MiddlewarePipelineBuilder {
            stages: Vec::new(),
            agent: Arc::new(agent),
        }
    }
}

pub struct MiddlewarePipelineBuilder {
    stages: Vec<Arc<dyn Middleware>>,
    agent: Arc<dyn Agent>,
}

impl MiddlewarePipelineBuilder {
    /// Appends a stage; earlier stages end up outermost.
    pub fn with(mut self, stage: impl Middleware + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> MiddlewarePipeline {
        MiddlewarePipeline {
            stages: self.stages,
            agent: self.agent,
        }
    }
}

#[async_trait]
impl Agent for MiddlewarePipeline {
    async fn run(&self, history: &ConversationHistory) -> Result<AgentReply> {
        Next {
            stages: &self.stages,
            agent: self.agent.as_ref(),
        }
        .run(history)
        .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Agent double that counts how often it is reached.
    pub struct MockAgent {
        pub reply: String,
        pub calls: Arc<AtomicUsize>,
    }

    impl MockAgent {
        pub fn new(reply: impl Into<String>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    reply: reply.into(),
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl Agent for MockAgent {
        async fn run(&self, _history: &ConversationHistory) -> Result<AgentReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AgentReply::text(self.reply.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockAgent;
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;

    /// Records its name before and after delegating.
    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Recording {
        fn name(&self) -> &str {
            self.name
        }

        async fn handle(
            &self,
            history: &ConversationHistory,
            next: Next<'_>,
        ) -> Result<AgentReply> {
            self.log.lock().unwrap().push(format!("{}:before", self.name));
            let reply = next.run(history).await;
            self.log.lock().unwrap().push(format!("{}:after", self.name));
            reply
        }
    }

    #[tokio::test]
    async fn stages_nest_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (agent, calls) = MockAgent::new("done");

        let pipeline = MiddlewarePipeline::builder(agent)
            .with(Recording {
                name: "outer",
                log: Arc::clone(&log),
            })
            .with(Recording {
                name: "inner",
                log: Arc::clone(&log),
            })
            .build();

        let mut history = ConversationHistory::new();
        history.push_user("hello");
        let reply = pipeline.run(&history).await.unwrap();

        assert_eq!(reply.text, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer:before", "inner:before", "inner:after", "outer:after"]
        );
    }

    #[tokio::test]
    async fn empty_pipeline_is_a_passthrough() {
        let (agent, calls) = MockAgent::new("plain");
        let pipeline = MiddlewarePipeline::builder(agent).build();

        let mut history = ConversationHistory::new();
        history.push_user("hi");
        let reply = pipeline.run(&history).await.unwrap();

        assert_eq!(reply.text, "plain");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
