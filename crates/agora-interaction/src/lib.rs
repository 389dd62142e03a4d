//! Model interaction layer.
//!
//! Everything that talks to the chat-completions endpoint lives here:
//! the REST client, the [`ChatAgent`] tool-call loop, the middleware
//! chain wrapped around agent runs, structured-extraction schemas, and
//! the AI memory extractor.

pub mod agent;
pub mod azure_openai;
pub mod chat_agent;
pub mod executor;
pub mod extraction;
pub mod memory;
pub mod middleware;

pub use agent::{Agent, AgentReply, ApprovalHandler, TokenUsage};
pub use azure_openai::AzureOpenAiClient;
pub use chat_agent::ChatAgent;
pub use executor::AgentExecutor;
pub use memory::MemoryExtractor;
pub use middleware::{Middleware, MiddlewarePipeline, Next, SecurityMiddleware, TimingMiddleware};
