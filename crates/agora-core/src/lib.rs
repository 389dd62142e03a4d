//! Core domain types for the Agora demo suite.
//!
//! This crate holds everything that does not talk to a model or the
//! filesystem: the shared error type, conversation messages, the tool
//! abstraction with its builtin implementations, the user profile model,
//! and the workflow graph with its execution engine.

pub mod error;
pub mod message;
pub mod profile;
pub mod tool;
pub mod workflow;

pub use error::{AgoraError, Result};
pub use message::{ConversationHistory, ConversationMessage, MessageRole};
pub use profile::UserProfile;
pub use tool::{Tool, ToolOutput, ToolRegistry};
