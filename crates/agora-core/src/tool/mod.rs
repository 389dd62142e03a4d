//! Tool abstraction.
//!
//! Tools are named callable capabilities exposed to the agent. Each tool
//! carries a description and a JSON schema for its parameters; both are
//! metadata consumed by the model when deciding what to invoke.
//!
//! Tool failures never propagate as errors past the tool boundary: a
//! failing tool returns an error-flagged [`ToolOutput`] string that is
//! fed back to the model like any other result.

mod builtin;
mod expr;
mod registry;

pub use builtin::{Calculate, CreateFile, DeleteFile, GetTime, GetWeather, SearchDatabase};
pub use registry::ToolRegistry;

use async_trait::async_trait;
use serde_json::Value;

/// The result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Text returned to the model.
    pub text: String,
    /// Whether the invocation failed. Error outputs are still ordinary
    /// results from the chat loop's point of view.
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// A named callable capability with a declared argument schema.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as the model sees it.
    fn name(&self) -> String;

    /// Human-readable description, consumed by the model.
    fn description(&self) -> String;

    /// JSON schema for the tool's arguments.
    fn parameters(&self) -> Value;

    /// Whether invoking this tool requires an operator approval first.
    /// The distinction is static, declared at registration time.
    fn requires_approval(&self) -> bool {
        false
    }

    /// Executes the tool. Failures are reported inside the returned
    /// [`ToolOutput`], never as an `Err`.
    async fn invoke(&self, args: Value) -> ToolOutput;
}

/// Reads a required string argument out of a tool argument object.
pub(crate) fn string_arg<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolOutput> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolOutput::error(format!("Error: missing required argument '{name}'")))
}
