//! Bridges remote MCP tools into the local tool abstraction.

use super::client::McpClient;
use super::protocol::McpToolDefinition;
use agora_core::{Tool, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// One remote tool exposed through the local [`Tool`] trait.
///
/// Transport and protocol failures become error-text outputs, matching
/// the local tool boundary contract.
pub struct McpTool {
    client: Arc<McpClient>,
    definition: McpToolDefinition,
}

impl McpTool {
    pub fn new(client: Arc<McpClient>, definition: McpToolDefinition) -> Self {
        Self { client, definition }
    }
}

#[async_trait]
impl Tool for McpTool {
    fn name(&self) -> String {
        self.definition.name.clone()
    }

    fn description(&self) -> String {
        self.definition.description.clone().unwrap_or_default()
    }

    fn parameters(&self) -> Value {
        self.definition.input_schema.clone()
    }

    async fn invoke(&self, args: Value) -> ToolOutput {
        match self.client.call_tool(&self.definition.name, args).await {
            Ok(result) if result.is_error => ToolOutput::error(result.text()),
            Ok(result) => ToolOutput::success(result.text()),
            Err(e) => ToolOutput::error(format!(
                "Error calling '{}' on MCP server '{}': {e}",
                self.definition.name,
                self.client.server_name()
            )),
        }
    }
}

/// Registers a server's whole tool catalog into a registry.
pub fn register_mcp_tools(
    registry: &mut ToolRegistry,
    client: &Arc<McpClient>,
    tools: Vec<McpToolDefinition>,
) {
    for definition in tools {
        registry.register(McpTool::new(Arc::clone(client), definition));
    }
}
