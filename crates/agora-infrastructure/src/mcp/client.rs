//! MCP client: handshake, tool discovery, tool invocation.

use super::protocol::{
    McpToolCallResult, McpToolDefinition, ToolsListResult, initialize_params,
};
use super::transport::StdioTransport;
use agora_core::{AgoraError, Result};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Client for one MCP server connection.
pub struct McpClient {
    transport: Arc<StdioTransport>,
    server_name: String,
}

impl McpClient {
    /// Performs the initialize handshake and returns a ready client.
    pub async fn connect(transport: Arc<StdioTransport>, server_name: impl Into<String>) -> Result<Self> {
        let server_name = server_name.into();

        let response = transport
            .request("initialize", Some(initialize_params("agora")))
            .await?;
        let server_info = response
            .result
            .as_ref()
            .and_then(|r| r.get("serverInfo"))
            .and_then(|i| i.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(server = %server_name, reported = server_info, "MCP server initialized");

        transport.notify("notifications/initialized").await?;

        Ok(Self {
            transport,
            server_name,
        })
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Queries the server's tool catalog.
    pub async fn list_tools(&self) -> Result<Vec<McpToolDefinition>> {
        let response = self.transport.request("tools/list", None).await?;
        let result = response
            .result
            .ok_or_else(|| AgoraError::internal("tools/list response missing result"))?;
        let parsed: ToolsListResult = serde_json::from_value(result)?;
        Ok(parsed.tools)
    }

    /// Invokes one remote tool.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolCallResult> {
        let params = json!({ "name": name, "arguments": arguments });
        let response = self.transport.request("tools/call", Some(params)).await?;
        let result = response
            .result
            .ok_or_else(|| AgoraError::internal("tools/call response missing result"))?;
        Ok(serde_json::from_value(result)?)
    }
}
