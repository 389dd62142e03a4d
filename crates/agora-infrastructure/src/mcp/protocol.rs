//! MCP JSON-RPC wire types.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const JSONRPC_VERSION: &str = "2.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// A request without an id: a JSON-RPC notification.
    pub fn notification(method: impl Into<String>) -> Self {
        Self::new(method, None)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Parameters for the `initialize` handshake.
pub fn initialize_params(client_name: &str) -> Value {
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {
            "name": client_name,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

/// One tool advertised by a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<McpToolDefinition>,
}

/// Result of one `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct McpToolCallResult {
    #[serde(default)]
    pub content: Vec<McpContentItem>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl McpToolCallResult {
    /// Concatenated text content items.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|item| item.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One content item in a tool-call result. Non-text items keep their
/// kind but contribute no text.
#[derive(Debug, Clone, Deserialize)]
pub struct McpContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_serializes_without_id() {
        let request = JsonRpcRequest::notification("notifications/initialized");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert!(value.get("id").is_none());
        assert!(value.get("params").is_none());
    }

    #[test]
    fn tool_definition_uses_input_schema_casing() {
        let json_text = r#"{
            "name": "create_issue",
            "description": "Create a GitHub issue",
            "inputSchema": { "type": "object", "properties": {} }
        }"#;

        let tool: McpToolDefinition = serde_json::from_str(json_text).unwrap();
        assert_eq!(tool.name, "create_issue");
        assert!(tool.input_schema.is_object());
    }

    #[test]
    fn call_result_joins_text_items() {
        let json_text = r#"{
            "content": [
                { "type": "text", "text": "line one" },
                { "type": "image", "data": "..." },
                { "type": "text", "text": "line two" }
            ],
            "isError": false
        }"#;

        let result: McpToolCallResult = serde_json::from_str(json_text).unwrap();
        assert_eq!(result.text(), "line one\nline two");
        assert!(!result.is_error);
    }

    #[test]
    fn error_response_deserializes() {
        let json_text = r#"{
            "jsonrpc": "2.0",
            "error": { "code": -32601, "message": "Method not found" },
            "id": 3
        }"#;

        let response: JsonRpcResponse = serde_json::from_str(json_text).unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
        assert_eq!(response.id, 3);
    }
}
