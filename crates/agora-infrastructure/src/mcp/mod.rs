//! Model Context Protocol (MCP) client.
//!
//! Talks JSON-RPC 2.0 to tool-protocol servers spawned as subprocesses
//! over stdin/stdout. The protocol itself is a delegation boundary: this
//! module only spawns servers, queries their tool catalogs and forwards
//! invocations; the servers own everything else.

mod client;
mod protocol;
mod tool_bridge;
mod transport;

pub use client::McpClient;
pub use protocol::{McpContentItem, McpToolCallResult, McpToolDefinition};
pub use tool_bridge::{McpTool, register_mcp_tools};
pub use transport::StdioTransport;
