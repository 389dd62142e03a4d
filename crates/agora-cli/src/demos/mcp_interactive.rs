//! Demo 6: chatting with tools from an MCP server.

use crate::console;
use agora_core::{ConversationHistory, Result, ToolRegistry};
use agora_infrastructure::AppSettings;
use agora_infrastructure::mcp::{McpClient, StdioTransport, register_mcp_tools};
use agora_interaction::{Agent, ChatAgent};
use std::sync::Arc;

const GITHUB_SERVER_PACKAGE: &str = "@modelcontextprotocol/server-github";

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;

    console::print_banner(
        "MCP Interactive",
        "Tools from a Model Context Protocol server, exposed to the agent.",
    );

    console::print_note(&format!("Starting GitHub MCP server (npx {GITHUB_SERVER_PACKAGE})..."));

    let token = settings.github_mcp.github_personal_access_token.as_str();
    let transport = if token.is_empty() {
        StdioTransport::spawn("npx", &["-y", GITHUB_SERVER_PACKAGE])?
    } else {
        StdioTransport::spawn_with_env(
            "npx",
            &["-y", GITHUB_SERVER_PACKAGE],
            &[("GITHUB_PERSONAL_ACCESS_TOKEN", token)],
        )?
    };

    let client = Arc::new(McpClient::connect(transport, "github").await?);
    let catalog = client.list_tools().await?;
    console::print_note(&format!(
        "Server '{}' exposes {} tools",
        client.server_name(),
        catalog.len()
    ));

    let mut tools = ToolRegistry::new();
    register_mcp_tools(&mut tools, &client, catalog);

    let agent = ChatAgent::new(
        super::openai_client(azure),
        "You answer questions related to GitHub repositories only.",
    )
    .with_tools(tools);

    println!();

    let mut rl = console::editor()?;
    let mut history = ConversationHistory::new();

    loop {
        let Some(input) = console::read_line(&mut rl, "You: ") else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if console::should_exit(&input) {
            console::print_goodbye();
            break;
        }

        history.push_user(&input);
        match agent.run(&history).await {
            Ok(reply) => {
                console::print_agent_reply(&reply.text);
                history.push_assistant(&reply.text);
            }
            Err(e) => console::print_error(&format!("Error during chat: {e}")),
        }
    }

    Ok(())
}
