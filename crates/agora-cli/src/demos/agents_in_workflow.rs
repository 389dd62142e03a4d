//! Demo 9: three agents in a sequential workflow, one with MCP tools.

use crate::console;
use agora_core::workflow::{Executor, WorkflowBuilder, WorkflowEvent, run_streaming};
use agora_core::{Result, ToolRegistry};
use agora_infrastructure::AppSettings;
use agora_infrastructure::mcp::{McpClient, StdioTransport, register_mcp_tools};
use agora_interaction::{AgentExecutor, ChatAgent};
use colored::Colorize;
use std::sync::Arc;

const ARCHITECT_INSTRUCTIONS: &str = "You are an experienced software architect. Your task is to:\n\
    1. Carefully analyze user requirements\n\
    2. Define a clear technical architecture\n\
    3. Choose appropriate technologies and patterns\n\
    4. Create a detailed specification that a developer can implement from\n\n\
    Your response should include: system overview, technology choices, API endpoints, \
    data models, architecture patterns, security considerations. Be concise but complete.";

const CODER_INSTRUCTIONS: &str = "You are a skilled developer. Your task is to:\n\
    1. Carefully read the architect's specification\n\
    2. Implement complete, working code\n\
    3. Follow best practices and conventions\n\
    4. Write clean, well-structured code\n\n\
    Your code should be complete, follow the specification exactly, include appropriate \
    comments and be production quality. Produce ONLY code with necessary comments.\n\
    When all code is ready, write the solution files into the working folder using your \
    file tools, then respond with 'CODE COMPLETE'.";

const REVIEWER_INSTRUCTIONS: &str = "You are a senior code reviewer. Your task is to:\n\
    1. Review the code against the specification\n\
    2. Identify potential bugs\n\
    3. Check for security issues\n\
    4. Verify best practices\n\
    5. Provide constructive feedback\n\n\
    Focus on functional correctness, security, performance, readability, error handling \
    and testability. Provide concrete, actionable feedback. Be honest but constructive.";

const REQUIREMENT: &str = "Build a REST API for a todo application with the following features:\n\
    - Create new todos\n\
    - Get all todos\n\
    - Get a specific todo\n\
    - Update a todo\n\
    - Delete a todo\n\
    - Mark todo as complete/incomplete\n\n\
    Each todo should have: id, title, description, isCompleted, createdDate.";

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;
    let client = super::openai_client(azure);

    console::print_banner(
        "Agents in Workflow",
        "Architect, developer and reviewer agents chained in a sequential workflow.",
    );

    let mut coder_tools = ToolRegistry::new();

    console::print_note("Starting filesystem MCP server...");
    let fs_transport = StdioTransport::spawn(
        "npx",
        &[
            "-y",
            "@modelcontextprotocol/server-filesystem",
            super::DEMO_FILES_DIR,
        ],
    )?;
    let fs_client = Arc::new(McpClient::connect(fs_transport, "filesystem").await?);
    let fs_catalog = fs_client.list_tools().await?;
    register_mcp_tools(&mut coder_tools, &fs_client, fs_catalog);

    let token = settings.github_mcp.github_personal_access_token.as_str();
    if token.is_empty() {
        console::print_note("No GitHub token configured; the developer agent runs without GitHub tools");
    } else {
        console::print_note("Starting GitHub MCP server...");
        let gh_transport = StdioTransport::spawn_with_env(
            "npx",
            &["-y", "@modelcontextprotocol/server-github"],
            &[("GITHUB_PERSONAL_ACCESS_TOKEN", token)],
        )?;
        let gh_client = Arc::new(McpClient::connect(gh_transport, "github").await?);
        let gh_catalog = gh_client.list_tools().await?;
        register_mcp_tools(&mut coder_tools, &gh_client, gh_catalog);
    }

    let architect: Arc<dyn Executor> = Arc::new(AgentExecutor::from_chat_agent(
        ChatAgent::new(client.clone(), ARCHITECT_INSTRUCTIONS).with_name("Architect"),
    ));
    let developer: Arc<dyn Executor> = Arc::new(AgentExecutor::from_chat_agent(
        ChatAgent::new(client.clone(), CODER_INSTRUCTIONS)
            .with_tools(coder_tools)
            .with_name("Developer"),
    ));
    let reviewer: Arc<dyn Executor> = Arc::new(AgentExecutor::from_chat_agent(
        ChatAgent::new(client, REVIEWER_INSTRUCTIONS).with_name("Reviewer"),
    ));

    let workflow = WorkflowBuilder::new(Arc::clone(&architect))
        .add_edge(&architect, &developer)
        .add_edge(&developer, &reviewer)
        .with_output_from(&reviewer)
        .build();

    println!("User requirement:\n{REQUIREMENT}");
    println!("{}", console::rule());
    println!();

    let mut events = run_streaming(workflow, REQUIREMENT.to_string());
    while let Some(event) = events.recv().await {
        match event {
            WorkflowEvent::ExecutorInvoked { executor_id } => {
                println!();
                println!("{}", executor_id.to_uppercase().bold().bright_magenta());
                println!("{}", "-".repeat(70));
            }
            WorkflowEvent::ExecutorCompleted { output, .. } => {
                println!("{output}");
            }
            WorkflowEvent::ExecutorFailed { executor_id, error } => {
                console::print_error(&format!("executor '{executor_id}' failed: {error}"));
            }
            WorkflowEvent::WorkflowOutput { .. } => {
                println!();
                println!("{}", console::rule().green());
                println!("{}", "Workflow completed".green().bold());
            }
        }
    }

    Ok(())
}
