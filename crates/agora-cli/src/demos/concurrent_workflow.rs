//! Demo 8: concurrent fan-out/fan-in over two agents.

use crate::console;
use agora_core::Result;
use agora_core::workflow::{Executor, FnExecutor, WorkflowBuilder, WorkflowEvent, run_streaming};
use agora_infrastructure::AppSettings;
use agora_interaction::{AgentExecutor, ChatAgent};
use colored::Colorize;
use std::sync::Arc;

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;
    let client = super::openai_client(azure);

    console::print_banner(
        "Concurrent Workflow",
        "The same question fans out to two independent agents; an aggregation node \
         waits for both contributions before producing combined output.",
    );

    let physicist: Arc<dyn Executor> = Arc::new(AgentExecutor::from_chat_agent(
        ChatAgent::new(
            client.clone(),
            "You are an expert in physics. You answer questions from a physics perspective.",
        )
        .with_name("Physicist"),
    ));
    let chemist: Arc<dyn Executor> = Arc::new(AgentExecutor::from_chat_agent(
        ChatAgent::new(
            client,
            "You are an expert in chemistry. You answer questions from a chemistry perspective.",
        )
        .with_name("Chemist"),
    ));

    let start: Arc<dyn Executor> = Arc::new(FnExecutor::new("start", |s: &str| s.to_string()));
    let aggregator: Arc<dyn Executor> =
        Arc::new(FnExecutor::new("aggregator", |s: &str| s.to_string()));

    let workflow = WorkflowBuilder::new(Arc::clone(&start))
        .add_fan_out_edge(&start, &[Arc::clone(&physicist), Arc::clone(&chemist)])
        .add_fan_in_edge(&[physicist, chemist], &aggregator)
        .with_output_from(&aggregator)
        .build();

    let question = "What is temperature?";
    println!("Question: {question}");
    println!();

    let mut events = run_streaming(workflow, question.to_string());
    while let Some(event) = events.recv().await {
        match event {
            WorkflowEvent::ExecutorInvoked { executor_id } => {
                console::print_note(&format!("{executor_id} started"));
            }
            WorkflowEvent::WorkflowOutput { data } => {
                println!("\n{}", "Workflow completed with results:".green().bold());
                println!("{data}");
            }
            WorkflowEvent::ExecutorFailed { executor_id, error } => {
                console::print_error(&format!("executor '{executor_id}' failed: {error}"));
            }
            WorkflowEvent::ExecutorCompleted { .. } => {}
        }
    }

    Ok(())
}
