//! Demo 7: a two-node sequential workflow.

use crate::console;
use agora_core::Result;
use agora_core::workflow::{Executor, FnExecutor, WorkflowBuilder, WorkflowEvent, run_streaming};
use agora_infrastructure::AppSettings;
use colored::Colorize;
use std::sync::Arc;

pub async fn run(_settings: &AppSettings) -> Result<()> {
    console::print_banner(
        "Sequential Workflow",
        "One node's output is the next node's input: uppercase, then reverse.",
    );

    let uppercase: Arc<dyn Executor> = Arc::new(FnExecutor::new("UppercaseExecutor", |s: &str| {
        s.to_uppercase()
    }));
    let reverse: Arc<dyn Executor> = Arc::new(FnExecutor::new("ReverseTextExecutor", |s: &str| {
        s.chars().rev().collect()
    }));

    let workflow = WorkflowBuilder::new(Arc::clone(&uppercase))
        .add_edge(&uppercase, &reverse)
        .with_output_from(&reverse)
        .build();

    let input = "Hello, World!";
    println!("Input: {input}");
    println!();

    let mut events = run_streaming(workflow, input.to_string());
    while let Some(event) = events.recv().await {
        match event {
            WorkflowEvent::ExecutorCompleted {
                executor_id,
                output,
            } => println!("{executor_id}: {output}"),
            WorkflowEvent::WorkflowOutput { data } => {
                println!("\n{} {data}", "Workflow output:".green().bold());
            }
            WorkflowEvent::ExecutorFailed { executor_id, error } => {
                console::print_error(&format!("executor '{executor_id}' failed: {error}"));
            }
            WorkflowEvent::ExecutorInvoked { .. } => {}
        }
    }

    Ok(())
}
