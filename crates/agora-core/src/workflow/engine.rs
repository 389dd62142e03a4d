//! Workflow execution engine.
//!
//! Executes a [`Workflow`] wave by wave: a node becomes ready once every
//! one of its in-edges has delivered a contribution, and all ready nodes
//! of a wave run concurrently. A fan-in node with N in-edges therefore
//! runs exactly once, after all N contributions have arrived, regardless
//! of branch timing.

use super::{Workflow, WorkflowEvent};
use crate::error::{AgoraError, Result};
use futures::future::join_all;
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Separator between branch outputs when a fan-in node joins them.
const BRANCH_SEPARATOR: &str = "\n\n";

/// Runs a workflow and streams its events as they occur.
pub fn run_streaming(workflow: Workflow, input: String) -> mpsc::Receiver<WorkflowEvent> {
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        drive(workflow, input, tx).await;
    });
    rx
}

/// Runs a workflow to completion and returns its output.
///
/// Multiple output nodes are joined in completion order; a failed
/// executor or a run with no output node is an error.
pub async fn run_to_output(workflow: Workflow, input: String) -> Result<String> {
    let mut rx = run_streaming(workflow, input);
    let mut outputs = Vec::new();

    while let Some(event) = rx.recv().await {
        match event {
            WorkflowEvent::WorkflowOutput { data } => outputs.push(data),
            WorkflowEvent::ExecutorFailed { executor_id, error } => {
                return Err(AgoraError::workflow(format!(
                    "executor '{executor_id}' failed: {error}"
                )));
            }
            _ => {}
        }
    }

    if outputs.is_empty() {
        return Err(AgoraError::workflow("workflow produced no output"));
    }
    Ok(outputs.join(BRANCH_SEPARATOR))
}

async fn drive(workflow: Workflow, input: String, tx: mpsc::Sender<WorkflowEvent>) {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, start = %workflow.start, "workflow run started");

    // One contribution slot per in-edge, filled in declaration order.
    let mut contributions: HashMap<String, Vec<Option<String>>> = workflow
        .in_edges
        .iter()
        .map(|(node, sources)| (node.clone(), vec![None; sources.len()]))
        .collect();

    let mut wave: Vec<(String, String)> = vec![(workflow.start.clone(), input)];

    while !wave.is_empty() {
        let invocations = wave.drain(..).map(|(id, node_input)| {
            let executor = workflow.executors.get(&id).cloned();
            let tx = tx.clone();
            async move {
                let Some(executor) = executor else {
                    return (id.clone(), Err(AgoraError::workflow("executor not registered")));
                };
                let _ = tx
                    .send(WorkflowEvent::ExecutorInvoked {
                        executor_id: id.clone(),
                    })
                    .await;
                let result = executor.handle(&node_input).await;
                (id, result)
            }
        });

        let results = join_all(invocations).await;
        let mut next_wave: Vec<(String, String)> = Vec::new();

        for (id, result) in results {
            let output = match result {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(%run_id, executor = %id, error = %e, "executor failed");
                    let _ = tx
                        .send(WorkflowEvent::ExecutorFailed {
                            executor_id: id,
                            error: e.to_string(),
                        })
                        .await;
                    return;
                }
            };

            let _ = tx
                .send(WorkflowEvent::ExecutorCompleted {
                    executor_id: id.clone(),
                    output: output.clone(),
                })
                .await;

            if workflow.output_from.contains(&id) {
                let _ = tx
                    .send(WorkflowEvent::WorkflowOutput {
                        data: output.clone(),
                    })
                    .await;
            }

            for successor in workflow.out_edges.get(&id).into_iter().flatten() {
                let Some(sources) = workflow.in_edges.get(successor) else {
                    continue;
                };
                let Some(slots) = contributions.get_mut(successor) else {
                    continue;
                };

                // Fill the first still-empty slot declared for this source.
                if let Some(slot) = sources
                    .iter()
                    .zip(slots.iter_mut())
                    .find(|(source, slot)| source.as_str() == id && slot.is_none())
                    .map(|(_, slot)| slot)
                {
                    *slot = Some(output.clone());
                }

                if slots.iter().all(Option::is_some) {
                    let joined = slots
                        .iter()
                        .flatten()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(BRANCH_SEPARATOR);
                    next_wave.push((successor.clone(), joined));
                }
            }
        }

        wave = next_wave;
    }

    tracing::info!(%run_id, "workflow run finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Executor, FnExecutor, WorkflowBuilder};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SlowEcho {
        id: String,
        delay: Duration,
    }

    #[async_trait]
    impl Executor for SlowEcho {
        fn id(&self) -> &str {
            &self.id
        }

        async fn handle(&self, input: &str) -> crate::Result<String> {
            tokio::time::sleep(self.delay).await;
            Ok(format!("{}:{}", self.id, input))
        }
    }

    struct Failing;

    #[async_trait]
    impl Executor for Failing {
        fn id(&self) -> &str {
            "failing"
        }

        async fn handle(&self, _input: &str) -> crate::Result<String> {
            Err(AgoraError::workflow("boom"))
        }
    }

    struct CountingEcho {
        id: String,
        invocations: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Executor for CountingEcho {
        fn id(&self) -> &str {
            &self.id
        }

        async fn handle(&self, input: &str) -> crate::Result<String> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            Ok(input.to_string())
        }
    }

    fn arc(executor: impl Executor + 'static) -> Arc<dyn Executor> {
        Arc::new(executor)
    }

    #[tokio::test]
    async fn sequential_workflow_chains_outputs() {
        let uppercase = arc(FnExecutor::new("uppercase", |s: &str| s.to_uppercase()));
        let reverse = arc(FnExecutor::new("reverse", |s: &str| {
            s.chars().rev().collect()
        }));

        let workflow = WorkflowBuilder::new(Arc::clone(&uppercase))
            .add_edge(&uppercase, &reverse)
            .with_output_from(&reverse)
            .build();

        let output = run_to_output(workflow, "Hello, World!".to_string())
            .await
            .unwrap();
        assert_eq!(output, "!DLROW ,OLLEH");
    }

    #[tokio::test]
    async fn fan_in_waits_for_every_contribution() {
        let start = arc(FnExecutor::new("start", |s: &str| s.to_string()));
        let slow = arc(SlowEcho {
            id: "slow".to_string(),
            delay: Duration::from_millis(50),
        });
        let fast = arc(SlowEcho {
            id: "fast".to_string(),
            delay: Duration::from_millis(1),
        });
        let invocations = Arc::new(AtomicUsize::new(0));
        let aggregator = arc(CountingEcho {
            id: "aggregator".to_string(),
            invocations: Arc::clone(&invocations),
        });

        let workflow = WorkflowBuilder::new(Arc::clone(&start))
            .add_fan_out_edge(&start, &[Arc::clone(&slow), Arc::clone(&fast)])
            .add_fan_in_edge(&[Arc::clone(&slow), Arc::clone(&fast)], &aggregator)
            .with_output_from(&aggregator)
            .build();

        let mut rx = run_streaming(workflow, "q".to_string());
        let mut outputs = Vec::new();
        while let Some(event) = rx.recv().await {
            if let WorkflowEvent::WorkflowOutput { data } = event {
                outputs.push(data);
            }
        }

        // The aggregator ran exactly once, after both branches delivered.
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].contains("slow:q"));
        assert!(outputs[0].contains("fast:q"));
    }

    #[tokio::test]
    async fn fan_in_joins_in_declared_branch_order() {
        let start = arc(FnExecutor::new("start", |s: &str| s.to_string()));
        // The branch declared first is the slower one; the join must
        // still list it first.
        let slow = arc(SlowEcho {
            id: "slow".to_string(),
            delay: Duration::from_millis(50),
        });
        let fast = arc(SlowEcho {
            id: "fast".to_string(),
            delay: Duration::from_millis(1),
        });
        let aggregator = arc(FnExecutor::new("aggregator", |s: &str| s.to_string()));

        let workflow = WorkflowBuilder::new(Arc::clone(&start))
            .add_fan_out_edge(&start, &[Arc::clone(&slow), Arc::clone(&fast)])
            .add_fan_in_edge(&[Arc::clone(&slow), Arc::clone(&fast)], &aggregator)
            .with_output_from(&aggregator)
            .build();

        let output = run_to_output(workflow, "q".to_string()).await.unwrap();
        assert_eq!(output, "slow:q\n\nfast:q");
    }

    #[tokio::test]
    async fn executor_failure_aborts_the_run() {
        let start = arc(FnExecutor::new("start", |s: &str| s.to_string()));
        let failing = arc(Failing);
        let after = arc(FnExecutor::new("after", |s: &str| s.to_string()));

        let workflow = WorkflowBuilder::new(Arc::clone(&start))
            .add_edge(&start, &failing)
            .add_edge(&failing, &after)
            .with_output_from(&after)
            .build();

        let mut rx = run_streaming(workflow, "q".to_string());
        let mut failed = false;
        let mut produced_output = false;
        while let Some(event) = rx.recv().await {
            match event {
                WorkflowEvent::ExecutorFailed { executor_id, .. } => {
                    assert_eq!(executor_id, "failing");
                    failed = true;
                }
                WorkflowEvent::WorkflowOutput { .. } => produced_output = true,
                _ => {}
            }
        }

        assert!(failed);
        assert!(!produced_output);

        let err = {
            let start = arc(FnExecutor::new("start", |s: &str| s.to_string()));
            let failing = arc(Failing);
            let workflow = WorkflowBuilder::new(Arc::clone(&start))
                .add_edge(&start, &failing)
                .with_output_from(&failing)
                .build();
            run_to_output(workflow, "q".to_string()).await
        };
        assert!(err.is_err());
    }
}
