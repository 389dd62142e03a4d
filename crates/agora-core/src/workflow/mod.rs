//! Workflow graphs.
//!
//! A workflow is a directed graph of named executors. Edges carry one
//! node's output to the next node's input; several edges out of one node
//! fan the same input out to independent branches, and several edges
//! into one node fan branch outputs back in. The engine in
//! [`engine`] executes the graph and streams lifecycle events.

mod engine;

pub use engine::{run_streaming, run_to_output};

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A named unit of work in a workflow graph.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Stable identifier, unique within one workflow.
    fn id(&self) -> &str;

    /// Processes one input and produces one output.
    async fn handle(&self, input: &str) -> Result<String>;
}

/// Adapts a plain function into an [`Executor`].
pub struct FnExecutor {
    id: String,
    f: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl FnExecutor {
    pub fn new(id: impl Into<String>, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            id: id.into(),
            f: Box::new(f),
        }
    }
}

#[async_trait]
impl Executor for FnExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn handle(&self, input: &str) -> Result<String> {
        Ok((self.f)(input))
    }
}

/// Lifecycle events emitted while a workflow runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// An executor started processing its input.
    ExecutorInvoked { executor_id: String },
    /// An executor finished and produced an output.
    ExecutorCompleted { executor_id: String, output: String },
    /// An executor failed; the run stops after this event.
    ExecutorFailed { executor_id: String, error: String },
    /// An output node completed; `data` is the workflow's result.
    WorkflowOutput { data: String },
}

/// A built workflow graph, ready to run.
pub struct Workflow {
    pub(crate) start: String,
    pub(crate) executors: HashMap<String, Arc<dyn Executor>>,
    /// In-edges per node, in declaration order. Determines both when a
    /// node becomes ready (all in-edges delivered) and the order its
    /// branch inputs are joined in.
    pub(crate) in_edges: HashMap<String, Vec<String>>,
    pub(crate) out_edges: HashMap<String, Vec<String>>,
    pub(crate) output_from: Vec<String>,
}

/// Builder declaring node identities and edges.
pub struct WorkflowBuilder {
    start: String,
    executors: HashMap<String, Arc<dyn Executor>>,
    in_edges: HashMap<String, Vec<String>>,
    out_edges: HashMap<String, Vec<String>>,
    output_from: Vec<String>,
}

impl WorkflowBuilder {
    pub fn new(start: Arc<dyn Executor>) -> Self {
        let mut builder = Self {
            start: start.id().to_string(),
            executors: HashMap::new(),
            in_edges: HashMap::new(),
            out_edges: HashMap::new(),
            output_from: Vec::new(),
        };
        builder.insert(start);
        builder
    }

    fn insert(&mut self, executor: Arc<dyn Executor>) {
        self.executors
            .entry(executor.id().to_string())
            .or_insert(executor);
    }

    fn connect(&mut self, from: &str, to: &str) {
        self.out_edges
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
        self.in_edges
            .entry(to.to_string())
            .or_default()
            .push(from.to_string());
    }

    /// Connects `from` to `to`: `from`'s output becomes `to`'s input.
    pub fn add_edge(mut self, from: &Arc<dyn Executor>, to: &Arc<dyn Executor>) -> Self {
        self.insert(Arc::clone(from));
        self.insert(Arc::clone(to));
        self.connect(from.id(), to.id());
        self
    }

    /// Broadcasts `from`'s output to every target in `to`.
    pub fn add_fan_out_edge(mut self, from: &Arc<dyn Executor>, to: &[Arc<dyn Executor>]) -> Self {
        self.insert(Arc::clone(from));
        for target in to {
            self.insert(Arc::clone(target));
            self.connect(from.id(), target.id());
        }
        self
    }

    /// Joins every source in `from` into `to`. `to` runs once all
    /// sources have delivered their contribution.
    pub fn add_fan_in_edge(mut self, from: &[Arc<dyn Executor>], to: &Arc<dyn Executor>) -> Self {
        self.insert(Arc::clone(to));
        for source in from {
            self.insert(Arc::clone(source));
            self.connect(source.id(), to.id());
        }
        self
    }

    /// Marks a node whose completion yields the workflow output.
    pub fn with_output_from(mut self, node: &Arc<dyn Executor>) -> Self {
        self.insert(Arc::clone(node));
        self.output_from.push(node.id().to_string());
        self
    }

    pub fn build(self) -> Workflow {
        Workflow {
            start: self.start,
            executors: self.executors,
            in_edges: self.in_edges,
            out_edges: self.out_edges,
            output_from: self.output_from,
        }
    }
}
