use crate::{PortValues, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub type ExecutionId = Uuid;

/// Lifecycle of one workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Created,
    Running,
    Completed,
    Failed,
}

/// A timestamped entry in the execution history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    WorkflowStarted { workflow_id: String },
    WorkflowCompleted,
    WorkflowFailed { error: String },
    VariableSet { name: String },
    NodeExecuting { node_id: String },
    NodeCompleted { node_id: String },
    NodeError { node_id: String, error: String },
    ExecutionDeadlock { pending_nodes: Vec<String> },
    IterationLimitExceeded { max_iterations: usize },
}

/// Mutable state of one workflow run.
///
/// A context is owned exclusively by its run: created by the executor,
/// mutated only by the scheduler and the currently executing node, and
/// released when the caller discards the result. The pending frontier
/// keeps insertion order so node selection stays deterministic.
pub struct ExecutionContext {
    pub workflow_id: String,
    pub execution_id: ExecutionId,
    pub status: ExecutionStatus,
    pub error: Option<String>,
    variables: HashMap<String, Value>,
    node_results: HashMap<String, PortValues>,
    node_errors: HashMap<String, String>,
    completed_nodes: HashSet<String>,
    pending_nodes: Vec<String>,
    execution_history: Vec<ExecutionEvent>,
}

impl ExecutionContext {
    pub fn new(workflow_id: impl Into<String>, initial_variables: HashMap<String, Value>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::Created,
            error: None,
            variables: initial_variables,
            node_results: HashMap::new(),
            node_errors: HashMap::new(),
            completed_nodes: HashSet::new(),
            pending_nodes: Vec::new(),
            execution_history: Vec::new(),
        }
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn get_variable_or(&self, name: &str, default: Value) -> Value {
        self.variables.get(name).cloned().unwrap_or(default)
    }

    /// Set a variable; every write is recorded in the history.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.variables.insert(name.clone(), value.into());
        self.add_event(EventKind::VariableSet { name });
    }

    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.variables
    }

    /// Record a node's output mapping and a `node_completed` event.
    pub fn set_node_result(&mut self, node_id: impl Into<String>, outputs: PortValues) {
        let node_id = node_id.into();
        self.node_results.insert(node_id.clone(), outputs);
        self.add_event(EventKind::NodeCompleted { node_id });
    }

    /// Output mapping of a node, if it has produced one.
    pub fn node_result(&self, node_id: &str) -> Option<&PortValues> {
        self.node_results.get(node_id)
    }

    /// A single recorded output-port value.
    pub fn port_value(&self, node_id: &str, port_id: &str) -> Option<&Value> {
        self.node_results.get(node_id).and_then(|r| r.get(port_id))
    }

    pub fn node_results(&self) -> &HashMap<String, PortValues> {
        &self.node_results
    }

    pub fn into_node_results(self) -> HashMap<String, PortValues> {
        self.node_results
    }

    /// Record a node failure for postmortem inspection. Does not touch the
    /// pending frontier; the executor removes the node explicitly.
    pub fn set_node_error(&mut self, node_id: impl Into<String>, error: impl Into<String>) {
        let node_id = node_id.into();
        let error = error.into();
        self.node_errors.insert(node_id.clone(), error.clone());
        self.add_event(EventKind::NodeError { node_id, error });
    }

    pub fn node_error(&self, node_id: &str) -> Option<&str> {
        self.node_errors.get(node_id).map(String::as_str)
    }

    pub fn node_errors(&self) -> &HashMap<String, String> {
        &self.node_errors
    }

    /// Add a node to the pending frontier. No-op if the node has already
    /// completed or is already pending.
    pub fn mark_node_pending(&mut self, node_id: impl Into<String>) {
        let node_id = node_id.into();
        if self.completed_nodes.contains(&node_id) || self.pending_nodes.contains(&node_id) {
            return;
        }
        self.pending_nodes.push(node_id);
    }

    /// Move a node from pending to completed. Idempotent.
    pub fn mark_node_complete(&mut self, node_id: impl Into<String>) {
        let node_id = node_id.into();
        self.pending_nodes.retain(|p| p != &node_id);
        self.completed_nodes.insert(node_id);
    }

    pub fn is_completed(&self, node_id: &str) -> bool {
        self.completed_nodes.contains(node_id)
    }

    pub fn pending_nodes(&self) -> &[String] {
        &self.pending_nodes
    }

    pub fn completed_nodes(&self) -> &HashSet<String> {
        &self.completed_nodes
    }

    /// Append an event. Timestamps are monotonically non-decreasing in
    /// append order, clamped if the wall clock steps backwards.
    pub fn add_event(&mut self, kind: EventKind) {
        let mut timestamp = Utc::now();
        if let Some(last) = self.execution_history.last() {
            if timestamp < last.timestamp {
                timestamp = last.timestamp;
            }
        }
        self.execution_history.push(ExecutionEvent { timestamp, kind });
    }

    pub fn history(&self) -> &[ExecutionEvent] {
        &self.execution_history
    }

    pub fn event_count(&self) -> usize {
        self.execution_history.len()
    }
}
