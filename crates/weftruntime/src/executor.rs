use crate::RetryDecider;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use weftcore::{
    ConditionalRoute, EngineError, EventKind, ExecutionContext, ExecutionId, ExecutionStatus,
    Node, PortValues, Value, Workflow,
};

/// Safety valve against runaway successor activation.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Summary returned to the caller after a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub execution_id: ExecutionId,
    pub status: ExecutionStatus,
    pub results: HashMap<String, PortValues>,
    pub error: Option<String>,
    pub event_count: usize,
}

impl ExecutionResult {
    fn from_context(context: ExecutionContext) -> Self {
        Self {
            execution_id: context.execution_id,
            status: context.status,
            error: context.error.clone(),
            event_count: context.event_count(),
            results: context.into_node_results(),
        }
    }
}

/// The scheduler: drives a workflow graph to completion against a fresh
/// execution context.
///
/// A single logical thread of control runs the loop; node execution may
/// suspend on external I/O, but no second node starts until the current
/// one returns. Selection is deterministic: the first ready node in
/// pending order (lowest pending index first).
pub struct WorkflowExecutor {
    max_iterations: usize,
    retry: Option<Arc<dyn RetryDecider>>,
}

impl WorkflowExecutor {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            retry: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Wire in an external retry decision, consulted only on node failure.
    pub fn with_retry_decider(mut self, decider: Arc<dyn RetryDecider>) -> Self {
        self.retry = Some(decider);
        self
    }

    /// Execute a workflow against a fresh context and return the summary.
    /// Validation failures, node failures, deadlock and the iteration
    /// bound all propagate as errors with the context discarded.
    pub async fn execute(
        &self,
        workflow: &Workflow,
        initial_variables: HashMap<String, Value>,
    ) -> Result<ExecutionResult, EngineError> {
        let mut context = ExecutionContext::new(&workflow.id, initial_variables);
        self.run(workflow, &mut context).await?;
        Ok(ExecutionResult::from_context(context))
    }

    /// Execute against a caller-owned context. On failure the context
    /// retains the partial results, per-node errors and event history for
    /// postmortem inspection.
    pub async fn run(
        &self,
        workflow: &Workflow,
        context: &mut ExecutionContext,
    ) -> Result<(), EngineError> {
        context.status = ExecutionStatus::Running;
        context.add_event(EventKind::WorkflowStarted {
            workflow_id: workflow.id.clone(),
        });
        tracing::info!(
            workflow_id = %workflow.id,
            execution_id = %context.execution_id,
            "starting workflow execution"
        );

        match self.drive(workflow, context).await {
            Ok(()) => {
                context.status = ExecutionStatus::Completed;
                context.add_event(EventKind::WorkflowCompleted);
                tracing::info!(workflow_id = %workflow.id, "workflow completed");
                Ok(())
            }
            Err(err) => {
                context.status = ExecutionStatus::Failed;
                context.error = Some(err.to_string());
                context.add_event(EventKind::WorkflowFailed {
                    error: err.to_string(),
                });
                tracing::error!(workflow_id = %workflow.id, error = %err, "workflow failed");
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        workflow: &Workflow,
        context: &mut ExecutionContext,
    ) -> Result<(), EngineError> {
        for node_id in workflow.start_nodes() {
            context.mark_node_pending(node_id);
        }

        let mut iterations = 0usize;
        while !context.pending_nodes().is_empty() {
            if iterations >= self.max_iterations {
                context.add_event(EventKind::IterationLimitExceeded {
                    max_iterations: self.max_iterations,
                });
                return Err(EngineError::IterationLimitExceeded {
                    limit: self.max_iterations,
                });
            }
            iterations += 1;

            let Some(node_id) = self.next_ready_node(workflow, context) else {
                let pending = context.pending_nodes().to_vec();
                context.add_event(EventKind::ExecutionDeadlock {
                    pending_nodes: pending.clone(),
                });
                return Err(EngineError::Deadlock { pending });
            };

            context.add_event(EventKind::NodeExecuting {
                node_id: node_id.clone(),
            });
            self.execute_node(workflow, context, &node_id).await?;
        }
        Ok(())
    }

    /// First pending node (in pending order) whose full dependency set is
    /// complete. Condition liveness is not consulted here; it only decides
    /// which edges are later followed.
    fn next_ready_node(&self, workflow: &Workflow, context: &ExecutionContext) -> Option<String> {
        context
            .pending_nodes()
            .iter()
            .find(|node_id| {
                workflow
                    .connections()
                    .iter()
                    .filter(|c| &c.target_node == *node_id)
                    .map(|c| c.source_node.as_str())
                    .chain(
                        workflow
                            .conditional_routes()
                            .iter()
                            .filter(|r| &r.target_node == *node_id)
                            .map(|r| r.source_node.as_str()),
                    )
                    .all(|source| context.is_completed(source))
            })
            .cloned()
    }

    async fn execute_node(
        &self,
        workflow: &Workflow,
        context: &mut ExecutionContext,
        node_id: &str,
    ) -> Result<(), EngineError> {
        let Some(node) = workflow.node(node_id) else {
            let err = EngineError::NodeNotFound(node_id.to_string());
            context.set_node_error(node_id, err.to_string());
            context.mark_node_complete(node_id);
            return Err(err);
        };

        // Re-selected after completion: just drop it from the frontier.
        if context.is_completed(node_id) {
            context.mark_node_complete(node_id);
            return Ok(());
        }

        let inputs = assemble_inputs(workflow, context, node);

        let missing: Vec<String> = node
            .descriptor()
            .input_ports()
            .iter()
            .filter(|port| port.required && !inputs.contains_key(&port.id))
            .map(|port| port.id.clone())
            .collect();
        if !missing.is_empty() {
            let err = EngineError::MissingInputs {
                node_id: node_id.to_string(),
                node_name: node.name().to_string(),
                ports: missing,
            };
            context.set_node_error(node_id, err.to_string());
            context.mark_node_complete(node_id);
            return Err(err);
        }

        tracing::debug!(node_id, "executing node");
        match self.invoke(node, inputs, context).await {
            Ok(outputs) => {
                context.set_node_result(node_id, outputs);
                context.mark_node_complete(node_id);
                for next in next_nodes(workflow, context, node_id) {
                    context.mark_node_pending(next);
                }
                Ok(())
            }
            Err(err) => {
                context.set_node_error(node_id, err.to_string());
                context.mark_node_complete(node_id);
                Err(EngineError::NodeFailed {
                    node_id: node_id.to_string(),
                    source: err,
                })
            }
        }
    }

    /// Invoke the node, re-invoking with the same inputs while the wired
    /// retry decider (if any) allows it.
    async fn invoke(
        &self,
        node: &dyn Node,
        inputs: PortValues,
        context: &mut ExecutionContext,
    ) -> Result<PortValues, weftcore::NodeError> {
        let mut attempt = 0u32;
        loop {
            match node.execute(inputs.clone(), context).await {
                Ok(outputs) => return Ok(outputs),
                Err(err) => {
                    attempt += 1;
                    let delay = self
                        .retry
                        .as_ref()
                        .and_then(|d| d.retry_delay(node.id(), &err, attempt));
                    match delay {
                        Some(delay) => {
                            tracing::warn!(
                                node_id = node.id(),
                                attempt,
                                error = %err,
                                "retrying node after failure"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(err),
                    }
                }
            }
        }
    }
}

impl Default for WorkflowExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn route_is_live(route: &ConditionalRoute, context: &ExecutionContext) -> bool {
    context.port_value(&route.source_node, &route.condition_port)
        == Some(&route.condition_value)
}

/// Gather inputs for a node: unconditional connections, then live
/// conditional routes, then context variables matched by port id for
/// start nodes only. Within each edge kind the first match per port in
/// declaration order wins; across kinds a live route overrides a
/// connection feeding the same port.
fn assemble_inputs(
    workflow: &Workflow,
    context: &ExecutionContext,
    node: &dyn Node,
) -> PortValues {
    let mut inputs = PortValues::new();

    for connection in workflow
        .connections()
        .iter()
        .filter(|c| c.target_node == node.id())
    {
        if let Some(value) = context.port_value(&connection.source_node, &connection.source_port)
        {
            inputs
                .entry(connection.target_port.clone())
                .or_insert_with(|| value.clone());
        }
    }

    let mut route_inputs = PortValues::new();
    for route in workflow
        .conditional_routes()
        .iter()
        .filter(|r| r.target_node == node.id())
    {
        if !route_is_live(route, context) {
            continue;
        }
        if let Some(value) = context.port_value(&route.source_node, &route.data_port) {
            route_inputs
                .entry(route.target_port.clone())
                .or_insert_with(|| value.clone());
        }
    }
    inputs.extend(route_inputs);

    if !workflow.has_incoming_edges(node.id()) {
        for port in node.descriptor().input_ports() {
            if inputs.contains_key(&port.id) {
                continue;
            }
            if let Some(value) = context.get_variable(&port.id) {
                inputs.insert(port.id.clone(), value.clone());
            }
        }
    }

    inputs
}

/// Successor activation: if the node has any outgoing conditional routes,
/// only the targets of live routes advance; otherwise all unconditional
/// connection targets do.
fn next_nodes(workflow: &Workflow, context: &ExecutionContext, node_id: &str) -> Vec<String> {
    let routes: Vec<&ConditionalRoute> = workflow
        .conditional_routes()
        .iter()
        .filter(|r| r.source_node == node_id)
        .collect();

    if !routes.is_empty() {
        routes
            .into_iter()
            .filter(|route| route_is_live(route, context))
            .map(|route| route.target_node.clone())
            .collect()
    } else {
        workflow
            .connections()
            .iter()
            .filter(|c| c.source_node == node_id)
            .map(|c| c.target_node.clone())
            .collect()
    }
}
