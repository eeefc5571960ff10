use crate::{ExecutionResult, WorkflowExecutor};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use weftcore::{EngineError, Value, Workflow};

/// Run manager: holds registered workflows and executes them by id.
///
/// Each execution gets its own fresh context; the engine holds no
/// per-run state after a run returns.
pub struct WorkflowEngine {
    executor: WorkflowExecutor,
    workflows: RwLock<HashMap<String, Arc<Workflow>>>,
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self::with_executor(WorkflowExecutor::new())
    }

    pub fn with_executor(executor: WorkflowExecutor) -> Self {
        Self {
            executor,
            workflows: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register_workflow(&self, workflow: Workflow) {
        let mut workflows = self.workflows.write().await;
        workflows.insert(workflow.id.clone(), Arc::new(workflow));
    }

    pub async fn workflow_ids(&self) -> Vec<String> {
        self.workflows.read().await.keys().cloned().collect()
    }

    /// Execute a registered workflow by id.
    pub async fn execute_workflow(
        &self,
        workflow_id: &str,
        initial_variables: HashMap<String, Value>,
    ) -> Result<ExecutionResult, EngineError> {
        let workflow = {
            let workflows = self.workflows.read().await;
            workflows
                .get(workflow_id)
                .cloned()
                .ok_or_else(|| EngineError::WorkflowNotFound(workflow_id.to_string()))?
        };
        self.executor.execute(&workflow, initial_variables).await
    }

    /// Execute a workflow directly, without registration.
    pub async fn execute(
        &self,
        workflow: &Workflow,
        initial_variables: HashMap<String, Value>,
    ) -> Result<ExecutionResult, EngineError> {
        self.executor.execute(workflow, initial_variables).await
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}
