use thiserror::Error;

/// Errors raised by node implementations during execution.
#[derive(Error, Debug, Clone)]
pub enum NodeError {
    #[error("missing required input: {0}")]
    MissingInput(String),

    #[error("invalid input type for '{field}': expected {expected}, got {actual}")]
    InvalidInputType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

/// Structural errors detected while building a workflow graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("duplicate node id '{0}' in workflow")]
    DuplicateNode(String),

    #[error("edge references unknown node '{0}'")]
    UnknownNode(String),

    #[error("edge references undeclared port '{port}' on node '{node}'")]
    UnknownPort { node: String, port: String },

    #[error("required input port '{port}' on node '{node}' ({node_name}) has no incoming connection")]
    UnwiredInput {
        node: String,
        node_name: String,
        port: String,
    },
}

/// Run-time errors surfaced by the scheduler. Each variant is a distinct,
/// fatal failure mode; none of them are retried inside the core.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("node '{0}' not found in workflow")]
    NodeNotFound(String),

    #[error("workflow '{0}' not found")]
    WorkflowNotFound(String),

    #[error("required input(s) {} for node '{node_id}' ({node_name}) missing a value", .ports.join(", "))]
    MissingInputs {
        node_id: String,
        node_name: String,
        ports: Vec<String>,
    },

    #[error("node '{node_id}' failed: {source}")]
    NodeFailed {
        node_id: String,
        #[source]
        source: NodeError,
    },

    #[error("workflow execution deadlock: pending nodes [{}] but none can execute", .pending.join(", "))]
    Deadlock { pending: Vec<String> },

    #[error("workflow execution exceeded maximum iterations ({limit}), possible infinite loop")]
    IterationLimitExceeded { limit: usize },
}
