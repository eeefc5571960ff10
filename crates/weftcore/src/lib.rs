//! Core abstractions for the weft workflow engine
//!
//! This crate provides the fundamental types everything else depends on:
//! the dynamic [`Value`] passed between nodes, the [`Node`] contract with
//! its declared ports, the [`Workflow`] graph with unconditional
//! connections and conditional routes, and the per-run
//! [`ExecutionContext`] that carries variables, results and the event log.

mod context;
mod error;
mod node;
mod value;
mod workflow;

pub use context::{
    EventKind, ExecutionContext, ExecutionEvent, ExecutionId, ExecutionStatus,
};
pub use error::{EngineError, GraphError, NodeError};
pub use node::{InputPort, Node, NodeDescriptor, OutputPort, PortValues};
pub use value::Value;
pub use workflow::{
    ConditionalRoute, Connection, Workflow, WorkflowBuilder, DEFAULT_TARGET_PORT,
};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
