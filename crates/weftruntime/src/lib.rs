//! Workflow execution runtime
//!
//! This crate drives [`weftcore::Workflow`] graphs to completion: the
//! [`WorkflowExecutor`] scheduler resolves execution order from data
//! dependencies and conditional routes, and [`WorkflowEngine`] manages a
//! registry of workflows to execute by id.

mod engine;
mod executor;
mod retry;

pub use engine::WorkflowEngine;
pub use executor::{ExecutionResult, WorkflowExecutor, DEFAULT_MAX_ITERATIONS};
pub use retry::RetryDecider;
