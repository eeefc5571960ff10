use std::time::Duration;
use weftcore::NodeError;

/// Externally supplied retry decision, consulted only when a node's
/// execution fails.
///
/// The engine does not compute backoff itself; a decider returns
/// `Some(delay)` to sleep and re-invoke the node with the same inputs, or
/// `None` to let the failure abort the run. `attempt` counts failures so
/// far, starting at 1.
pub trait RetryDecider: Send + Sync {
    fn retry_delay(&self, node_id: &str, error: &NodeError, attempt: u32) -> Option<Duration>;
}
