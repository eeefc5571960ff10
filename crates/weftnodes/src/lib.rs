//! Standard node library
//!
//! Collection of built-in nodes for common workflow steps: constants,
//! pure-function tasks, decisions, delays and notifications.

mod constant;
mod decision;
mod delay;
mod notify;
mod task;

pub use constant::ConstantNode;
pub use decision::DecisionNode;
pub use delay::DelayNode;
pub use notify::NotifyNode;
pub use task::TaskNode;
