use async_trait::async_trait;
use std::collections::HashMap;
use weftcore::{ExecutionContext, Node, NodeDescriptor, NodeError, PortValues, Value};

type DecideFn = dyn Fn(&Value) -> Result<Value, NodeError> + Send + Sync;

/// Evaluates a caller-supplied function over its `input` port and emits
/// the decision on `result`, plus a pass-through copy of the input on
/// `input`. Conditional routes can key on `result` while carrying the
/// original data forward.
pub struct DecisionNode {
    descriptor: NodeDescriptor,
    decide: Box<DecideFn>,
}

impl DecisionNode {
    pub fn new(
        id: impl Into<String>,
        decide: impl Fn(&Value) -> Result<Value, NodeError> + Send + Sync + 'static,
    ) -> Self {
        let descriptor = NodeDescriptor::new(id, "Decision")
            .with_input("input", "Decision Input")
            .with_output("result", "Decision Result")
            .with_output("input", "Pass-through of input data");
        Self {
            descriptor,
            decide: Box::new(decide),
        }
    }
}

#[async_trait]
impl Node for DecisionNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        inputs: PortValues,
        _context: &mut ExecutionContext,
    ) -> Result<PortValues, NodeError> {
        let input = inputs
            .get("input")
            .cloned()
            .ok_or_else(|| NodeError::MissingInput("input".to_string()))?;
        let result = (self.decide)(&input)?;
        Ok(HashMap::from([
            ("result".to_string(), result),
            ("input".to_string(), input),
        ]))
    }
}
