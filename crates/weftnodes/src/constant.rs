use async_trait::async_trait;
use std::collections::HashMap;
use weftcore::{ExecutionContext, Node, NodeDescriptor, NodeError, PortValues, Value};

/// Emits a fixed value on its `value` output port. Useful as a workflow
/// source or in tests.
pub struct ConstantNode {
    descriptor: NodeDescriptor,
    value: Value,
}

impl ConstantNode {
    pub fn new(id: impl Into<String>, value: impl Into<Value>) -> Self {
        let descriptor =
            NodeDescriptor::new(id, "Constant").with_output("value", "Constant Value");
        Self {
            descriptor,
            value: value.into(),
        }
    }
}

#[async_trait]
impl Node for ConstantNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        _inputs: PortValues,
        _context: &mut ExecutionContext,
    ) -> Result<PortValues, NodeError> {
        Ok(HashMap::from([("value".to_string(), self.value.clone())]))
    }
}
