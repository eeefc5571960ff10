use async_trait::async_trait;
use std::time::Duration;
use weftcore::{ExecutionContext, Node, NodeDescriptor, NodeError, PortValues};

/// Pauses execution for a fixed duration, then passes its inputs through
/// unchanged.
pub struct DelayNode {
    descriptor: NodeDescriptor,
    delay: Duration,
}

impl DelayNode {
    pub fn new(id: impl Into<String>, delay: Duration) -> Self {
        let descriptor = NodeDescriptor::new(id, "Delay")
            .with_optional_input("input", "Pass-through Input")
            .with_output("input", "Pass-through Output");
        Self { descriptor, delay }
    }
}

#[async_trait]
impl Node for DelayNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        inputs: PortValues,
        _context: &mut ExecutionContext,
    ) -> Result<PortValues, NodeError> {
        tracing::debug!(node_id = self.id(), delay_ms = self.delay.as_millis() as u64, "delaying");
        tokio::time::sleep(self.delay).await;
        Ok(inputs)
    }
}
