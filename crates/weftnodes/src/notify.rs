use async_trait::async_trait;
use std::collections::HashMap;
use weftcore::{ExecutionContext, Node, NodeDescriptor, NodeError, PortValues, Value};

/// Sends a notification by logging it through `tracing` and reports what
/// was sent. A `message` input, when wired, overrides the configured one.
pub struct NotifyNode {
    descriptor: NodeDescriptor,
    channel: String,
    message: String,
}

impl NotifyNode {
    pub fn new(
        id: impl Into<String>,
        channel: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let descriptor = NodeDescriptor::new(id, "Notification")
            .with_optional_input("message", "Message Override")
            .with_output("status", "Delivery Status")
            .with_output("channel", "Channel Used")
            .with_output("message", "Message Sent");
        Self {
            descriptor,
            channel: channel.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Node for NotifyNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        inputs: PortValues,
        _context: &mut ExecutionContext,
    ) -> Result<PortValues, NodeError> {
        let message = match inputs.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(NodeError::InvalidInputType {
                    field: "message".to_string(),
                    expected: "string".to_string(),
                    actual: format!("{other:?}"),
                })
            }
            None => self.message.clone(),
        };

        tracing::info!(channel = %self.channel, message = %message, "notification sent");

        Ok(HashMap::from([
            ("status".to_string(), Value::from("sent")),
            ("channel".to_string(), Value::from(self.channel.clone())),
            ("message".to_string(), Value::from(message)),
        ]))
    }
}
