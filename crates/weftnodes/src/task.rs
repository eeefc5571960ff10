use async_trait::async_trait;
use weftcore::{ExecutionContext, Node, NodeDescriptor, NodeError, PortValues};

type TaskFn = dyn Fn(&PortValues) -> Result<PortValues, NodeError> + Send + Sync;

/// Wraps a caller-supplied pure function over the node's inputs.
///
/// Declare ports with the `with_*` builders; the function receives the
/// assembled inputs and returns the output-port mapping.
pub struct TaskNode {
    descriptor: NodeDescriptor,
    task: Box<TaskFn>,
}

impl TaskNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        task: impl Fn(&PortValues) -> Result<PortValues, NodeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor: NodeDescriptor::new(id, name),
            task: Box::new(task),
        }
    }

    pub fn with_input(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.with_input(id, name);
        self
    }

    pub fn with_optional_input(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.descriptor = self.descriptor.with_optional_input(id, name);
        self
    }

    pub fn with_output(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.with_output(id, name);
        self
    }
}

#[async_trait]
impl Node for TaskNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        inputs: PortValues,
        _context: &mut ExecutionContext,
    ) -> Result<PortValues, NodeError> {
        (self.task)(&inputs)
    }
}
