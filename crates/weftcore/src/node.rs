use crate::{ExecutionContext, NodeError, Value};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values flowing in or out of a node, keyed by port id.
pub type PortValues = HashMap<String, Value>;

/// Declared input slot on a node. Inputs carry required-ness; a required
/// port without a value at invocation time fails the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputPort {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
}

impl InputPort {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declared output slot on a node. The engine does not require a node to
/// populate every declared output; unpopulated ports read as absent
/// downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPort {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl OutputPort {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Static interface of a node: identity plus its declared ports, in
/// declaration order.
///
/// Redeclaring a port id replaces the earlier declaration in place
/// (last write wins). This is a builder-time convenience, not a runtime
/// operation; descriptors are immutable once the node joins a graph.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
}

impl NodeDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare a required input port.
    pub fn with_input(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_input_port(InputPort::new(id, name));
        self
    }

    /// Declare an optional input port.
    pub fn with_optional_input(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.add_input_port(InputPort::new(id, name).optional());
        self
    }

    /// Declare an output port.
    pub fn with_output(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_output_port(OutputPort::new(id, name));
        self
    }

    pub fn add_input_port(&mut self, port: InputPort) {
        if let Some(existing) = self.inputs.iter_mut().find(|p| p.id == port.id) {
            *existing = port;
        } else {
            self.inputs.push(port);
        }
    }

    pub fn add_output_port(&mut self, port: OutputPort) {
        if let Some(existing) = self.outputs.iter_mut().find(|p| p.id == port.id) {
            *existing = port;
        } else {
            self.outputs.push(port);
        }
    }

    pub fn input_ports(&self) -> &[InputPort] {
        &self.inputs
    }

    pub fn output_ports(&self) -> &[OutputPort] {
        &self.outputs
    }

    pub fn input_port(&self, id: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|p| p.id == id)
    }

    pub fn output_port(&self, id: &str) -> Option<&OutputPort> {
        self.outputs.iter().find(|p| p.id == id)
    }
}

/// A unit of work in a workflow.
///
/// A node is polymorphic over a single capability: `execute`, which maps
/// assembled input-port values to output-port values. Execution may
/// suspend on external I/O and may read or write context variables; any
/// error aborts the run.
#[async_trait]
pub trait Node: Send + Sync {
    /// Identity and declared ports of this node.
    fn descriptor(&self) -> &NodeDescriptor;

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Execute the node with the inputs assembled by the scheduler.
    async fn execute(
        &self,
        inputs: PortValues,
        context: &mut ExecutionContext,
    ) -> Result<PortValues, NodeError>;
}
