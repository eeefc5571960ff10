use crate::{GraphError, Node, Value};
use std::fmt;
use uuid::Uuid;

/// Default input port targeted by a conditional route when none is given.
pub const DEFAULT_TARGET_PORT: &str = "input";

/// Unconditional edge: moves one output-port value to one input port.
///
/// Several connections may target the same input port; the first one in
/// declaration order whose source has produced a value wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source_node: String,
    pub source_port: String,
    pub target_node: String,
    pub target_port: String,
}

/// Edge that is only followed when the source node's recorded output at
/// `condition_port` equals `condition_value` exactly. When live, the value
/// delivered to `target_port` is read from `data_port`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRoute {
    pub source_node: String,
    pub condition_port: String,
    pub condition_value: Value,
    pub target_node: String,
    pub target_port: String,
    pub data_port: String,
}

impl ConditionalRoute {
    /// New route with defaults: target port [`DEFAULT_TARGET_PORT`], data
    /// port the condition port itself.
    pub fn new(
        source_node: impl Into<String>,
        condition_port: impl Into<String>,
        condition_value: impl Into<Value>,
        target_node: impl Into<String>,
    ) -> Self {
        let condition_port = condition_port.into();
        Self {
            source_node: source_node.into(),
            data_port: condition_port.clone(),
            condition_port,
            condition_value: condition_value.into(),
            target_node: target_node.into(),
            target_port: DEFAULT_TARGET_PORT.to_string(),
        }
    }

    pub fn with_target_port(mut self, target_port: impl Into<String>) -> Self {
        self.target_port = target_port.into();
        self
    }

    pub fn with_data_port(mut self, data_port: impl Into<String>) -> Self {
        self.data_port = data_port.into();
        self
    }
}

/// A workflow: nodes plus the edges that wire them together.
///
/// Nodes are kept in insertion order, which makes start-node discovery and
/// scheduler tie-breaking deterministic. The `connect` and `add_route`
/// mutators perform no validation; [`WorkflowBuilder::build`] is the
/// checked construction path.
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    nodes: Vec<Box<dyn Node>>,
    connections: Vec<Connection>,
    conditional_routes: Vec<ConditionalRoute>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            nodes: Vec::new(),
            connections: Vec::new(),
            conditional_routes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: impl Node + 'static) {
        self.nodes.push(Box::new(node));
    }

    pub fn connect(
        &mut self,
        source_node: impl Into<String>,
        source_port: impl Into<String>,
        target_node: impl Into<String>,
        target_port: impl Into<String>,
    ) {
        self.connections.push(Connection {
            source_node: source_node.into(),
            source_port: source_port.into(),
            target_node: target_node.into(),
            target_port: target_port.into(),
        });
    }

    pub fn add_route(&mut self, route: ConditionalRoute) {
        self.conditional_routes.push(route);
    }

    pub fn node(&self, id: &str) -> Option<&dyn Node> {
        self.nodes.iter().find(|n| n.id() == id).map(|n| n.as_ref())
    }

    pub fn nodes(&self) -> &[Box<dyn Node>] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn conditional_routes(&self) -> &[ConditionalRoute] {
        &self.conditional_routes
    }

    /// True if any connection or conditional route targets this node.
    pub fn has_incoming_edges(&self, node_id: &str) -> bool {
        self.connections.iter().any(|c| c.target_node == node_id)
            || self
                .conditional_routes
                .iter()
                .any(|r| r.target_node == node_id)
    }

    /// Nodes with no incoming edge of either kind, in insertion order.
    /// Start nodes may source their inputs from run variables instead.
    pub fn start_nodes(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .map(|n| n.id())
            .filter(|id| !self.has_incoming_edges(id))
            .collect()
    }
}

// Nodes are trait objects, so derive(Debug) is unavailable; print their
// ids instead.
impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("nodes", &self.nodes.iter().map(|n| n.id()).collect::<Vec<_>>())
            .field("connections", &self.connections)
            .field("conditional_routes", &self.conditional_routes)
            .finish()
    }
}

/// Fluent construction of a [`Workflow`] with structural validation.
pub struct WorkflowBuilder {
    workflow_id: Option<String>,
    name: String,
    description: Option<String>,
    nodes: Vec<Box<dyn Node>>,
    connections: Vec<Connection>,
    conditional_routes: Vec<ConditionalRoute>,
}

impl WorkflowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            workflow_id: None,
            name: name.into(),
            description: None,
            nodes: Vec::new(),
            connections: Vec::new(),
            conditional_routes: Vec::new(),
        }
    }

    pub fn id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_node(mut self, node: impl Node + 'static) -> Self {
        self.nodes.push(Box::new(node));
        self
    }

    pub fn connect(
        mut self,
        source_node: impl Into<String>,
        source_port: impl Into<String>,
        target_node: impl Into<String>,
        target_port: impl Into<String>,
    ) -> Self {
        self.connections.push(Connection {
            source_node: source_node.into(),
            source_port: source_port.into(),
            target_node: target_node.into(),
            target_port: target_port.into(),
        });
        self
    }

    /// Add a conditional route with default target and data ports.
    pub fn add_conditional_route(
        self,
        source_node: impl Into<String>,
        condition_port: impl Into<String>,
        condition_value: impl Into<Value>,
        target_node: impl Into<String>,
    ) -> Self {
        self.add_route(ConditionalRoute::new(
            source_node,
            condition_port,
            condition_value,
            target_node,
        ))
    }

    pub fn add_route(mut self, route: ConditionalRoute) -> Self {
        self.conditional_routes.push(route);
        self
    }

    /// Build the workflow, performing the single structural validation
    /// pass: node ids must be unique, every edge must reference declared
    /// nodes and ports, and every required input port of every non-start
    /// node must be targeted by at least one connection or conditional
    /// route. Port type compatibility is not checked; values are opaque.
    pub fn build(self) -> Result<Workflow, GraphError> {
        let mut workflow = Workflow::new(
            self.workflow_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            self.name,
        );
        workflow.description = self.description;

        for node in self.nodes {
            if workflow.node(node.id()).is_some() {
                return Err(GraphError::DuplicateNode(node.id().to_string()));
            }
            workflow.nodes.push(node);
        }

        for connection in &self.connections {
            validate_connection(&workflow, connection)?;
        }
        for route in &self.conditional_routes {
            validate_route(&workflow, route)?;
        }
        workflow.connections = self.connections;
        workflow.conditional_routes = self.conditional_routes;

        // Required-port coverage. Start nodes are exempt: they may source
        // inputs from run-time variables instead.
        for node in &workflow.nodes {
            if !workflow.has_incoming_edges(node.id()) {
                continue;
            }
            for port in node.descriptor().input_ports() {
                if !port.required {
                    continue;
                }
                let wired = workflow
                    .connections
                    .iter()
                    .any(|c| c.target_node == node.id() && c.target_port == port.id)
                    || workflow
                        .conditional_routes
                        .iter()
                        .any(|r| r.target_node == node.id() && r.target_port == port.id);
                if !wired {
                    return Err(GraphError::UnwiredInput {
                        node: node.id().to_string(),
                        node_name: node.name().to_string(),
                        port: port.id.clone(),
                    });
                }
            }
        }

        Ok(workflow)
    }
}

fn validate_connection(workflow: &Workflow, connection: &Connection) -> Result<(), GraphError> {
    let source = workflow
        .node(&connection.source_node)
        .ok_or_else(|| GraphError::UnknownNode(connection.source_node.clone()))?;
    let target = workflow
        .node(&connection.target_node)
        .ok_or_else(|| GraphError::UnknownNode(connection.target_node.clone()))?;

    if source.descriptor().output_port(&connection.source_port).is_none() {
        return Err(GraphError::UnknownPort {
            node: connection.source_node.clone(),
            port: connection.source_port.clone(),
        });
    }
    if target.descriptor().input_port(&connection.target_port).is_none() {
        return Err(GraphError::UnknownPort {
            node: connection.target_node.clone(),
            port: connection.target_port.clone(),
        });
    }
    Ok(())
}

fn validate_route(workflow: &Workflow, route: &ConditionalRoute) -> Result<(), GraphError> {
    let source = workflow
        .node(&route.source_node)
        .ok_or_else(|| GraphError::UnknownNode(route.source_node.clone()))?;
    let target = workflow
        .node(&route.target_node)
        .ok_or_else(|| GraphError::UnknownNode(route.target_node.clone()))?;

    for port in [&route.condition_port, &route.data_port] {
        if source.descriptor().output_port(port).is_none() {
            return Err(GraphError::UnknownPort {
                node: route.source_node.clone(),
                port: port.clone(),
            });
        }
    }
    if target.descriptor().input_port(&route.target_port).is_none() {
        return Err(GraphError::UnknownPort {
            node: route.target_node.clone(),
            port: route.target_port.clone(),
        });
    }
    Ok(())
}
