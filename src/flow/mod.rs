use crate::graph::{Connection, Graph, Node};
use crate::registry::{NodeTypeRegistry, ValidationReport};
use crate::wire::ParamMap;
use serde::{Deserialize, Serialize};

mod repository;

pub use repository::{DEFAULT_FLOW_DESCRIPTION, DEFAULT_FLOW_NAME, FlowRepository};

pub type FlowId = String;

/// A named workflow with its metadata, parameters and a checkpoint of its graph.
///
/// `nodes` keeps the start node at index 0 (see [`Graph`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: FlowId,
    pub name: String,
    pub config_id: String,
    pub config_type: String,
    pub config_status: String,
    pub config_owner: String,
    pub config_description: String,
    /// Parameter name to current value.
    pub input: ParamMap,
    /// Required parameter names, each with a value used to pre-fill editors.
    pub required: ParamMap,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Flow {
    /// A copy of the flow's nodes and connections.
    pub fn graph(&self) -> Graph {
        Graph {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
        }
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Validates every node, returning the failing ones by name in node order.
    pub fn validate(&self, registry: &NodeTypeRegistry) -> Vec<(String, ValidationReport)> {
        self.nodes
            .iter()
            .map(|node| (node.name.clone(), registry.validate(node)))
            .filter(|(_, report)| !report.valid)
            .collect()
    }
}

/// A partial metadata update. Only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub name: Option<String>,
    pub config_id: Option<String>,
    pub config_type: Option<String>,
    pub config_status: Option<String>,
    pub config_owner: Option<String>,
    pub config_description: Option<String>,
}

impl MetadataUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn config_id(mut self, config_id: &str) -> Self {
        self.config_id = Some(config_id.to_string());
        self
    }

    pub fn config_type(mut self, config_type: &str) -> Self {
        self.config_type = Some(config_type.to_string());
        self
    }

    pub fn config_status(mut self, config_status: &str) -> Self {
        self.config_status = Some(config_status.to_string());
        self
    }

    pub fn config_owner(mut self, config_owner: &str) -> Self {
        self.config_owner = Some(config_owner.to_string());
        self
    }

    pub fn config_description(mut self, config_description: &str) -> Self {
        self.config_description = Some(config_description.to_string());
        self
    }

    pub(crate) fn apply(self, flow: &mut Flow) {
        if let Some(name) = self.name {
            flow.name = name;
        }
        if let Some(config_id) = self.config_id {
            flow.config_id = config_id;
        }
        if let Some(config_type) = self.config_type {
            flow.config_type = config_type;
        }
        if let Some(config_status) = self.config_status {
            flow.config_status = config_status;
        }
        if let Some(config_owner) = self.config_owner {
            flow.config_owner = config_owner;
        }
        if let Some(config_description) = self.config_description {
            flow.config_description = config_description;
        }
    }
}
