use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type NodeId = String;
pub type ConnectionId = String;

/// The structural, type-specific bag carried next to a node's `config`.
pub type Attributes = Map<String, Value>;

/// Key of the branch list inside a conditional node's attributes.
pub const CHOICES_KEY: &str = "choices";

/// Canvas coordinate of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node of the identifier-keyed graph model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub node_type: String,
    pub position: Position,
    pub config: Value,
    #[serde(default)]
    pub node_attributes: Attributes,
    /// Identifier of the successor node.
    pub next: Option<NodeId>,
    pub end: bool,
}

impl Node {
    /// Reads the branch list out of `node_attributes`.
    ///
    /// Entries that are not objects are ignored. A missing `condition` reads as
    /// `null`, a missing or non-string `next` as an empty reference.
    pub fn choices(&self) -> Vec<Choice> {
        match self.node_attributes.get(CHOICES_KEY) {
            Some(Value::Array(entries)) => entries.iter().filter_map(Choice::from_value).collect(),
            _ => Vec::new(),
        }
    }
}

/// A conditional node's branch: a condition expression and a successor reference.
///
/// Inside the graph model `next` holds a node identifier; inside a wire document it
/// holds a node name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub condition: Value,
    pub next: String,
}

impl Choice {
    pub fn new(condition: impl Into<Value>, next: &str) -> Self {
        Self {
            condition: condition.into(),
            next: next.to_string(),
        }
    }

    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        Some(Self {
            condition: entry.get("condition").cloned().unwrap_or(Value::Null),
            next: entry
                .get("next")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    pub(crate) fn to_value(&self) -> Value {
        serde_json::json!({ "condition": self.condition, "next": self.next })
    }
}

/// Distinguishes a conditional branch edge from a plain sequential one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Choice,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<ConnectionType>,
}

/// A node handed to the graph store; `id` and `name` are filled in when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDraft {
    pub id: Option<NodeId>,
    pub name: Option<String>,
    pub node_type: String,
    pub position: Position,
    pub config: Value,
    pub node_attributes: Attributes,
    pub next: Option<NodeId>,
    pub end: bool,
}

impl NodeDraft {
    pub fn new(node_type: &str) -> Self {
        Self {
            id: None,
            name: None,
            node_type: node_type.to_string(),
            position: Position::default(),
            config: Value::Object(Map::new()),
            node_attributes: Attributes::new(),
            next: None,
            end: false,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    pub fn with_attributes(mut self, node_attributes: Attributes) -> Self {
        self.node_attributes = node_attributes;
        self
    }

    pub fn with_next(mut self, next: &str) -> Self {
        self.next = Some(next.to_string());
        self
    }

    pub fn ending(mut self) -> Self {
        self.end = true;
        self
    }
}

impl From<Node> for NodeDraft {
    fn from(node: Node) -> Self {
        Self {
            id: Some(node.id),
            name: Some(node.name),
            node_type: node.node_type,
            position: node.position,
            config: node.config,
            node_attributes: node.node_attributes,
            next: node.next,
            end: node.end,
        }
    }
}

/// A connection handed to the graph store; `id` is filled in when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDraft {
    pub id: Option<ConnectionId>,
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub connection_type: Option<ConnectionType>,
}

impl ConnectionDraft {
    /// A plain sequential edge.
    pub fn new(source_id: &str, target_id: &str) -> Self {
        Self {
            id: None,
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            connection_type: None,
        }
    }

    /// A conditional branch edge.
    pub fn choice(source_id: &str, target_id: &str) -> Self {
        Self {
            connection_type: Some(ConnectionType::Choice),
            ..Self::new(source_id, target_id)
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

impl From<Connection> for ConnectionDraft {
    fn from(connection: Connection) -> Self {
        Self {
            id: Some(connection.id),
            source_id: connection.source_id,
            target_id: connection.target_id,
            connection_type: connection.connection_type,
        }
    }
}

/// A partial node update. Only the fields that are `Some` are applied.
///
/// `next` is doubly optional so that an update can clear the successor
/// (`Some(None)`) as well as leave it alone (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub config: Option<Value>,
    pub node_attributes: Option<Attributes>,
    pub next: Option<Option<NodeId>>,
    pub end: Option<bool>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn node_attributes(mut self, node_attributes: Attributes) -> Self {
        self.node_attributes = Some(node_attributes);
        self
    }

    pub fn next(mut self, next: Option<&str>) -> Self {
        self.next = Some(next.map(str::to_string));
        self
    }

    pub fn end(mut self, end: bool) -> Self {
        self.end = Some(end);
        self
    }
}

/// An ordered node list plus the connections between its nodes.
///
/// Node order is significant: the node at index 0 is the flow's start node. The
/// materializer establishes this by moving the designated start node to the front,
/// and the serializer reads `startNode` back from the front. No separate flag is
/// stored anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
