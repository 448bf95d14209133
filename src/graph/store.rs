use super::model::{
    Connection, ConnectionDraft, ConnectionId, Graph, Node, NodeDraft, NodeId, NodeUpdate,
    Position,
};
use crate::ids::{IdGenerator, UuidGenerator};
use serde_json::Value;
use tracing::debug;

/// The working node/connection set of the flow currently being edited.
///
/// The store is deliberately not bound to any [`Flow`](crate::flow::Flow). The
/// repository copies data in and out of it at explicit checkpoints
/// (`load_flow_to_node_store` / `sync_nodes_and_connections`).
///
/// Invariants:
/// - no two connections share the same ordered `(source_id, target_id)` pair;
/// - no connection references a node that has been removed.
pub struct GraphStore {
    graph: Graph,
    next_node_number: u64,
    ids: Box<dyn IdGenerator>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(UuidGenerator))
    }

    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            graph: Graph::new(),
            next_node_number: 1,
            ids,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.graph.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.graph.connections
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    /// Returns a copy of the current contents.
    pub fn snapshot(&self) -> Graph {
        self.graph.clone()
    }

    /// Adds a node, filling in a fresh identifier and a default name when absent.
    ///
    /// Default names are `"<Capitalized type> <n>"`, where `n` counts every default
    /// name handed out since the store was created or last cleared.
    pub fn add_node(&mut self, draft: NodeDraft) -> NodeId {
        let id = match draft.id {
            Some(id) if !id.is_empty() => id,
            _ => self.ids.next_id(),
        };
        let name = match draft.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                let name = format!(
                    "{} {}",
                    capitalize(&draft.node_type),
                    self.next_node_number
                );
                self.next_node_number += 1;
                name
            }
        };

        self.graph.nodes.push(Node {
            id: id.clone(),
            name,
            node_type: draft.node_type,
            position: draft.position,
            config: draft.config,
            node_attributes: draft.node_attributes,
            next: draft.next,
            end: draft.end,
        });
        id
    }

    pub fn update_node_position(&mut self, id: &str, position: Position) {
        if let Some(node) = self.node_mut(id) {
            node.position = position;
        }
    }

    pub fn update_node_name(&mut self, id: &str, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.name = name.to_string();
        }
    }

    /// Changes a node's type tag, replacing its config too when one is given.
    pub fn update_node_type(&mut self, id: &str, node_type: &str, config: Option<Value>) {
        if let Some(node) = self.node_mut(id) {
            node.node_type = node_type.to_string();
            if let Some(config) = config {
                node.config = config;
            }
        }
    }

    pub fn update_node_config(&mut self, id: &str, config: Value) {
        if let Some(node) = self.node_mut(id) {
            node.config = config;
        }
    }

    /// Applies the fields present in `update`, leaving the rest untouched.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if let Some(config) = update.config {
            node.config = config;
        }
        if let Some(node_attributes) = update.node_attributes {
            node.node_attributes = node_attributes;
        }
        if let Some(next) = update.next {
            node.next = next;
        }
        if let Some(end) = update.end {
            node.end = end;
        }
    }

    /// Removes a node together with every connection that starts or ends at it.
    pub fn remove_node(&mut self, id: &str) {
        self.graph.nodes.retain(|n| n.id != id);
        let before = self.graph.connections.len();
        self.graph
            .connections
            .retain(|c| c.source_id != id && c.target_id != id);
        debug!(
            node_id = id,
            dropped_connections = before - self.graph.connections.len(),
            "Removed node"
        );
    }

    /// Adds a connection unless one already joins the same ordered pair.
    ///
    /// Returns the connection's identifier, or `None` when it was a duplicate.
    pub fn add_connection(&mut self, draft: ConnectionDraft) -> Option<ConnectionId> {
        let exists = self
            .graph
            .connections
            .iter()
            .any(|c| c.source_id == draft.source_id && c.target_id == draft.target_id);
        if exists {
            debug!(
                source_id = %draft.source_id,
                target_id = %draft.target_id,
                "Ignoring duplicate connection"
            );
            return None;
        }

        let id = match draft.id {
            Some(id) if !id.is_empty() => id,
            _ => self.ids.next_id(),
        };
        self.graph.connections.push(Connection {
            id: id.clone(),
            source_id: draft.source_id,
            target_id: draft.target_id,
            connection_type: draft.connection_type,
        });
        Some(id)
    }

    pub fn remove_connection(&mut self, id: &str) {
        self.graph.connections.retain(|c| c.id != id);
    }

    /// Empties the store and restarts default naming at 1.
    pub fn clear_all(&mut self) {
        self.graph = Graph::new();
        self.next_node_number = 1;
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.graph.nodes.iter_mut().find(|n| n.id == id)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
