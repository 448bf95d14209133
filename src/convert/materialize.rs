use super::GridLayout;
use crate::graph::{
    Attributes, CHOICES_KEY, Choice, Connection, ConnectionType, Graph, Node, NodeId, Position,
};
use crate::ids::IdGenerator;
use crate::registry::{CONDITIONAL, EXECUTE, NodeTypeRegistry};
use crate::wire::TypeTag;
use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// `config` keys of an execute node that belong in its attributes bag.
const EXECUTE_MIGRATED_KEYS: [&str; 2] = ["configId", "nodeInput"];

/// Builds the identifier-keyed graph from name-keyed node definitions.
pub(super) struct GraphMaterializer<'a> {
    registry: &'a NodeTypeRegistry,
    layout: &'a GridLayout,
    ids: &'a mut dyn IdGenerator,
    connections: Vec<Connection>,
    pairs: AHashSet<(NodeId, NodeId)>,
}

impl<'a> GraphMaterializer<'a> {
    pub(super) fn new(
        registry: &'a NodeTypeRegistry,
        layout: &'a GridLayout,
        ids: &'a mut dyn IdGenerator,
    ) -> Self {
        Self {
            registry,
            layout,
            ids,
            connections: Vec::new(),
            pairs: AHashSet::new(),
        }
    }

    /// Runs every pass and returns the graph with the start node first.
    pub(super) fn materialize(
        mut self,
        node_defs: &IndexMap<String, Value>,
        start_node: Option<&str>,
    ) -> Graph {
        let mut placed: Vec<(Node, &Value)> = Vec::with_capacity(node_defs.len());
        for (index, (name, def)) in node_defs.iter().enumerate() {
            if let Some(node) = self.build_node(index, name, def) {
                placed.push((node, def));
            }
        }

        let name_to_id: AHashMap<String, NodeId> = placed
            .iter()
            .map(|(node, _)| (node.name.clone(), node.id.clone()))
            .collect();

        self.link_sequential(&mut placed, &name_to_id);
        self.link_choices(&mut placed, &name_to_id);

        let mut nodes: Vec<Node> = placed.into_iter().map(|(node, _)| node).collect();
        if let Some(start) = start_node {
            match nodes.iter().position(|n| n.name == start) {
                Some(index) if index > 0 => {
                    let node = nodes.remove(index);
                    nodes.insert(0, node);
                }
                Some(_) => {}
                None => debug!(
                    start_node = start,
                    "Start node does not resolve, keeping document order"
                ),
            }
        }

        debug!(
            nodes = nodes.len(),
            connections = self.connections.len(),
            "Materialized graph"
        );
        Graph {
            nodes,
            connections: self.connections,
        }
    }

    /// Creates the node for one definition, or `None` when it has to be skipped.
    fn build_node(&mut self, index: usize, name: &str, def: &Value) -> Option<Node> {
        if !def.is_object() {
            warn!(node = name, "Skipping node definition that is not an object");
            return None;
        }
        let Some(tag) = TypeTag::of(def).tag() else {
            warn!(node = name, "Skipping node without a type");
            return None;
        };
        if !self.registry.contains(tag) {
            warn!(node = name, node_type = tag, "Skipping node of unregistered type");
            return None;
        }

        let config = match def.get("config") {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(config) => config.clone(),
        };
        let mut node_attributes: Attributes = def
            .get("nodeAttributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        repair_attributes(tag, def, &config, &mut node_attributes);

        Some(Node {
            id: self.ids.next_id(),
            name: name.to_string(),
            node_type: tag.to_string(),
            position: explicit_position(def).unwrap_or_else(|| self.layout.position(index)),
            config,
            node_attributes,
            next: None,
            end: def.get("end").and_then(Value::as_bool).unwrap_or(false),
        })
    }

    fn link_sequential(
        &mut self,
        placed: &mut [(Node, &Value)],
        name_to_id: &AHashMap<String, NodeId>,
    ) {
        for (node, def) in placed.iter_mut() {
            let Some(next_name) = def.get("next").and_then(Value::as_str) else {
                continue;
            };
            if next_name.is_empty() {
                continue;
            }
            match name_to_id.get(next_name) {
                Some(target_id) => {
                    node.next = Some(target_id.clone());
                    self.connect(&node.id, target_id, None);
                }
                None => debug!(
                    node = %node.name,
                    next = next_name,
                    "Dropping unresolved next reference"
                ),
            }
        }
    }

    fn link_choices(
        &mut self,
        placed: &mut [(Node, &Value)],
        name_to_id: &AHashMap<String, NodeId>,
    ) {
        for (node, def) in placed.iter_mut() {
            if node.node_type != CONDITIONAL {
                continue;
            }
            let Some(entries) = choice_source(*def) else {
                continue;
            };

            let mut resolved = Vec::with_capacity(entries.len());
            for choice in entries.iter().filter_map(Choice::from_value) {
                match name_to_id.get(&choice.next) {
                    Some(target_id) => {
                        resolved.push(Choice {
                            condition: choice.condition,
                            next: target_id.clone(),
                        });
                        self.connect(&node.id, target_id, Some(ConnectionType::Choice));
                    }
                    None => debug!(
                        node = %node.name,
                        next = %choice.next,
                        "Dropping unresolved choice"
                    ),
                }
            }

            node.node_attributes.insert(
                CHOICES_KEY.to_string(),
                Value::Array(resolved.iter().map(Choice::to_value).collect()),
            );
        }
    }

    /// Records a connection unless the ordered pair is already joined.
    fn connect(&mut self, source_id: &str, target_id: &str, kind: Option<ConnectionType>) {
        if !self
            .pairs
            .insert((source_id.to_string(), target_id.to_string()))
        {
            return;
        }
        self.connections.push(Connection {
            id: self.ids.next_id(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            connection_type: kind,
        });
    }
}

/// Type-specific fixes for definitions written against older vintages.
fn repair_attributes(tag: &str, def: &Value, config: &Value, attributes: &mut Attributes) {
    match tag {
        CONDITIONAL if def.get(CHOICES_KEY).is_some() => {
            let has_list = attributes.get(CHOICES_KEY).is_some_and(Value::is_array);
            if !has_list {
                attributes.insert(CHOICES_KEY.to_string(), Value::Array(Vec::new()));
            }
        }
        EXECUTE => {
            for key in EXECUTE_MIGRATED_KEYS {
                if let Some(value) = config.get(key) {
                    if !attributes.contains_key(key) {
                        attributes.insert(key.to_string(), value.clone());
                    }
                }
            }
        }
        _ => {}
    }
}

/// The choice list of a conditional definition: a non-empty `nodeAttributes.choices`,
/// else the legacy top-level `choices`.
fn choice_source(def: &Value) -> Option<&Vec<Value>> {
    def.get("nodeAttributes")
        .and_then(|attrs| attrs.get(CHOICES_KEY))
        .and_then(Value::as_array)
        .filter(|choices| !choices.is_empty())
        .or_else(|| def.get(CHOICES_KEY).and_then(Value::as_array))
}

fn explicit_position(def: &Value) -> Option<Position> {
    let position = def.get("position")?;
    Some(Position::new(
        position.get("x")?.as_f64()?,
        position.get("y")?.as_f64()?,
    ))
}
