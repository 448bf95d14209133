use crate::flow::Flow;
use crate::graph::{CHOICES_KEY, Choice, Node};
use crate::registry::CONDITIONAL;
use crate::wire::{ParamMap, WireConfig, WireDocument, WireInput, WireNode};
use ahash::AHashMap;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Rebuilds the name-keyed `config` section from an ordered node list.
///
/// `startNode` is the name of the first node. Identifiers in `next` and in
/// conditional choices are turned back into names; choices whose target no longer
/// exists are dropped. Nodes sharing a name overwrite each other, the last one wins.
pub fn serialize_graph(nodes: &[Node]) -> WireConfig {
    let id_to_name: AHashMap<&str, &str> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.name.as_str()))
        .collect();

    let mut wire_nodes = IndexMap::with_capacity(nodes.len());
    for node in nodes {
        let next = node
            .next
            .as_deref()
            .and_then(|id| id_to_name.get(id))
            .map(|name| name.to_string());

        let mut node_attributes = node.node_attributes.clone();
        if node.node_type == CONDITIONAL && has_choices(node) {
            let named: Vec<Value> = node
                .choices()
                .into_iter()
                .filter_map(|choice| match id_to_name.get(choice.next.as_str()) {
                    Some(name) => Some(Choice::new(choice.condition, name).to_value()),
                    None => {
                        debug!(
                            node = %node.name,
                            next = %choice.next,
                            "Dropping choice to a missing node"
                        );
                        None
                    }
                })
                .collect();
            node_attributes.insert(CHOICES_KEY.to_string(), Value::Array(named));
        }

        let config = match &node.config {
            Value::Null => Value::Object(Map::new()),
            config => config.clone(),
        };

        wire_nodes.insert(
            node.name.clone(),
            WireNode {
                node_type: node.node_type.clone(),
                config,
                next,
                end: node.end,
                node_attributes,
            },
        );
    }

    WireConfig {
        start_node: nodes.first().map(|n| n.name.clone()),
        nodes: wire_nodes,
    }
}

fn has_choices(node: &Node) -> bool {
    node.node_attributes
        .get(CHOICES_KEY)
        .and_then(Value::as_array)
        .is_some_and(|choices| !choices.is_empty())
}

/// Wraps the canonical parameter maps back into wire form.
///
/// Inputs keep their order. Required names missing from `input` are appended with
/// the value recorded for them in `required`.
pub fn wrap_parameters(
    input: &ParamMap,
    required: &ParamMap,
) -> (IndexMap<String, WireInput>, Vec<String>) {
    let mut wrapped: IndexMap<String, WireInput> = input
        .iter()
        .map(|(name, value)| (name.clone(), WireInput::value(value.clone())))
        .collect();
    for (name, value) in required {
        if !wrapped.contains_key(name) {
            wrapped.insert(name.clone(), WireInput::value(value.clone()));
        }
    }
    (wrapped, required.keys().cloned().collect())
}

/// Exports a flow as a wire document.
pub fn serialize_flow(flow: &Flow) -> WireDocument {
    let (input, required) = wrap_parameters(&flow.input, &flow.required);
    WireDocument {
        config_id: flow.config_id.clone(),
        config_type: flow.config_type.clone(),
        config_status: flow.config_status.clone(),
        config_owner: flow.config_owner.clone(),
        config_description: flow.config_description.clone(),
        input,
        required,
        config: serialize_graph(&flow.nodes),
    }
}
