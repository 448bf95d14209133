use crate::wire::{InputEntry, ParamMap, RequiredSet};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_TYPE: &str = "workflow";
pub const DEFAULT_CONFIG_STATUS: &str = "draft";
pub const DEFAULT_CONFIG_OWNER: &str = "user";
pub const IMPORTED_DESCRIPTION: &str = "Imported flow";

/// A raw document reduced to its canonical in-memory form.
///
/// `config_id` and `name` stay optional here because filling them in needs
/// collaborators (an id generator, the repository's flow count) that
/// normalization does not have.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    pub name: Option<String>,
    pub config_id: Option<String>,
    pub config_type: String,
    pub config_status: String,
    pub config_owner: String,
    pub config_description: String,
    pub input: ParamMap,
    /// Required names, each mapped to a value suitable for pre-filling an editor.
    pub required: ParamMap,
    pub start_node: Option<String>,
    /// Node definitions by name, in document order. Still raw: the materializer
    /// interprets them.
    pub nodes: IndexMap<String, Value>,
}

/// Unwraps every input entry; wrapped and bare entries may be mixed freely.
pub fn normalize_input(input: Option<&Value>) -> ParamMap {
    let Some(Value::Object(entries)) = input else {
        return ParamMap::new();
    };
    entries
        .iter()
        .map(|(name, entry)| (name.clone(), InputEntry::of(entry).value().clone()))
        .collect()
}

/// Turns either shape of `required` into a name-to-value map.
///
/// For the array shape each name takes the wrapped value of the matching raw input
/// entry, or `""` when there is none. The legacy object shape is copied unchanged.
pub fn normalize_required(required: Option<&Value>, raw_input: Option<&Value>) -> ParamMap {
    match RequiredSet::of(required) {
        RequiredSet::Names(names) => names
            .into_iter()
            .map(|name| {
                let value = raw_input
                    .and_then(|input| input.get(name))
                    .and_then(|entry| match InputEntry::of(entry) {
                        InputEntry::Wrapped(value) => Some(value.clone()),
                        InputEntry::Bare(_) => None,
                    })
                    .unwrap_or_else(|| Value::String(String::new()));
                (name.to_string(), value)
            })
            .collect(),
        RequiredSet::Legacy(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        RequiredSet::Absent => ParamMap::new(),
    }
}

fn non_empty_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalizes a parsed document of any vintage.
///
/// Fields of the wrong shape are treated as missing rather than rejected.
pub fn normalize_document(raw: &Value) -> NormalizedDocument {
    let raw_input = raw.get("input");
    let config = raw.get("config").filter(|c| c.is_object());

    let nodes: IndexMap<String, Value> = match config.and_then(|c| c.get("nodes")) {
        Some(Value::Object(defs)) => defs.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => IndexMap::new(),
    };
    let start_node = config.and_then(|c| non_empty_string(c, "startNode"));

    let doc = NormalizedDocument {
        name: non_empty_string(raw, "name"),
        config_id: non_empty_string(raw, "configId"),
        config_type: non_empty_string(raw, "configType")
            .unwrap_or_else(|| DEFAULT_CONFIG_TYPE.to_string()),
        config_status: non_empty_string(raw, "configStatus")
            .unwrap_or_else(|| DEFAULT_CONFIG_STATUS.to_string()),
        config_owner: non_empty_string(raw, "configOwner")
            .unwrap_or_else(|| DEFAULT_CONFIG_OWNER.to_string()),
        config_description: non_empty_string(raw, "configDescription")
            .unwrap_or_else(|| IMPORTED_DESCRIPTION.to_string()),
        input: normalize_input(raw_input),
        required: normalize_required(raw.get("required"), raw_input),
        start_node,
        nodes,
    };

    debug!(
        inputs = doc.input.len(),
        required = doc.required.len(),
        node_defs = doc.nodes.len(),
        "Normalized workflow document"
    );
    doc
}
