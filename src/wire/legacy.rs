//! Structural discrimination between the vintages of the wire format.
//!
//! The format never carried a version number, so every decision here is made from
//! the shape of the data alone.

use serde_json::{Map, Value};

/// `true` for the current input form, an object carrying a `value` key.
pub fn has_value_wrapper(entry: &Value) -> bool {
    entry.as_object().is_some_and(|o| o.contains_key("value"))
}

/// `true` for the current `required` form, an array of names.
pub fn is_array_required(required: &Value) -> bool {
    required.is_array()
}

/// `true` when a node definition names its type only through the legacy `type` key.
pub fn has_legacy_type_key(node_def: &Value) -> bool {
    matches!(TypeTag::of(node_def), TypeTag::Legacy(_))
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// One entry of a document's `input` map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEntry<'a> {
    /// `{"type": "value", "value": v}`
    Wrapped(&'a Value),
    /// A bare `v`.
    Bare(&'a Value),
}

impl<'a> InputEntry<'a> {
    pub fn of(entry: &'a Value) -> Self {
        match entry.get("value") {
            Some(inner) if has_value_wrapper(entry) => InputEntry::Wrapped(inner),
            _ => InputEntry::Bare(entry),
        }
    }

    /// The parameter value, unwrapped.
    pub fn value(self) -> &'a Value {
        match self {
            InputEntry::Wrapped(v) | InputEntry::Bare(v) => v,
        }
    }
}

/// A document's `required` field.
#[derive(Debug, Clone, PartialEq)]
pub enum RequiredSet<'a> {
    /// `["a", "b"]`. Non-string elements are dropped.
    Names(Vec<&'a str>),
    /// `{"a": v, ...}`
    Legacy(&'a Map<String, Value>),
    /// Missing or of an unusable shape.
    Absent,
}

impl<'a> RequiredSet<'a> {
    pub fn of(required: Option<&'a Value>) -> Self {
        match required {
            Some(value) if is_array_required(value) => RequiredSet::Names(
                value
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .collect(),
            ),
            Some(Value::Object(map)) => RequiredSet::Legacy(map),
            _ => RequiredSet::Absent,
        }
    }
}

/// Where a node definition's type tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag<'a> {
    Current(&'a str),
    Legacy(&'a str),
    Missing,
}

impl<'a> TypeTag<'a> {
    /// Reads `nodeType`, falling back to `type`. The first non-empty string wins.
    pub fn of(node_def: &'a Value) -> Self {
        if let Some(tag) = non_empty_str(node_def, "nodeType") {
            TypeTag::Current(tag)
        } else if let Some(tag) = non_empty_str(node_def, "type") {
            TypeTag::Legacy(tag)
        } else {
            TypeTag::Missing
        }
    }

    pub fn tag(self) -> Option<&'a str> {
        match self {
            TypeTag::Current(tag) | TypeTag::Legacy(tag) => Some(tag),
            TypeTag::Missing => None,
        }
    }
}
