//! The name-keyed workflow document exchanged with files and execution engines.
//!
//! [`WireDocument`] is the shape export produces. Import is more permissive: it
//! walks a raw [`serde_json::Value`] through the predicates in [`legacy`] so that
//! older vintages of the format are accepted as well.

use crate::error::ExportError;
use crate::graph::Attributes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod legacy;

pub use legacy::{
    InputEntry, RequiredSet, TypeTag, has_legacy_type_key, has_value_wrapper, is_array_required,
};

/// Parameter name to bare value, in document order.
pub type ParamMap = IndexMap<String, Value>;

/// Marker stored in the `type` field of every wrapped input.
pub const VALUE_INPUT_TYPE: &str = "value";

/// A wrapped input parameter: `{"type": "value", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
}

impl WireInput {
    pub fn value(value: Value) -> Self {
        Self {
            kind: VALUE_INPUT_TYPE.to_string(),
            value,
        }
    }
}

/// A node definition, keyed by the node's name in [`WireConfig::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    pub node_type: String,
    pub config: Value,
    /// Name of the successor node.
    pub next: Option<String>,
    pub end: bool,
    #[serde(default)]
    pub node_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConfig {
    pub start_node: Option<String>,
    pub nodes: IndexMap<String, WireNode>,
}

/// A complete exported workflow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    pub config_id: String,
    pub config_type: String,
    pub config_status: String,
    pub config_owner: String,
    pub config_description: String,
    pub input: IndexMap<String, WireInput>,
    pub required: Vec<String>,
    pub config: WireConfig,
}

impl WireDocument {
    pub fn to_json_value(&self) -> Result<Value, ExportError> {
        serde_json::to_value(self).map_err(|e| ExportError::SerializationError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExportError::SerializationError(e.to_string()))
    }
}
