use crate::error::RegistryError;
use crate::graph::{Attributes, Node, NodeDraft, Position};
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

mod types;

pub use types::{CONDITIONAL, END, EXECUTE, PARALLEL, REST_API, START};

/// Outcome of validating a single node against its type's rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn ok() -> Self {
        Self::from_errors(Vec::new())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "valid")
        } else {
            write!(f, "{}", self.errors.iter().join("; "))
        }
    }
}

/// Defines the contract for a node type: its defaults and its validation rules.
pub trait NodeType: Send + Sync {
    fn type_name(&self) -> &str;
    fn label(&self) -> &str;
    fn default_config(&self) -> Value;
    fn default_node_attributes(&self) -> Attributes {
        Attributes::new()
    }
    fn validate(&self, node: &Node) -> ValidationReport;
}

/// Maps type tags to [`NodeType`]s.
///
/// The default registry knows the six built-in types (`start`, `end`,
/// `conditional`, `execute`, `parallel`, `restApi`). Extra tags are added with
/// [`register`](Self::register) or aliased onto an existing type with
/// [`add_type_mapping`](Self::add_type_mapping).
#[derive(Clone)]
pub struct NodeTypeRegistry {
    types: AHashMap<String, Arc<dyn NodeType>>,
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTypeRegistry")
            .field("types", &self.types.keys().sorted().collect::<Vec<_>>())
            .finish()
    }
}

impl NodeTypeRegistry {
    /// A registry holding the built-in node types.
    pub fn new() -> Self {
        let mut builtin = AHashMap::new();
        types::register_default_node_types(&mut builtin);
        Self { types: builtin }
    }

    /// A registry that knows no types at all.
    pub fn empty() -> Self {
        Self {
            types: AHashMap::new(),
        }
    }

    pub fn register(&mut self, node_type: Arc<dyn NodeType>) {
        self.types
            .insert(node_type.type_name().to_string(), node_type);
    }

    /// Makes `alias` resolve to the same node type as `target`.
    pub fn add_type_mapping(&mut self, alias: &str, target: &str) -> Result<(), RegistryError> {
        let node_type = self
            .types
            .get(target)
            .cloned()
            .ok_or_else(|| RegistryError::InvalidTypeMapping {
                alias: alias.to_string(),
                target: target.to_string(),
            })?;
        self.types.insert(alias.to_string(), node_type);
        Ok(())
    }

    pub fn get_node_type(&self, tag: &str) -> Option<&dyn NodeType> {
        self.types.get(tag).map(|t| &**t)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    /// Registered tags in alphabetical order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).sorted().collect()
    }

    /// Builds a draft for a new node of type `tag`, seeded with the type's defaults.
    ///
    /// Without an explicit name the draft is called `"<Label> Node"`.
    pub fn create_node(
        &self,
        tag: &str,
        position: Position,
        name: Option<&str>,
    ) -> Result<NodeDraft, RegistryError> {
        let node_type = self
            .get_node_type(tag)
            .ok_or_else(|| RegistryError::UnknownNodeType(tag.to_string()))?;
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} Node", node_type.label()));

        Ok(NodeDraft::new(tag)
            .with_name(&name)
            .at(position)
            .with_config(node_type.default_config())
            .with_attributes(node_type.default_node_attributes()))
    }

    /// Validates `node` with the rules of its type. Unregistered types are invalid.
    pub fn validate(&self, node: &Node) -> ValidationReport {
        match self.get_node_type(&node.node_type) {
            Some(node_type) => node_type.validate(node),
            None => ValidationReport::from_errors(vec![format!(
                "Unknown node type: {}",
                node.node_type
            )]),
        }
    }
}
