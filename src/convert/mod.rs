use crate::error::ImportError;
use crate::flow::Flow;
use crate::graph::{Graph, Position};
use crate::ids::IdGenerator;
use crate::registry::{NodeType, NodeTypeRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

mod materialize;
pub mod normalize;
pub mod serialize;

use materialize::GraphMaterializer;
pub use normalize::{NormalizedDocument, normalize_document, normalize_input, normalize_required};
pub use serialize::{serialize_flow, serialize_graph, wrap_parameters};

/// Row-major grid used to place imported nodes on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub origin_x: f64,
    pub origin_y: f64,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub columns: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 100.0,
            spacing_x: 250.0,
            spacing_y: 150.0,
            columns: 3,
        }
    }
}

impl GridLayout {
    /// Position of the `index`-th node in document order.
    pub fn position(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        let row = index / columns;
        let col = index % columns;
        Position::new(
            self.origin_x + col as f64 * self.spacing_x,
            self.origin_y + row as f64 * self.spacing_y,
        )
    }
}

/// Turns wire documents of any vintage into [`Flow`]s.
///
/// An importer is configured once through [`Importer::builder`] and can then be
/// reused for any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    registry: NodeTypeRegistry,
    layout: GridLayout,
}

pub struct ImporterBuilder {
    registry: NodeTypeRegistry,
    layout: GridLayout,
}

impl Default for ImporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImporterBuilder {
    pub fn new() -> Self {
        Self {
            registry: NodeTypeRegistry::new(),
            layout: GridLayout::default(),
        }
    }

    /// Replaces the registry deciding which node types are importable.
    pub fn with_registry(mut self, registry: NodeTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Accepts `user_type_name` wherever `builtin_type_name` would be accepted.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if let Err(e) = self
            .registry
            .add_type_mapping(user_type_name, builtin_type_name)
        {
            warn!("Ignoring type mapping: {}", e);
        }
        self
    }

    pub fn with_node_type(mut self, node_type: Arc<dyn NodeType>) -> Self {
        self.registry.register(node_type);
        self
    }

    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn build(self) -> Importer {
        Importer {
            registry: self.registry,
            layout: self.layout,
        }
    }
}

impl Importer {
    pub fn builder() -> ImporterBuilder {
        ImporterBuilder::new()
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Parses a JSON payload. This is the only step of an import that can fail.
    pub fn parse(json: &str) -> Result<Value, ImportError> {
        serde_json::from_str(json).map_err(|e| ImportError::JsonParseError(e.to_string()))
    }

    pub fn normalize(&self, raw: &Value) -> NormalizedDocument {
        normalize_document(raw)
    }

    /// Builds the graph for a normalized document's node definitions.
    pub fn materialize(&self, doc: &NormalizedDocument, ids: &mut dyn IdGenerator) -> Graph {
        GraphMaterializer::new(&self.registry, &self.layout, ids)
            .materialize(&doc.nodes, doc.start_node.as_deref())
    }

    /// Imports an already parsed document.
    ///
    /// `fallback_name` is used when the document carries no `name`. Never fails:
    /// fields of the wrong shape fall back to defaults, and unusable nodes and
    /// references are dropped.
    pub fn import_value(
        &self,
        raw: &Value,
        ids: &mut dyn IdGenerator,
        fallback_name: &str,
    ) -> Flow {
        let doc = self.normalize(raw);
        let id = ids.next_id();
        let config_id = match &doc.config_id {
            Some(config_id) => config_id.clone(),
            None => ids.next_id(),
        };
        let graph = self.materialize(&doc, ids);
        debug!(flow_id = %id, nodes = graph.nodes.len(), "Imported flow");

        Flow {
            id,
            name: doc.name.unwrap_or_else(|| fallback_name.to_string()),
            config_id,
            config_type: doc.config_type,
            config_status: doc.config_status,
            config_owner: doc.config_owner,
            config_description: doc.config_description,
            input: doc.input,
            required: doc.required,
            nodes: graph.nodes,
            connections: graph.connections,
        }
    }

    /// Parses and imports a JSON payload.
    pub fn import_str(
        &self,
        json: &str,
        ids: &mut dyn IdGenerator,
        fallback_name: &str,
    ) -> Result<Flow, ImportError> {
        let raw = Self::parse(json)?;
        Ok(self.import_value(&raw, ids, fallback_name))
    }
}
