use super::{Flow, FlowId, MetadataUpdate};
use crate::convert::normalize::{DEFAULT_CONFIG_OWNER, DEFAULT_CONFIG_STATUS, DEFAULT_CONFIG_TYPE};
use crate::convert::{Importer, serialize_flow};
use crate::error::{ExportError, ImportError};
use crate::graph::{ConnectionDraft, GraphStore, NodeDraft};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::wire::{ParamMap, WireDocument};
use serde_json::{Value, json};
use tracing::info;

pub const DEFAULT_FLOW_NAME: &str = "New Flow";
pub const DEFAULT_FLOW_DESCRIPTION: &str = "Flow created with Node Flow Editor";

/// Holds every flow known to the editor and tracks the active one.
///
/// The repository never watches the [`GraphStore`]. Data moves between the two
/// only through [`load_flow_to_node_store`](Self::load_flow_to_node_store) and
/// [`sync_nodes_and_connections`](Self::sync_nodes_and_connections).
pub struct FlowRepository {
    flows: Vec<Flow>,
    active_flow_id: Option<FlowId>,
    importer: Importer,
    ids: Box<dyn IdGenerator>,
}

impl Default for FlowRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowRepository {
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(UuidGenerator))
    }

    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            flows: Vec::new(),
            active_flow_id: None,
            importer: Importer::default(),
            ids,
        }
    }

    pub fn with_importer(mut self, importer: Importer) -> Self {
        self.importer = importer;
        self
    }

    pub fn importer(&self) -> &Importer {
        &self.importer
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn active_flow_id(&self) -> Option<&str> {
        self.active_flow_id.as_deref()
    }

    pub fn active_flow(&self) -> Option<&Flow> {
        self.active_flow_id
            .as_deref()
            .and_then(|id| self.flow_by_id(id))
    }

    pub fn flow_by_id(&self, id: &str) -> Option<&Flow> {
        self.flows.iter().find(|f| f.id == id)
    }

    fn flow_mut(&mut self, id: &str) -> Option<&mut Flow> {
        self.flows.iter_mut().find(|f| f.id == id)
    }

    /// Creates an empty flow with placeholder parameters.
    ///
    /// The new flow becomes active only when no flow is active yet.
    pub fn create_flow(&mut self, name: Option<&str>) -> FlowId {
        let id = self.ids.next_id();
        let flow = Flow {
            id: id.clone(),
            name: name.unwrap_or(DEFAULT_FLOW_NAME).to_string(),
            config_id: self.ids.next_id(),
            config_type: DEFAULT_CONFIG_TYPE.to_string(),
            config_status: DEFAULT_CONFIG_STATUS.to_string(),
            config_owner: DEFAULT_CONFIG_OWNER.to_string(),
            config_description: DEFAULT_FLOW_DESCRIPTION.to_string(),
            input: placeholder_params(&[("param1", "value1"), ("param2", "value2")]),
            required: placeholder_params(&[
                ("requiredParam1", "value1"),
                ("requiredParam2", "value2"),
            ]),
            nodes: Vec::new(),
            connections: Vec::new(),
        };
        self.flows.push(flow);

        if self.active_flow_id.is_none() {
            self.active_flow_id = Some(id.clone());
        }
        id
    }

    /// Activates the flow `id`. Unknown ids are ignored.
    pub fn set_active_flow(&mut self, id: &str) {
        if self.flow_by_id(id).is_some() {
            self.active_flow_id = Some(id.to_string());
        }
    }

    pub fn update_flow_metadata(&mut self, id: &str, update: MetadataUpdate) {
        if let Some(flow) = self.flow_mut(id) {
            update.apply(flow);
        }
    }

    pub fn update_flow_input(&mut self, id: &str, input: ParamMap) {
        if let Some(flow) = self.flow_mut(id) {
            flow.input = input;
        }
    }

    pub fn update_flow_required(&mut self, id: &str, required: ParamMap) {
        if let Some(flow) = self.flow_mut(id) {
            flow.required = required;
        }
    }

    /// Removes a flow. Deleting the active flow activates the first remaining one.
    pub fn delete_flow(&mut self, id: &str) {
        let before = self.flows.len();
        self.flows.retain(|f| f.id != id);
        if self.flows.len() == before {
            return;
        }
        if self.active_flow_id.as_deref() == Some(id) {
            self.active_flow_id = self.flows.first().map(|f| f.id.clone());
        }
        info!(flow_id = id, remaining = self.flows.len(), "Deleted flow");
    }

    /// Checkpoints the store's current contents into the active flow.
    pub fn sync_nodes_and_connections(&mut self, store: &GraphStore) {
        let Some(active) = self.active_flow_id.clone() else {
            return;
        };
        if let Some(flow) = self.flow_mut(&active) {
            flow.nodes = store.nodes().to_vec();
            flow.connections = store.connections().to_vec();
        }
    }

    /// Replaces the store's contents with a copy of flow `id` and activates it.
    ///
    /// Nodes and connections go through the store's regular `add_*` operations, so
    /// its invariants hold for whatever the flow contained.
    pub fn load_flow_to_node_store(&mut self, id: &str, store: &mut GraphStore) {
        let Some(flow) = self.flow_by_id(id) else {
            return;
        };

        store.clear_all();
        for node in &flow.nodes {
            store.add_node(NodeDraft::from(node.clone()));
        }
        for connection in &flow.connections {
            store.add_connection(ConnectionDraft::from(connection.clone()));
        }
        self.active_flow_id = Some(id.to_string());
    }

    /// Parses and imports a JSON document as a new, inactive flow.
    ///
    /// On a parse failure the repository is left untouched.
    pub fn import_flow(&mut self, json: &str) -> Result<FlowId, ImportError> {
        let raw = Importer::parse(json)?;
        Ok(self.import_value(&raw))
    }

    /// Imports an already parsed document as a new, inactive flow.
    pub fn import_value(&mut self, raw: &Value) -> FlowId {
        let fallback_name = format!("Imported Flow {}", self.flows.len() + 1);
        let flow = self
            .importer
            .import_value(raw, &mut *self.ids, &fallback_name);
        let id = flow.id.clone();
        info!(
            flow_id = %id,
            name = %flow.name,
            nodes = flow.nodes.len(),
            connections = flow.connections.len(),
            "Imported flow"
        );
        self.flows.push(flow);
        id
    }

    pub fn export_flow(&self, id: &str) -> Option<WireDocument> {
        self.flow_by_id(id).map(serialize_flow)
    }

    /// Exports flow `id` as pretty-printed JSON.
    pub fn export_flow_json(&self, id: &str) -> Result<String, ExportError> {
        let document = self
            .export_flow(id)
            .ok_or_else(|| ExportError::FlowNotFound(id.to_string()))?;
        info!(flow_id = id, "Exported flow");
        document.to_json_pretty()
    }
}

fn placeholder_params(entries: &[(&str, &str)]) -> ParamMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect()
}
