//! # Keiro - Workflow Document and Node Graph Converter
//!
//! **Keiro** converts between two representations of the same workflow:
//!
//! - the **wire format**, a declarative JSON document keyed by node *names*, meant for
//!   hand-editing and for execution engines;
//! - the **graph model**, identifier-keyed nodes and connections meant for interactive
//!   editing, where nodes move, get renamed and are rewired freely.
//!
//! ## Core Workflow
//!
//! 1.  **Import**: A document of any vintage is parsed, normalized (legacy input
//!     wrappers, `required` shapes and type keys are reconciled) and materialized into
//!     a [`Flow`](flow::Flow) holding an ordered node list and its connections.
//! 2.  **Edit**: The flow is loaded into a [`GraphStore`](graph::GraphStore), the
//!     working set the editor mutates. Edits are checkpointed back into the
//!     [`FlowRepository`](flow::FlowRepository) explicitly.
//! 3.  **Export**: The flow is serialized back into the canonical wire format.
//!     `startNode` is the first node of the list, `next` and choice references are
//!     turned back into names.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let document = r#"{
//!         "configId": "greeting",
//!         "input": { "who": { "type": "value", "value": "world" } },
//!         "required": ["who"],
//!         "config": {
//!             "startNode": "Begin",
//!             "nodes": {
//!                 "Begin": { "nodeType": "start", "next": "Finish" },
//!                 "Finish": { "nodeType": "end", "end": true }
//!             }
//!         }
//!     }"#;
//!
//!     // 1. Import the document into a repository.
//!     let mut repository = FlowRepository::new();
//!     let flow_id = repository.import_flow(document)?;
//!
//!     // 2. Load it into the working store and edit it.
//!     let mut store = GraphStore::new();
//!     repository.load_flow_to_node_store(&flow_id, &mut store);
//!     let first = store.nodes()[0].id.clone();
//!     store.update_node_name(&first, "Entry");
//!     repository.sync_nodes_and_connections(&store);
//!
//!     // 3. Export it again.
//!     let exported = repository.export_flow_json(&flow_id)?;
//!     println!("{}", exported);
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod error;
pub mod flow;
pub mod graph;
pub mod ids;
pub mod prelude;
pub mod registry;
pub mod wire;
