//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the keiro crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//!
//! let mut repository = FlowRepository::new();
//! let flow_id = repository.import_flow(&json)?;
//! let document = repository.export_flow(&flow_id).expect("flow was just imported");
//!
//! println!("Start node: {:?}", document.config.start_node);
//! # Ok(())
//! # }
//! ```

// Stores
pub use crate::flow::{Flow, FlowId, FlowRepository, MetadataUpdate};
pub use crate::graph::{
    Choice, Connection, ConnectionDraft, ConnectionType, Graph, GraphStore, Node, NodeDraft,
    NodeUpdate, Position,
};

// Import and export
pub use crate::convert::{GridLayout, Importer, serialize_flow, serialize_graph};
pub use crate::wire::{ParamMap, WireConfig, WireDocument, WireInput, WireNode};

// Node types
pub use crate::registry::{NodeType, NodeTypeRegistry, ValidationReport};

// Identifiers
pub use crate::ids::{IdGenerator, SequentialIds, UuidGenerator};

// Error types
pub use crate::error::{ExportError, ImportError, RegistryError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
