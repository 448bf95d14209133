use thiserror::Error;

/// Errors that can occur while importing a workflow document.
///
/// Only a payload that cannot be parsed at all is reported. Anything that parses
/// is imported on a best-effort basis (see the materializer for what gets dropped).
#[derive(Error, Debug, Clone)]
pub enum ImportError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),
}

/// Errors raised by the node type registry.
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    #[error("Unknown node type: '{0}'")]
    UnknownNodeType(String),

    #[error("Cannot map '{alias}' to '{target}': no node type named '{target}' is registered")]
    InvalidTypeMapping { alias: String, target: String },
}

/// Errors that can occur when exporting a flow from the repository.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Flow '{0}' not found in the repository")]
    FlowNotFound(String),

    #[error("Failed to serialize workflow document: {0}")]
    SerializationError(String),
}
