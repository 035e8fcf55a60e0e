//! Error types for the taxonomy registry, traversal engine, and adapter
//! contract. Each component gets its own `thiserror` enum rather than one
//! flat error spanning the whole crate, so callers can match narrowly.

use thiserror::Error;

/// Raised while compiling a [`crate::taxonomy::TaxonomyDocument`] into a
/// [`crate::taxonomy::TaxonomyRegistry`]. Always fatal at process startup —
/// never encountered once the registry is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("edge rule for '{edge_name}' references unknown node type '{node_type}'")]
    UnknownNodeType {
        edge_name: String,
        node_type: String,
    },

    #[error(
        "edge rule for '{edge_name}' ({source_type} -> {destination_type}, sub_type={sub_type:?}) duplicates an existing rule"
    )]
    DuplicateRule {
        edge_name: String,
        source_type: String,
        destination_type: String,
        sub_type: Option<String>,
    },

    #[error("hop_group '{0}' appears in only one edge rule; it must pair two rules")]
    OrphanedHopGroup(String),

    #[error("edge rule for '{edge_name}' has axis X but is missing hop_group/role_in_hop")]
    IncompleteXRule { edge_name: String },

    #[error("edge rule for '{edge_name}' has axis Y but is missing semantic_up")]
    IncompleteYRule { edge_name: String },

    #[error("malformed taxonomy document: {0}")]
    Parse(String),
}

/// Raised by an [`crate::adapter::AdjacencyStore`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("adjacency store failed to resolve neighbors for '{0}': {1}")]
    Lookup(String, String),
}

/// The request-boundary error kinds, in the order a caller should check
/// them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("start node not found: {0}")]
    StartNotFound(String),

    #[error("unknown node type encountered during traversal: {0}")]
    UnknownNodeType(String),

    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("request cancelled")]
    Cancelled,
}

impl EngineError {
    /// Stable wire code the HTTP layer keys its status-code mapping off of.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidRequest(_) => "INVALID_REQUEST",
            EngineError::StartNotFound(_) => "START_NOT_FOUND",
            EngineError::UnknownNodeType(_) => "UNKNOWN_NODE_TYPE",
            EngineError::Adapter(_) => "ADAPTER_ERROR",
            EngineError::Cancelled => "CANCELLED",
        }
    }
}
