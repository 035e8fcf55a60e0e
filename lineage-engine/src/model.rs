//! Core graph data model: node/edge identities, types, and roles.
//!
//! These types are shared by the taxonomy registry, the traversal engine,
//! the adjacency adapter contract, and the response shapes — they carry no
//! behavior of their own beyond construction and (de)serialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type NodeId = String;

/// The role a node type plays in traversal. Drives direction/visibility
/// defaults but never classification itself — classification is always
/// looked up from the edge rules, never inferred from role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Resource,
    Transformer,
    Structural,
    Container,
    Qualifier,
}

/// One entry of the taxonomy's node-type table: `name -> {role, visible}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTypeDecl {
    pub role: NodeRole,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Opaque-to-the-engine property bag, with the one field (`sub_type`) the
/// engine is allowed to consult semantically, plus typed `name`/`description`
/// since the HTTP response needs real string data, not raw JSON, for those.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyBag {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A node in the lineage graph, as returned by the adjacency adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

/// Direction the adapter stored an edge in, relative to the node that was
/// queried for its neighbors. Not the same thing as semantic up/down or
/// upstream/downstream — those are derived from this plus classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredDirection {
    Outgoing,
    Incoming,
}

impl StoredDirection {
    pub fn flipped(self) -> Self {
        match self {
            StoredDirection::Outgoing => StoredDirection::Incoming,
            StoredDirection::Incoming => StoredDirection::Outgoing,
        }
    }
}

/// One incident edge as returned by the adjacency adapter for a queried
/// node: the other endpoint plus everything the taxonomy registry needs to
/// classify it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentEdge {
    pub edge_name: String,
    pub source_type: String,
    pub destination_type: String,
    #[serde(default)]
    pub sub_type: Option<String>,
    pub other_id: NodeId,
    pub other_type: String,
    pub direction: StoredDirection,
    #[serde(default)]
    pub properties: PropertyBag,
}

/// A retained edge in the output subgraph, keyed by `(source, edge_name,
/// destination, sub_type)` for deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub source_node: NodeId,
    pub edge_name: String,
    pub destination_node: NodeId,
    pub sub_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSummary {
    #[serde(flatten)]
    pub key: EdgeKey,
    pub axis: Axis,
    #[serde(default)]
    pub properties: PropertyBag,
}

/// Classification axis: derivation (X), hierarchy (Y), or association (Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleInHop {
    InputToTransformer,
    OutputFromTransformer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticUp {
    Forward,
    Reverse,
}

/// The result of classifying one `(edge_name, source_type, destination_type,
/// sub_type?)` tuple against the taxonomy. Axis-specific fields are `None`
/// when they don't apply to `axis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeClassification {
    pub axis: Axis,
    pub role_in_hop: Option<RoleInHop>,
    pub hop_group: Option<String>,
    pub semantic_up: Option<SemanticUp>,
}

pub type Properties = HashMap<String, serde_json::Value>;
