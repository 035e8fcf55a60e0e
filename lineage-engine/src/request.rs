//! Request/response data model for `Traverse`. Wire format is JSON via
//! `serde`, but the contract is this data shape, not the encoding — the HTTP layer in `lineage-api` is just one caller of it.

use serde::{Deserialize, Serialize};

use crate::model::{Axis, EdgeSummary, NodeId, PropertyBag};

/// Upper bound on `max_z_hops` a request may ask for, independent of any
/// particular taxonomy.
pub const MAX_Z_HOPS_SYSTEM_CAP: u32 = 4;

/// Default `max_z_hops` when a request omits it.
pub const DEFAULT_MAX_Z_HOPS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XDirection {
    Upstream,
    Downstream,
    Both,
}

impl Default for XDirection {
    fn default() -> Self {
        XDirection::Both
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YDirection {
    Up,
    Down,
    Both,
}

impl Default for YDirection {
    fn default() -> Self {
        YDirection::Both
    }
}

fn default_max_z_hops() -> u32 {
    DEFAULT_MAX_Z_HOPS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalRequest {
    pub start_node_id: NodeId,
    pub axes: Vec<Axis>,
    #[serde(default)]
    pub x_direction: XDirection,
    #[serde(default)]
    pub y_direction: YDirection,
    #[serde(default = "default_max_z_hops")]
    pub max_z_hops: u32,
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub include_transformers: bool,
}

impl TraversalRequest {
    /// Request validation. Runs before any Adapter call is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_node_id.trim().is_empty() {
            return Err("start_node_id must not be empty".to_string());
        }
        if self.axes.is_empty() {
            return Err("axes must be a non-empty subset of {X, Y, Z}".to_string());
        }
        if self.max_z_hops > MAX_Z_HOPS_SYSTEM_CAP {
            return Err(format!(
                "max_z_hops {} exceeds system cap {}",
                self.max_z_hops, MAX_Z_HOPS_SYSTEM_CAP
            ));
        }
        Ok(())
    }

    pub fn wants_axis(&self, axis: Axis) -> bool {
        self.axes.contains(&axis)
    }
}

/// The semantic direction actually traveled on one step, independent of how
/// it was stored. X/Y carry the traversal-relative sense the request asked
/// about; Z carries the raw stored direction, since Z is modeled as
/// undirected reachability but recorded with stored direction for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    Upstream,
    Downstream,
    Up,
    Down,
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalStep {
    pub axis: Axis,
    pub direction: StepDirection,
    pub from: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<NodeId>,
    pub edge_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRecord {
    pub logical_steps: Vec<LogicalStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalMetadata {
    pub z_hops_taken: u32,
    pub total_nodes_visited: usize,
    pub blocked_z_of_z_paths: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalResponse {
    pub start_node: StartNode,
    pub nodes: Vec<NodeSummary>,
    pub edges: Vec<EdgeSummary>,
    pub paths: Vec<PathRecord>,
    pub traversal_metadata: TraversalMetadata,
}
