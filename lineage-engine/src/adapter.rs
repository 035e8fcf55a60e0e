//! Adjacency Adapter — the engine's sole inbound dependency on a graph
//! store.
//!
//! The engine never sees storage internals: it asks for a node and for a
//! node's incident edges and gets back plain values. `InMemoryAdjacencyStore`
//! is the one concrete implementation this workspace ships — a stand-in for
//! a real graph database: secondary indexes rebuilt once from source data
//! for O(1) id lookups thereafter, kept entirely in memory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::model::{IncidentEdge, Node, NodeId, PropertyBag, StoredDirection};

/// The minimal contract the engine requires from a graph store. Anything
/// satisfying this trait — an in-memory fixture, a real
/// database client, a test double — can back a traversal.
pub trait AdjacencyStore: Send + Sync {
    fn get_node(&self, id: &str) -> Option<Node>;
    fn neighbors(&self, id: &str) -> Result<Vec<IncidentEdge>, AdapterError>;
}

/// One edge as it appears in a seed-graph fixture: a source, a destination,
/// an edge name, and optional sub_type/properties. Source/destination
/// order is the edge's stored direction, not necessarily its semantic one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEdge {
    pub source_node: NodeId,
    pub edge_name: String,
    pub destination_node: NodeId,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub properties: PropertyBag,
}

/// A seed graph as loaded from YAML: flat node and edge lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<StoredEdge>,
}

/// In-memory, read-only adjacency store built once from a [`SeedGraph`].
///
/// Indexes every edge from both endpoints so `neighbors()` returns an edge
/// regardless of which direction it was stored in, tagging each result with
/// the direction relative to the queried node.
pub struct InMemoryAdjacencyStore {
    nodes: HashMap<NodeId, Node>,
    adjacency: HashMap<NodeId, Vec<IncidentEdge>>,
}

impl InMemoryAdjacencyStore {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let seed: SeedGraph = serde_yaml::from_str(yaml)?;
        Ok(Self::build(seed))
    }

    pub fn build(seed: SeedGraph) -> Self {
        let mut nodes = HashMap::with_capacity(seed.nodes.len());
        for node in seed.nodes {
            nodes.insert(node.id.clone(), node);
        }

        let mut adjacency: HashMap<NodeId, Vec<IncidentEdge>> = HashMap::new();
        for edge in &seed.edges {
            let (Some(src_type), Some(dst_type)) = (
                nodes.get(&edge.source_node).map(|n| n.node_type.clone()),
                nodes.get(&edge.destination_node).map(|n| n.node_type.clone()),
            ) else {
                continue;
            };

            adjacency
                .entry(edge.source_node.clone())
                .or_default()
                .push(IncidentEdge {
                    edge_name: edge.edge_name.clone(),
                    source_type: src_type.clone(),
                    destination_type: dst_type.clone(),
                    sub_type: edge.sub_type.clone(),
                    other_id: edge.destination_node.clone(),
                    other_type: dst_type.clone(),
                    direction: StoredDirection::Outgoing,
                    properties: edge.properties.clone(),
                });

            adjacency
                .entry(edge.destination_node.clone())
                .or_default()
                .push(IncidentEdge {
                    edge_name: edge.edge_name.clone(),
                    source_type: src_type,
                    destination_type: dst_type,
                    sub_type: edge.sub_type.clone(),
                    other_id: edge.source_node.clone(),
                    other_type: nodes
                        .get(&edge.source_node)
                        .map(|n| n.node_type.clone())
                        .unwrap_or_default(),
                    direction: StoredDirection::Incoming,
                    properties: edge.properties.clone(),
                });
        }

        InMemoryAdjacencyStore { nodes, adjacency }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl AdjacencyStore for InMemoryAdjacencyStore {
    fn get_node(&self, id: &str) -> Option<Node> {
        self.nodes.get(id).cloned()
    }

    fn neighbors(&self, id: &str) -> Result<Vec<IncidentEdge>, AdapterError> {
        Ok(self.adjacency.get(id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SeedGraph {
        SeedGraph {
            nodes: vec![
                Node {
                    id: "ds-001".into(),
                    node_type: "dataset".into(),
                    properties: PropertyBag {
                        name: Some("raw_transactions".into()),
                        ..Default::default()
                    },
                },
                Node {
                    id: "job-001".into(),
                    node_type: "etl_job".into(),
                    properties: PropertyBag {
                        name: Some("ingest_raw_transactions".into()),
                        ..Default::default()
                    },
                },
            ],
            edges: vec![StoredEdge {
                source_node: "ds-001".into(),
                edge_name: "consumes".into(),
                destination_node: "job-001".into(),
                sub_type: None,
                properties: PropertyBag::default(),
            }],
        }
    }

    #[test]
    fn neighbors_are_tagged_with_relative_direction() {
        let store = InMemoryAdjacencyStore::build(sample());
        let from_ds = store.neighbors("ds-001").unwrap();
        assert_eq!(from_ds.len(), 1);
        assert_eq!(from_ds[0].direction, StoredDirection::Outgoing);
        assert_eq!(from_ds[0].other_id, "job-001");

        let from_job = store.neighbors("job-001").unwrap();
        assert_eq!(from_job.len(), 1);
        assert_eq!(from_job[0].direction, StoredDirection::Incoming);
        assert_eq!(from_job[0].other_id, "ds-001");
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let store = InMemoryAdjacencyStore::build(sample());
        assert!(store.neighbors("nope").unwrap().is_empty());
    }
}
