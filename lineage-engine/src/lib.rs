//! `lineage-engine` — a taxonomy-driven traversal engine over a data-lineage
//! property graph: classify every edge onto one of three axes (derivation,
//! hierarchy, association), bound association fan-out with a per-path hop
//! cap, and collapse the result into readable logical steps.
//!
//! The crate is storage-agnostic: [`adapter::AdjacencyStore`] is the only
//! thing it asks of a graph, drawing a hard line between the graph engine
//! and its storage layer.

pub mod adapter;
pub mod collapse;
pub mod engine;
pub mod error;
pub mod model;
pub mod request;
pub mod taxonomy;

pub use adapter::{AdjacencyStore, InMemoryAdjacencyStore, SeedGraph, StoredEdge};
pub use engine::{CancellationToken, TraversalEngine};
pub use error::{AdapterError, EngineError, TaxonomyError};
pub use model::{Axis, Node, NodeId, NodeRole, PropertyBag};
pub use request::{TraversalRequest, TraversalResponse};
pub use taxonomy::{TaxonomyDocument, TaxonomyRegistry};

use std::collections::{HashMap, HashSet};

use model::{EdgeSummary, NodeId as Id};
use request::{NodeSummary, StartNode, TraversalMetadata};

/// Run one traversal end to end: classify, bound, collapse, and shape the
/// result into the wire-level [`TraversalResponse`]. The one entry point
/// callers (the HTTP layer, tests, anything else) are expected to use —
/// `TraversalEngine`/`collapse` are public for composability but this is the
/// call most callers want.
pub fn run_traversal(
    registry: &TaxonomyRegistry,
    adapter: &dyn AdjacencyStore,
    request: &TraversalRequest,
    cancel: &CancellationToken,
) -> Result<TraversalResponse, EngineError> {
    let raw = TraversalEngine::new(registry, adapter).traverse(request, cancel)?;

    let (path_records, retained, bridged_edges) = collapse::collapse(
        registry,
        &raw.nodes,
        &raw.paths,
        request.include_transformers,
    );

    let mut retained: HashSet<Id> = retained;
    retained.insert(raw.start.id.clone());

    let mut nodes: Vec<NodeSummary> = raw
        .nodes
        .iter()
        .filter(|(id, _)| retained.contains(*id))
        .map(|(id, node)| NodeSummary {
            id: id.clone(),
            node_type: node.node_type.clone(),
            properties: node.properties.clone(),
        })
        .collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let mut all_edges: HashMap<model::EdgeKey, (model::PropertyBag, model::Axis)> = raw
        .edges
        .into_iter()
        .filter(|(key, _)| retained.contains(&key.source_node) && retained.contains(&key.destination_node))
        .collect();
    for (key, value) in bridged_edges {
        all_edges.entry(key).or_insert(value);
    }

    let mut edges: Vec<EdgeSummary> = all_edges
        .into_iter()
        .map(|(key, (properties, axis))| EdgeSummary {
            key,
            axis,
            properties,
        })
        .collect();
    edges.sort_by(|a, b| {
        (a.key.source_node.as_str(), a.key.edge_name.as_str(), a.key.destination_node.as_str())
            .cmp(&(b.key.source_node.as_str(), b.key.edge_name.as_str(), b.key.destination_node.as_str()))
    });

    Ok(TraversalResponse {
        start_node: StartNode {
            id: raw.start.id.clone(),
            node_type: raw.start.node_type.clone(),
            name: raw.start.properties.name.clone(),
        },
        nodes,
        edges,
        paths: path_records,
        traversal_metadata: TraversalMetadata {
            z_hops_taken: raw.z_hops_taken_total,
            total_nodes_visited: raw.nodes.len(),
            blocked_z_of_z_paths: raw.blocked_z_of_z_paths,
        },
    })
}
