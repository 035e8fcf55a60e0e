//! Traversal Engine — bounded BFS from a start node, enforcing the Z cap
//! and axis/direction filters per path, and accumulating the raw subgraph
//! the Hop Collapser then reshapes into a response.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::EngineError;
use crate::model::{Axis, EdgeKey, IncidentEdge, Node, NodeId, PropertyBag, RoleInHop, StoredDirection};
use crate::request::{StepDirection, TraversalRequest, XDirection, YDirection};
use crate::taxonomy::TaxonomyRegistry;
use crate::AdjacencyStore;

/// Cooperative cancellation flag checked between frontier iterations and
/// before each Adapter call. A plain atomic, not tied to any
/// particular async executor — the HTTP layer decides how to flip it.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One edge traversed on a path, in traversal order (`from` = the tip
/// before this step, `to` = the tip after). Carries everything the Hop
/// Collapser needs: classification metadata plus the semantic direction
/// actually travelled.
#[derive(Debug, Clone)]
pub struct RawStep {
    pub edge_name: String,
    pub from: NodeId,
    pub to: NodeId,
    pub axis: Axis,
    pub direction: StepDirection,
    pub hop_group: Option<String>,
    pub role_in_hop: Option<RoleInHop>,
}

/// Output of `Traverse` before collapsing: the full raw node/edge sets and
/// every leaf-terminated path, plus diagnostics.
pub struct RawSubgraph {
    pub start: Node,
    pub nodes: HashMap<NodeId, Node>,
    pub edges: HashMap<EdgeKey, (PropertyBag, Axis)>,
    pub paths: Vec<Vec<RawStep>>,
    pub z_hops_taken_total: u32,
    pub blocked_z_of_z_paths: usize,
}

struct FrontierState {
    node_id: NodeId,
    path: Vec<NodeId>,
    path_steps: Vec<RawStep>,
    z_hops_taken: u32,
    depth: u32,
}

pub struct TraversalEngine<'a> {
    registry: &'a TaxonomyRegistry,
    adapter: &'a dyn AdjacencyStore,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(registry: &'a TaxonomyRegistry, adapter: &'a dyn AdjacencyStore) -> Self {
        TraversalEngine { registry, adapter }
    }

    pub fn traverse(
        &self,
        request: &TraversalRequest,
        cancel: &CancellationToken,
    ) -> Result<RawSubgraph, EngineError> {
        request
            .validate()
            .map_err(EngineError::InvalidRequest)?;

        let start = self
            .adapter
            .get_node(&request.start_node_id)
            .ok_or_else(|| EngineError::StartNotFound(request.start_node_id.clone()))?;

        if self.registry.node_role(&start.node_type).is_none() {
            return Err(EngineError::UnknownNodeType(start.node_type.clone()));
        }

        debug!(
            start_node_id = %request.start_node_id,
            axes = ?request.axes,
            "traversal started"
        );

        let mut nodes: HashMap<NodeId, Node> = HashMap::new();
        nodes.insert(start.id.clone(), start.clone());
        let mut edges: HashMap<EdgeKey, (PropertyBag, Axis)> = HashMap::new();
        let mut paths: Vec<Vec<RawStep>> = Vec::new();
        let mut z_hops_taken_total: u32 = 0;
        let mut blocked_z_of_z_paths: usize = 0;

        let mut frontier: VecDeque<FrontierState> = VecDeque::new();
        frontier.push_back(FrontierState {
            node_id: start.id.clone(),
            path: vec![start.id.clone()],
            path_steps: Vec::new(),
            z_hops_taken: 0,
            depth: 0,
        });

        while let Some(state) = frontier.pop_front() {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            if request.max_depth == Some(state.depth) {
                if !state.path_steps.is_empty() {
                    paths.push(state.path_steps);
                }
                continue;
            }

            let incident = self.adapter.neighbors(&state.node_id)?;
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let mut expanded = false;

            for edge in &incident {
                let Some(classification) = self.registry.classify(
                    &edge.edge_name,
                    &edge.source_type,
                    &edge.destination_type,
                    edge.sub_type.as_deref(),
                ) else {
                    continue;
                };

                if !request.wants_axis(classification.axis) {
                    continue;
                }

                let (admitted, step_direction) = match classification.axis {
                    Axis::X => {
                        let upstream = edge.direction == StoredDirection::Incoming;
                        let admitted = match request.x_direction {
                            XDirection::Upstream => upstream,
                            XDirection::Downstream => !upstream,
                            XDirection::Both => true,
                        };
                        let direction = if upstream {
                            StepDirection::Upstream
                        } else {
                            StepDirection::Downstream
                        };
                        (admitted, direction)
                    }
                    Axis::Y => {
                        let semantic_up = classification
                            .semantic_up
                            .expect("Y classification always carries semantic_up");
                        let moving_up = (edge.direction == StoredDirection::Outgoing)
                            == (semantic_up == crate::model::SemanticUp::Forward);
                        let admitted = match request.y_direction {
                            YDirection::Up => moving_up,
                            YDirection::Down => !moving_up,
                            YDirection::Both => true,
                        };
                        let direction = if moving_up {
                            StepDirection::Up
                        } else {
                            StepDirection::Down
                        };
                        (admitted, direction)
                    }
                    Axis::Z => {
                        let direction = match edge.direction {
                            StoredDirection::Outgoing => StepDirection::Outgoing,
                            StoredDirection::Incoming => StepDirection::Incoming,
                        };
                        (true, direction)
                    }
                };

                if !admitted {
                    continue;
                }

                if classification.axis == Axis::Z && state.z_hops_taken == request.max_z_hops {
                    blocked_z_of_z_paths += 1;
                    continue;
                }

                if state.path.contains(&edge.other_id) {
                    continue;
                }

                if self.registry.node_role(&edge.other_type).is_none() {
                    return Err(EngineError::UnknownNodeType(edge.other_type.clone()));
                }

                let (source_node, destination_node) = match edge.direction {
                    StoredDirection::Outgoing => (state.node_id.clone(), edge.other_id.clone()),
                    StoredDirection::Incoming => (edge.other_id.clone(), state.node_id.clone()),
                };
                edges
                    .entry(EdgeKey {
                        source_node,
                        edge_name: edge.edge_name.clone(),
                        destination_node,
                        sub_type: edge.sub_type.clone(),
                    })
                    .or_insert_with(|| (edge.properties.clone(), classification.axis));

                let other_node = self
                    .adapter
                    .get_node(&edge.other_id)
                    .ok_or_else(|| EngineError::UnknownNodeType(edge.other_type.clone()))?;
                nodes.entry(edge.other_id.clone()).or_insert(other_node);

                let mut next_path = state.path.clone();
                next_path.push(edge.other_id.clone());
                let mut next_path_steps = state.path_steps.clone();
                next_path_steps.push(RawStep {
                    edge_name: edge.edge_name.clone(),
                    from: state.node_id.clone(),
                    to: edge.other_id.clone(),
                    axis: classification.axis,
                    direction: step_direction,
                    hop_group: classification.hop_group.clone(),
                    role_in_hop: classification.role_in_hop,
                });

                let next_z = state.z_hops_taken + if classification.axis == Axis::Z { 1 } else { 0 };
                z_hops_taken_total += if classification.axis == Axis::Z { 1 } else { 0 };

                expanded = true;
                frontier.push_back(FrontierState {
                    node_id: edge.other_id.clone(),
                    path: next_path,
                    path_steps: next_path_steps,
                    z_hops_taken: next_z,
                    depth: state.depth + 1,
                });
            }

            if !expanded && !state.path_steps.is_empty() {
                paths.push(state.path_steps);
            }
        }

        debug!(
            total_nodes_visited = nodes.len(),
            blocked_z_of_z_paths, "traversal finished"
        );

        Ok(RawSubgraph {
            start,
            nodes,
            edges,
            paths,
            z_hops_taken_total,
            blocked_z_of_z_paths,
        })
    }
}
