//! Hop Collapser — reshapes the raw per-path edge sequences produced by the
//! Traversal Engine into the user-facing shape.
//!
//! Two transformations, applied in order, per path:
//! 1. structural passthrough: fold out nodes whose taxonomy entry marks
//!    them `visible: false`, bridging the edges that touched them.
//! 2. X-axis hop collapsing: fold consecutive `resource -> transformer ->
//!    resource` edge pairs sharing a `hop_group` into one logical step.
//!
//! Collapsing never prunes reachable material — it only reshapes already-
//! accumulated raw nodes/edges/paths; passthrough and hop collapsing are
//! presentation concerns, not reachability decisions. Whenever either
//! transformation elides a node from the output, the endpoints on either
//! side lose their direct connecting edge, so the collapser synthesizes a
//! replacement edge between them, carrying the elided hop's axis.

use std::collections::{HashMap, HashSet};

use crate::engine::RawStep;
use crate::model::{Axis, EdgeKey, Node, NodeId, NodeRole, PropertyBag};
use crate::request::{LogicalStep, PathRecord};
use crate::taxonomy::TaxonomyRegistry;

/// An intermediate step after passthrough folding, before X hop-group
/// folding. One or more raw edges bridged together.
struct FoldedStep {
    from: NodeId,
    to: NodeId,
    axis: Axis,
    direction: crate::request::StepDirection,
    hop_group: Option<String>,
    edge_names: Vec<String>,
}

fn is_visible(registry: &TaxonomyRegistry, nodes: &HashMap<NodeId, Node>, id: &NodeId) -> bool {
    nodes
        .get(id)
        .and_then(|n| registry.node_role(&n.node_type))
        .map(|(_, visible)| visible)
        .unwrap_or(true)
}

/// Pass 1: fold out any interior node marked non-visible, bridging the
/// edges on either side of it. Chains of invisible nodes collapse fully.
fn fold_passthrough(
    raw: &[RawStep],
    registry: &TaxonomyRegistry,
    nodes: &HashMap<NodeId, Node>,
) -> Vec<FoldedStep> {
    let mut out: Vec<FoldedStep> = Vec::new();

    for step in raw {
        match out.last_mut() {
            Some(prev) if !is_visible(registry, nodes, &prev.to) => {
                // prev.to was already flagged invisible by the previous
                // iteration; bridge it by extending prev instead of pushing.
                prev.to = step.to.clone();
                prev.edge_names.push(step.edge_name.clone());
                // Mixed axis/hop_group across a passthrough bridge can't be
                // represented faithfully as a single X pairing; keep the
                // axis/hop_group of whichever edge entered the bridge and
                // drop hop_group so it is never mistaken for an X pair.
                prev.hop_group = None;
            }
            _ => {
                out.push(FoldedStep {
                    from: step.from.clone(),
                    to: step.to.clone(),
                    axis: step.axis,
                    direction: step.direction,
                    hop_group: step.hop_group.clone(),
                    edge_names: vec![step.edge_name.clone()],
                });
            }
        }
    }

    out
}

/// Pass 2: fold consecutive X-axis steps sharing a hop_group into one
/// logical step `{from, to, via, edge_names, hop_group}`. An X step with no
/// matching pair (end of path, or an unpaired interior edge from a
/// malformed graph) is emitted as an unclosed step with `to = None`.
fn fold_hop_groups(folded: &[FoldedStep]) -> Vec<LogicalStep> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < folded.len() {
        let cur = &folded[i];
        if cur.axis == Axis::X {
            let pair = folded.get(i + 1).filter(|next| {
                next.axis == Axis::X
                    && next.hop_group.is_some()
                    && next.hop_group == cur.hop_group
                    && next.from == cur.to
            });
            if let Some(next) = pair {
                out.push(LogicalStep {
                    axis: Axis::X,
                    direction: cur.direction,
                    from: cur.from.clone(),
                    to: Some(next.to.clone()),
                    via: Some(cur.to.clone()),
                    edge_names: cur
                        .edge_names
                        .iter()
                        .cloned()
                        .chain(next.edge_names.iter().cloned())
                        .collect(),
                    hop_group: cur.hop_group.clone(),
                });
                i += 2;
                continue;
            }
            // Unpaired X edge: end-of-path half-hop, or an interior edge
            // that didn't find its partner (malformed taxonomy/graph).
            out.push(LogicalStep {
                axis: Axis::X,
                direction: cur.direction,
                from: cur.from.clone(),
                to: None,
                via: Some(cur.to.clone()),
                edge_names: cur.edge_names.clone(),
                hop_group: cur.hop_group.clone(),
            });
            i += 1;
        } else {
            out.push(LogicalStep {
                axis: cur.axis,
                direction: cur.direction,
                from: cur.from.clone(),
                to: Some(cur.to.clone()),
                via: None,
                edge_names: cur.edge_names.clone(),
                hop_group: None,
            });
            i += 1;
        }
    }
    out
}

/// A synthesized edge standing in for raw edges whose shared endpoint got
/// elided from the output, keyed the same way a real edge would be.
type BridgedEdges = HashMap<EdgeKey, (PropertyBag, Axis)>;

fn bridge_key(from: &NodeId, to: &NodeId, edge_names: &[String]) -> EdgeKey {
    EdgeKey {
        source_node: from.clone(),
        edge_name: edge_names.join("+"),
        destination_node: to.clone(),
        sub_type: None,
    }
}

/// Collapse every raw path into its `PathRecord` form, and compute the final
/// visible node id set (passthrough-elided, transformer-filtered per
/// `include_transformers`) plus any bridge edges synthesized to stand in for
/// elided nodes' real edges.
pub fn collapse(
    registry: &TaxonomyRegistry,
    nodes: &HashMap<NodeId, Node>,
    raw_paths: &[Vec<RawStep>],
    include_transformers: bool,
) -> (Vec<PathRecord>, HashSet<NodeId>, BridgedEdges) {
    let mut path_records = Vec::with_capacity(raw_paths.len());
    let mut retained: HashSet<NodeId> = HashSet::new();
    let mut bridged_edges: BridgedEdges = HashMap::new();

    for raw in raw_paths {
        let folded = fold_passthrough(raw, registry, nodes);

        for step in &folded {
            if step.edge_names.len() > 1 {
                bridged_edges
                    .entry(bridge_key(&step.from, &step.to, &step.edge_names))
                    .or_insert_with(|| (PropertyBag::default(), step.axis));
            }
        }

        let logical_steps = fold_hop_groups(&folded);

        for step in &logical_steps {
            retain_if_visible(registry, nodes, &step.from, include_transformers, &mut retained);
            if let Some(to) = &step.to {
                retain_if_visible(registry, nodes, to, include_transformers, &mut retained);
                if step.via.is_some() && !include_transformers {
                    bridged_edges
                        .entry(bridge_key(&step.from, to, &step.edge_names))
                        .or_insert_with(|| (PropertyBag::default(), step.axis));
                }
            }
            if let Some(via) = &step.via {
                if include_transformers {
                    retain_if_visible(registry, nodes, via, include_transformers, &mut retained);
                }
            }
        }

        path_records.push(PathRecord { logical_steps });
    }

    (path_records, retained, bridged_edges)
}

fn retain_if_visible(
    registry: &TaxonomyRegistry,
    nodes: &HashMap<NodeId, Node>,
    id: &NodeId,
    include_transformers: bool,
    retained: &mut HashSet<NodeId>,
) {
    let Some(node) = nodes.get(id) else { return };
    let Some((role, visible)) = registry.node_role(&node.node_type) else {
        return;
    };
    if !visible {
        return;
    }
    if role == NodeRole::Transformer && !include_transformers {
        return;
    }
    retained.insert(id.clone());
}
