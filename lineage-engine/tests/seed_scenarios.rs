//! Integration tests against the fraud-detection seed graph fixtures,
//! covering the named scenarios and boundary behaviors.

use lineage_engine::adapter::InMemoryAdjacencyStore;
use lineage_engine::engine::CancellationToken;
use lineage_engine::model::Axis;
use lineage_engine::request::{TraversalRequest, XDirection, YDirection};
use lineage_engine::taxonomy::TaxonomyRegistry;
use lineage_engine::{run_traversal, TraversalResponse};

const TAXONOMY_YAML: &str = include_str!("../../fixtures/taxonomy.yaml");
const SEED_YAML: &str = include_str!("../../fixtures/fraud_detection.yaml");

fn fixture() -> (TaxonomyRegistry, InMemoryAdjacencyStore) {
    let registry = TaxonomyRegistry::from_yaml_str(TAXONOMY_YAML).unwrap();
    let adapter = InMemoryAdjacencyStore::from_yaml_str(SEED_YAML).unwrap();
    (registry, adapter)
}

fn run(request: &TraversalRequest) -> TraversalResponse {
    let (registry, adapter) = fixture();
    run_traversal(&registry, &adapter, request, &CancellationToken::new()).unwrap()
}

fn base_request(start: &str, axes: Vec<Axis>) -> TraversalRequest {
    TraversalRequest {
        start_node_id: start.to_string(),
        axes,
        x_direction: XDirection::Both,
        y_direction: YDirection::Both,
        max_z_hops: 1,
        max_depth: None,
        include_transformers: true,
    }
}

#[test]
fn x_upstream_from_curated_transactions() {
    let mut req = base_request("ds-002", vec![Axis::X]);
    req.x_direction = XDirection::Upstream;
    let resp = run(&req);

    assert_eq!(resp.paths.len(), 1);
    let step = &resp.paths[0].logical_steps[0];
    assert_eq!(step.from, "ds-002");
    assert_eq!(step.to.as_deref(), Some("ds-001"));
    assert_eq!(step.via.as_deref(), Some("job-001"));
    assert_eq!(step.hop_group.as_deref(), Some("dataset_etl"));
}

#[test]
fn x_downstream_from_curated_transactions_chains_through_model_and_predictions() {
    let mut req = base_request("ds-002", vec![Axis::X]);
    req.x_direction = XDirection::Downstream;
    let resp = run(&req);

    let reached: Vec<&str> = resp.nodes.iter().map(|n| n.id.as_str()).collect();
    assert!(reached.contains(&"ds-003"));
    assert!(reached.contains(&"mv-002"));
    assert!(reached.contains(&"ds-004"));

    // ds-002 -> ds-003 -> mv-002 -> ds-004, each a collapsed X logical step.
    let longest = resp
        .paths
        .iter()
        .max_by_key(|p| p.logical_steps.len())
        .unwrap();
    assert_eq!(longest.logical_steps.len(), 3);
    assert_eq!(longest.logical_steps[0].to.as_deref(), Some("ds-003"));
    assert_eq!(longest.logical_steps[1].to.as_deref(), Some("mv-002"));
    assert_eq!(longest.logical_steps[2].to.as_deref(), Some("ds-004"));
}

#[test]
fn y_hierarchy_from_fraud_review_system() {
    let mut req = base_request("asys-001", vec![Axis::Y]);
    req.y_direction = YDirection::Down;
    let resp = run(&req);

    let longest = resp
        .paths
        .iter()
        .max_by_key(|p| p.logical_steps.len())
        .unwrap();
    assert_eq!(longest.logical_steps.len(), 2);
    assert_eq!(longest.logical_steps[0].from, "asys-001");
    assert_eq!(longest.logical_steps[0].to.as_deref(), Some("asysv-001"));
    assert_eq!(longest.logical_steps[1].to.as_deref(), Some("agv-001"));
}

#[test]
fn z_cap_from_curated_transactions_reaches_only_direct_associations() {
    let mut req = base_request("ds-002", vec![Axis::Z]);
    req.max_z_hops = 1;
    let resp = run(&req);

    let reached: Vec<&str> = resp.nodes.iter().map(|n| n.id.as_str()).collect();
    assert!(reached.contains(&"uc-001"));
    assert!(reached.contains(&"ws-001"));
    assert!(reached.contains(&"rs-001"));
    // uc-001 -> ws-001 would be a second Z hop; must not be reachable.
    for path in &resp.paths {
        assert!(path.logical_steps.len() <= 1);
    }
}

#[test]
fn xz_second_z_hop_is_blocked() {
    let mut req = base_request("ds-002", vec![Axis::X, Axis::Z]);
    req.max_z_hops = 1;
    let resp = run(&req);

    assert!(resp.traversal_metadata.blocked_z_of_z_paths >= 1);
    for path in &resp.paths {
        let z_steps = path
            .logical_steps
            .iter()
            .filter(|s| s.axis == Axis::Z)
            .count();
        assert!(z_steps <= 1);
    }
}

#[test]
fn collapsing_hides_transformers_but_keeps_via() {
    let mut req = base_request("ds-001", vec![Axis::X]);
    req.x_direction = XDirection::Downstream;
    req.include_transformers = false;
    let resp = run(&req);

    assert!(resp.nodes.iter().all(|n| n.node_type != "etl_job"));
    assert!(resp
        .paths
        .iter()
        .flat_map(|p| &p.logical_steps)
        .any(|s| s.via.as_deref() == Some("job-001")));

    // job-001 is dropped from `nodes`, but the collapser still reports a
    // direct edge bridging its neighbors so `edges` stays contiguous with
    // the reported path.
    assert!(resp
        .edges
        .iter()
        .any(|e| e.key.source_node == "ds-001" && e.key.destination_node == "ds-002"));
}

#[test]
fn max_depth_zero_returns_only_start_node() {
    let mut req = base_request("ds-002", vec![Axis::X, Axis::Y, Axis::Z]);
    req.max_depth = Some(0);
    let resp = run(&req);

    assert_eq!(resp.nodes.len(), 1);
    assert_eq!(resp.nodes[0].id, "ds-002");
    assert!(resp.edges.is_empty());
    assert!(resp.paths.is_empty());
}

#[test]
fn max_z_hops_zero_blocks_all_z_edges() {
    let mut req = base_request("ds-002", vec![Axis::Z]);
    req.max_z_hops = 0;
    let resp = run(&req);

    assert_eq!(resp.nodes.len(), 1);
    assert!(resp.paths.is_empty());
}

#[test]
fn axis_isolation_x_only_has_no_y_or_z_steps() {
    let mut req = base_request("ds-002", vec![Axis::X]);
    req.x_direction = XDirection::Both;
    let resp = run(&req);

    for path in &resp.paths {
        for step in &path.logical_steps {
            assert_eq!(step.axis, Axis::X);
        }
    }
}

#[test]
fn repeated_requests_are_idempotent() {
    let req = base_request("ds-002", vec![Axis::X, Axis::Y, Axis::Z]);
    let first = run(&req);
    let second = run(&req);

    let mut first_ids: Vec<&str> = first.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut second_ids: Vec<&str> = second.nodes.iter().map(|n| n.id.as_str()).collect();
    first_ids.sort();
    second_ids.sort();
    assert_eq!(first_ids, second_ids);
    assert_eq!(first.edges.len(), second.edges.len());
}

#[test]
fn start_not_found_is_reported() {
    let (registry, adapter) = fixture();
    let req = base_request("nonexistent-node", vec![Axis::X]);
    let err = run_traversal(&registry, &adapter, &req, &CancellationToken::new()).unwrap_err();
    assert_eq!(err.code(), "START_NOT_FOUND");
}

#[test]
fn max_z_hops_above_system_cap_is_invalid() {
    let (registry, adapter) = fixture();
    let mut req = base_request("ds-002", vec![Axis::Z]);
    req.max_z_hops = 100;
    let err = run_traversal(&registry, &adapter, &req, &CancellationToken::new()).unwrap_err();
    assert_eq!(err.code(), "INVALID_REQUEST");
}
