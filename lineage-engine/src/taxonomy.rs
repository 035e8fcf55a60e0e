//! Taxonomy Registry — deterministic edge classification, indexed for O(1)
//! lookup by `(edge_name, source_type, destination_type[, sub_type])`.
//!
//! Pure and process-scoped: built once from a declarative document, then
//! read-only and shared (cheaply `Clone`, typically wrapped in an `Arc` by
//! callers) across every traversal request. No database coupling, which
//! keeps it unit-testable in isolation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TaxonomyError;
use crate::model::{Axis, EdgeClassification, NodeRole, NodeTypeDecl, RoleInHop, SemanticUp};

/// One edge-classification rule as it appears in the declarative document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRuleDecl {
    pub edge_name: String,
    pub source_type: String,
    pub destination_type: String,
    #[serde(default)]
    pub sub_type: Option<String>,
    pub axis: Axis,
    #[serde(default)]
    pub role_in_hop: Option<RoleInHop>,
    #[serde(default)]
    pub hop_group: Option<String>,
    #[serde(default)]
    pub semantic_up: Option<SemanticUp>,
}

/// The raw taxonomy configuration: node-type table plus edge rules, as
/// loaded from YAML (see `TaxonomyRegistry::from_yaml_str`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    pub node_types: HashMap<String, NodeTypeDecl>,
    pub edge_rules: Vec<EdgeRuleDecl>,
}

/// A triple key plus the two-level index used to resolve sub_type
/// specificity: a rule without `sub_type` matches any sub_type; a rule with
/// `sub_type` matches only that value; when both exist, the specific one
/// wins.
#[derive(Default, Debug, Clone)]
struct RuleGroup {
    wildcard: Option<EdgeClassification>,
    by_sub_type: HashMap<String, EdgeClassification>,
}

/// Compiled, indexed taxonomy. Construction validates the whole document;
/// a successfully constructed registry can never return an internally
/// inconsistent classification.
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    node_types: HashMap<String, NodeTypeDecl>,
    // edge_name -> (source_type, destination_type) -> rule group
    edge_index: HashMap<String, HashMap<(String, String), RuleGroup>>,
}

impl TaxonomyRegistry {
    /// Parse and compile a YAML taxonomy document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TaxonomyError> {
        let doc: TaxonomyDocument =
            serde_yaml::from_str(yaml).map_err(|e| TaxonomyError::Parse(e.to_string()))?;
        Self::compile(doc)
    }

    /// Compile an already-parsed document. Exposed separately so tests and
    /// the orchestrator-style loader can build a `TaxonomyDocument`
    /// programmatically without round-tripping through YAML.
    pub fn compile(doc: TaxonomyDocument) -> Result<Self, TaxonomyError> {
        let mut edge_index: HashMap<String, HashMap<(String, String), RuleGroup>> = HashMap::new();
        let mut hop_group_rule_count: HashMap<String, usize> = HashMap::new();

        for rule in &doc.edge_rules {
            if !doc.node_types.contains_key(&rule.source_type) {
                return Err(TaxonomyError::UnknownNodeType {
                    edge_name: rule.edge_name.clone(),
                    node_type: rule.source_type.clone(),
                });
            }
            if !doc.node_types.contains_key(&rule.destination_type) {
                return Err(TaxonomyError::UnknownNodeType {
                    edge_name: rule.edge_name.clone(),
                    node_type: rule.destination_type.clone(),
                });
            }

            let classification = match rule.axis {
                Axis::X => {
                    let hop_group = rule.hop_group.clone().ok_or_else(|| {
                        TaxonomyError::IncompleteXRule {
                            edge_name: rule.edge_name.clone(),
                        }
                    })?;
                    if rule.role_in_hop.is_none() {
                        return Err(TaxonomyError::IncompleteXRule {
                            edge_name: rule.edge_name.clone(),
                        });
                    }
                    *hop_group_rule_count.entry(hop_group.clone()).or_insert(0) += 1;
                    EdgeClassification {
                        axis: Axis::X,
                        role_in_hop: rule.role_in_hop,
                        hop_group: Some(hop_group),
                        semantic_up: None,
                    }
                }
                Axis::Y => {
                    let semantic_up = rule.semantic_up.ok_or_else(|| TaxonomyError::IncompleteYRule {
                        edge_name: rule.edge_name.clone(),
                    })?;
                    EdgeClassification {
                        axis: Axis::Y,
                        role_in_hop: None,
                        hop_group: None,
                        semantic_up: Some(semantic_up),
                    }
                }
                Axis::Z => EdgeClassification {
                    axis: Axis::Z,
                    role_in_hop: None,
                    hop_group: None,
                    semantic_up: None,
                },
            };

            let group = edge_index
                .entry(rule.edge_name.clone())
                .or_default()
                .entry((rule.source_type.clone(), rule.destination_type.clone()))
                .or_default();

            match &rule.sub_type {
                Some(sub_type) => {
                    if group.by_sub_type.contains_key(sub_type) {
                        return Err(TaxonomyError::DuplicateRule {
                            edge_name: rule.edge_name.clone(),
                            source_type: rule.source_type.clone(),
                            destination_type: rule.destination_type.clone(),
                            sub_type: Some(sub_type.clone()),
                        });
                    }
                    group.by_sub_type.insert(sub_type.clone(), classification);
                }
                None => {
                    if group.wildcard.is_some() {
                        return Err(TaxonomyError::DuplicateRule {
                            edge_name: rule.edge_name.clone(),
                            source_type: rule.source_type.clone(),
                            destination_type: rule.destination_type.clone(),
                            sub_type: None,
                        });
                    }
                    group.wildcard = Some(classification);
                }
            }
        }

        for (hop_group, count) in &hop_group_rule_count {
            if *count < 2 {
                return Err(TaxonomyError::OrphanedHopGroup(hop_group.clone()));
            }
        }

        Ok(TaxonomyRegistry {
            node_types: doc.node_types,
            edge_index,
        })
    }

    /// Classify one `(edge_name, source_type, destination_type, sub_type?)`
    /// tuple. Returns `None` when no rule matches — the graph may legitimately
    /// contain edges outside the taxonomy; the caller (the engine) treats
    /// that as "unknown edge, skip", never as an error.
    pub fn classify(
        &self,
        edge_name: &str,
        source_type: &str,
        destination_type: &str,
        sub_type: Option<&str>,
    ) -> Option<EdgeClassification> {
        let group = self
            .edge_index
            .get(edge_name)?
            .get(&(source_type.to_string(), destination_type.to_string()))?;

        if let Some(sub_type) = sub_type {
            if let Some(c) = group.by_sub_type.get(sub_type) {
                return Some(c.clone());
            }
        }
        group.wildcard.clone()
    }

    /// Role and visibility for a node type. Unknown types are a
    /// configuration error at the request boundary — callers raise, they
    /// don't skip.
    pub fn node_role(&self, node_type: &str) -> Option<(NodeRole, bool)> {
        self.node_types
            .get(node_type)
            .map(|decl| (decl.role, decl.visible))
    }

    /// Convenience used by the Hop Collapser: the hop_group id for an
    /// X-axis rule, if any rule matches.
    pub fn hop_group(
        &self,
        edge_name: &str,
        source_type: &str,
        destination_type: &str,
        sub_type: Option<&str>,
    ) -> Option<String> {
        self.classify(edge_name, source_type, destination_type, sub_type)
            .and_then(|c| c.hop_group)
    }

    pub fn is_known_node_type(&self, node_type: &str) -> bool {
        self.node_types.contains_key(node_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
node_types:
  dataset:
    role: resource
    visible: true
  etl_job:
    role: transformer
    visible: true
  system:
    role: container
    visible: true
  system_version:
    role: structural
    visible: false

edge_rules:
  - edge_name: consumes
    source_type: dataset
    destination_type: etl_job
    axis: X
    role_in_hop: input_to_transformer
    hop_group: dataset_etl
  - edge_name: produces
    source_type: etl_job
    destination_type: dataset
    axis: X
    role_in_hop: output_from_transformer
    hop_group: dataset_etl
  - edge_name: contains
    source_type: system
    destination_type: system_version
    axis: Y
    semantic_up: reverse
  - edge_name: uses
    source_type: dataset
    destination_type: dataset
    sub_type: peer_review
    axis: Z
  - edge_name: uses
    source_type: dataset
    destination_type: dataset
    axis: Z
"#
    }

    #[test]
    fn compiles_valid_document() {
        let registry = TaxonomyRegistry::from_yaml_str(sample_yaml()).unwrap();
        assert_eq!(
            registry.node_role("dataset"),
            Some((NodeRole::Resource, true))
        );
        assert_eq!(
            registry.node_role("system_version"),
            Some((NodeRole::Structural, false))
        );
    }

    #[test]
    fn classifies_x_edge() {
        let registry = TaxonomyRegistry::from_yaml_str(sample_yaml()).unwrap();
        let c = registry
            .classify("consumes", "dataset", "etl_job", None)
            .unwrap();
        assert_eq!(c.axis, Axis::X);
        assert_eq!(c.hop_group.as_deref(), Some("dataset_etl"));
        assert_eq!(c.role_in_hop, Some(RoleInHop::InputToTransformer));
    }

    #[test]
    fn sub_type_specific_rule_wins_over_wildcard() {
        let registry = TaxonomyRegistry::from_yaml_str(sample_yaml()).unwrap();
        let specific = registry
            .classify("uses", "dataset", "dataset", Some("peer_review"))
            .unwrap();
        assert_eq!(specific.axis, Axis::Z);
        let wildcard = registry
            .classify("uses", "dataset", "dataset", Some("something_else"))
            .unwrap();
        assert_eq!(wildcard.axis, Axis::Z);
    }

    #[test]
    fn unknown_edge_returns_none_not_error() {
        let registry = TaxonomyRegistry::from_yaml_str(sample_yaml()).unwrap();
        assert!(registry
            .classify("unheard_of", "dataset", "etl_job", None)
            .is_none());
    }

    #[test]
    fn rejects_unknown_node_type() {
        let yaml = r#"
node_types:
  dataset:
    role: resource
edge_rules:
  - edge_name: consumes
    source_type: dataset
    destination_type: nonexistent
    axis: X
    role_in_hop: input_to_transformer
    hop_group: g1
  - edge_name: produces
    source_type: nonexistent
    destination_type: dataset
    axis: X
    role_in_hop: output_from_transformer
    hop_group: g1
"#;
        let err = TaxonomyRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, TaxonomyError::UnknownNodeType { .. }));
    }

    #[test]
    fn rejects_orphaned_hop_group() {
        let yaml = r#"
node_types:
  dataset:
    role: resource
  etl_job:
    role: transformer
edge_rules:
  - edge_name: consumes
    source_type: dataset
    destination_type: etl_job
    axis: X
    role_in_hop: input_to_transformer
    hop_group: lonely
"#;
        let err = TaxonomyRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, TaxonomyError::OrphanedHopGroup(_)));
    }
}
