//! Single-pass construction of immutable heterogeneous graphs.
//!
//! `GraphBuilder` collects raw nodes, edges, and a feature source, then
//! validates and normalizes everything in one `build` call. Construction
//! failures are fatal to the attempt; there is no partial graph. The result
//! is an immutable [`HeteroGraph`] safe for concurrent reads.

use std::collections::HashMap;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use super::adjacency::AdjacencyIndex;
use super::core::{EdgeRecord, HeteroGraph};
use super::features::{FeatureMatrix, FeatureStore};
use super::types::{TypeId, TypeRegistry};
use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// One node as supplied to the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    /// External node id, unique across the graph.
    pub id: u64,
    /// Type label; `None` takes the configured default node label.
    pub node_type: Option<String>,
    /// Feature vector embedded on the node itself.
    pub features: Option<Vec<f32>>,
}

impl RawNode {
    /// Creates an untyped, featureless node.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            node_type: None,
            features: None,
        }
    }

    /// Sets the type label (builder pattern).
    #[must_use]
    pub fn with_type(mut self, node_type: &str) -> Self {
        self.node_type = Some(node_type.to_string());
        self
    }

    /// Sets the embedded feature vector (builder pattern).
    #[must_use]
    pub fn with_features(mut self, features: Vec<f32>) -> Self {
        self.features = Some(features);
        self
    }
}

/// One edge as supplied to the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEdge {
    /// Source node id (first endpoint on undirected graphs).
    pub source: u64,
    /// Target node id (second endpoint on undirected graphs).
    pub target: u64,
    /// Type label; `None` takes the configured default edge label.
    pub edge_type: Option<String>,
    /// Optional weight; `None` means the edge carries no weight attribute.
    pub weight: Option<f64>,
}

impl RawEdge {
    /// Creates an untyped, unweighted edge.
    #[must_use]
    pub fn new(source: u64, target: u64) -> Self {
        Self {
            source,
            target,
            edge_type: None,
            weight: None,
        }
    }

    /// Sets the type label (builder pattern).
    #[must_use]
    pub fn with_type(mut self, edge_type: &str) -> Self {
        self.edge_type = Some(edge_type.to_string());
        self
    }

    /// Sets the weight (builder pattern).
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Where node features come from.
///
/// All variants normalize to the same internal state; they differ only in
/// how the caller hands the vectors over.
#[derive(Debug, Clone, Default)]
pub enum FeatureSource {
    /// Features read from each [`RawNode::features`] field.
    #[default]
    Embedded,
    /// One table per node type: type label to `(id, vector)` rows.
    PerType(HashMap<String, Vec<(u64, Vec<f32>)>>),
    /// A single `(id, vector)` table spanning types; each row's type is
    /// taken from the node's own label.
    Flat(Vec<(u64, Vec<f32>)>),
}

/// Builder for [`HeteroGraph`].
///
/// # Example
///
/// ```
/// use hetgraph_core::graph::{GraphBuilder, RawEdge, RawNode};
///
/// let graph = GraphBuilder::new()
///     .add_node(RawNode::new(0).with_type("user"))
///     .add_node(RawNode::new(1).with_type("movie"))
///     .add_edge(RawEdge::new(0, 1).with_type("rating").with_weight(4.5))
///     .build()
///     .expect("valid graph");
/// assert_eq!(graph.node_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: EngineConfig,
    directed: bool,
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
    features: FeatureSource,
    expected_widths: HashMap<String, usize>,
}

impl GraphBuilder {
    /// Creates a builder for an undirected graph with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets graph directedness (builder pattern). Undirected by default.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Sets the feature source (builder pattern).
    #[must_use]
    pub fn with_features(mut self, features: FeatureSource) -> Self {
        self.features = features;
        self
    }

    /// Declares the feature width of a node type up front.
    ///
    /// Types that end up with no feature rows keep this width instead of
    /// zero; types with rows must match it.
    #[must_use]
    pub fn with_expected_width(mut self, node_type: &str, width: usize) -> Self {
        self.expected_widths.insert(node_type.to_string(), width);
        self
    }

    /// Adds one node.
    #[must_use]
    pub fn add_node(mut self, node: RawNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds many nodes.
    #[must_use]
    pub fn add_nodes(mut self, nodes: impl IntoIterator<Item = RawNode>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Adds one edge.
    #[must_use]
    pub fn add_edge(mut self, edge: RawEdge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Adds many edges.
    #[must_use]
    pub fn add_edges(mut self, edges: impl IntoIterator<Item = RawEdge>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Validates and builds the immutable graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] for duplicate node ids, empty type
    /// labels, edges with endpoints outside the node set, feature rows for
    /// unknown ids or wrong types, exceeded limits, and conflicting feature
    /// sources; [`Error::FeatureWidthMismatch`] when rows of one type
    /// disagree on width; [`Error::Config`] when the configuration is
    /// invalid.
    pub fn build(self) -> Result<HeteroGraph> {
        self.config.validate()?;

        let mut registry = TypeRegistry::new();
        let mut node_types: FxHashMap<u64, TypeId> = FxHashMap::default();
        let mut node_order: Vec<u64> = Vec::with_capacity(self.nodes.len());
        let mut adjacency = AdjacencyIndex::new(self.directed);
        let mut defaulted_nodes = 0usize;

        for node in &self.nodes {
            let label = match &node.node_type {
                Some(label) if label.is_empty() => {
                    return Err(Error::Construction(format!(
                        "node {} has an empty type label",
                        node.id
                    )));
                }
                Some(label) => label.as_str(),
                None => {
                    defaulted_nodes += 1;
                    self.config.labels.default_node_type.as_str()
                }
            };
            let type_id = registry.intern_node_type(label);
            if node_types.insert(node.id, type_id).is_some() {
                return Err(Error::Construction(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
            node_order.push(node.id);
            adjacency.add_node(node.id);
        }
        if registry.node_type_count() > self.config.limits.max_node_types {
            return Err(Error::Construction(format!(
                "node type count {} exceeds limit {}",
                registry.node_type_count(),
                self.config.limits.max_node_types
            )));
        }

        let mut edge_records: Vec<EdgeRecord> = Vec::with_capacity(self.edges.len());
        let mut defaulted_edges = 0usize;
        for edge in &self.edges {
            for endpoint in [edge.source, edge.target] {
                if !node_types.contains_key(&endpoint) {
                    return Err(Error::Construction(format!(
                        "edge ({}, {}) references unknown node {endpoint}",
                        edge.source, edge.target
                    )));
                }
            }
            let label = match &edge.edge_type {
                Some(label) if label.is_empty() => {
                    return Err(Error::Construction(format!(
                        "edge ({}, {}) has an empty type label",
                        edge.source, edge.target
                    )));
                }
                Some(label) => label.as_str(),
                None => {
                    defaulted_edges += 1;
                    self.config.labels.default_edge_type.as_str()
                }
            };
            let type_id = registry.intern_edge_type(label);
            adjacency.add_edge(edge.source, edge.target, type_id, edge.weight);
            edge_records.push(EdgeRecord {
                source: edge.source,
                target: edge.target,
                edge_type: type_id,
                weight: edge.weight,
            });
        }
        if registry.edge_type_count() > self.config.limits.max_edge_types {
            return Err(Error::Construction(format!(
                "edge type count {} exceeds limit {}",
                registry.edge_type_count(),
                self.config.limits.max_edge_types
            )));
        }

        let features = self.build_features(&registry, &node_types, &node_order)?;

        if defaulted_nodes > 0 || defaulted_edges > 0 {
            warn!(
                defaulted_nodes,
                defaulted_edges, "untyped elements assigned default labels"
            );
        }
        info!(
            nodes = node_order.len(),
            edges = edge_records.len(),
            node_types = registry.node_type_count(),
            edge_types = registry.edge_type_count(),
            directed = self.directed,
            "graph built"
        );

        Ok(HeteroGraph::from_parts(
            self.directed,
            registry,
            node_order,
            node_types,
            edge_records,
            features,
            adjacency,
        ))
    }

    /// Collects feature rows per type and builds the matrices, one type at
    /// a time in parallel.
    fn build_features(
        &self,
        registry: &TypeRegistry,
        node_types: &FxHashMap<u64, TypeId>,
        node_order: &[u64],
    ) -> Result<FeatureStore> {
        let rows_by_id = self.collect_feature_rows(registry, node_types)?;

        // Partition rows per type, keeping node insertion order as row order.
        let mut per_type: FxHashMap<TypeId, Vec<(u64, &Vec<f32>)>> = FxHashMap::default();
        for id in node_order {
            if let Some(vector) = rows_by_id.get(id) {
                per_type
                    .entry(node_types[id])
                    .or_default()
                    .push((*id, vector));
            }
        }

        let built: Vec<(TypeId, FeatureMatrix, Vec<u64>)> = registry
            .node_type_ids()
            .into_par_iter()
            .map(|(type_id, label)| {
                let rows = per_type.get(&type_id).map_or(&[][..], Vec::as_slice);
                let matrix = self.build_type_matrix(label, rows)?;
                let ids = rows.iter().map(|(id, _)| *id).collect();
                Ok((type_id, matrix, ids))
            })
            .collect::<Result<_>>()?;

        let mut store = FeatureStore::new();
        for (type_id, matrix, ids) in built {
            store.insert_type(type_id, matrix, ids);
        }
        Ok(store)
    }

    /// Normalizes the feature source into one `(id, vector)` map, checking
    /// ids and claimed types.
    fn collect_feature_rows(
        &self,
        registry: &TypeRegistry,
        node_types: &FxHashMap<u64, TypeId>,
    ) -> Result<FxHashMap<u64, Vec<f32>>> {
        let mut rows: FxHashMap<u64, Vec<f32>> = FxHashMap::default();
        let embedded = self.nodes.iter().any(|n| n.features.is_some());

        match &self.features {
            FeatureSource::Embedded => {
                for node in &self.nodes {
                    if let Some(vector) = &node.features {
                        rows.insert(node.id, vector.clone());
                    }
                }
            }
            FeatureSource::PerType(tables) => {
                if embedded {
                    return Err(Error::Construction(
                        "nodes carry embedded features but a per-type table was supplied"
                            .to_string(),
                    ));
                }
                for (label, table) in tables {
                    let claimed = registry.node_type_id(label).ok_or_else(|| {
                        Error::Construction(format!(
                            "feature table references unknown node type '{label}'"
                        ))
                    })?;
                    for (id, vector) in table {
                        let actual = *node_types
                            .get(id)
                            .ok_or_else(|| feature_for_unknown_node(*id))?;
                        if actual != claimed {
                            return Err(Error::Construction(format!(
                                "feature row for node {id} claims type '{label}' but the \
                                 node has type '{}'",
                                registry.node_type_label(actual).unwrap_or_default()
                            )));
                        }
                        rows.insert(*id, vector.clone());
                    }
                }
            }
            FeatureSource::Flat(table) => {
                if embedded {
                    return Err(Error::Construction(
                        "nodes carry embedded features but a flat table was supplied".to_string(),
                    ));
                }
                for (id, vector) in table {
                    if !node_types.contains_key(id) {
                        return Err(feature_for_unknown_node(*id));
                    }
                    rows.insert(*id, vector.clone());
                }
            }
        }
        Ok(rows)
    }

    /// Builds one type's matrix, enforcing a single width across its rows.
    fn build_type_matrix(&self, label: &str, rows: &[(u64, &Vec<f32>)]) -> Result<FeatureMatrix> {
        let expected = self.expected_widths.get(label).copied();
        let width = match (expected, rows.first()) {
            (Some(width), _) => width,
            (None, Some((_, first))) => first.len(),
            (None, None) => 0,
        };
        if width > self.config.limits.max_feature_width {
            return Err(Error::Construction(format!(
                "feature width {width} for node type '{label}' exceeds limit {}",
                self.config.limits.max_feature_width
            )));
        }

        let mut matrix = FeatureMatrix::with_capacity(width, rows.len());
        for (_, vector) in rows {
            if vector.len() != width {
                return Err(Error::FeatureWidthMismatch {
                    node_type: label.to_string(),
                    expected: width,
                    actual: vector.len(),
                });
            }
            matrix.push_row(vector);
        }
        Ok(matrix)
    }
}

fn feature_for_unknown_node(id: u64) -> Error {
    Error::Construction(format!("feature row references unknown node {id}"))
}
