//! The immutable built graph and its query surface.
//!
//! `HeteroGraph` owns the type registry, the feature store, the adjacency
//! index, and the original edge list. It is produced by
//! [`GraphBuilder`](super::builder::GraphBuilder) in one pass and never
//! mutated afterwards, so queries are safe for unsynchronized concurrent
//! reads from any number of sampling workers.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use super::adjacency::{AdjacencyIndex, Direction};
use super::export::GenericGraph;
use super::features::{FeatureMatrix, FeatureStore};
use super::schema::{derive_schema, GraphSchema};
use super::types::{TypeId, TypeRegistry};
use crate::error::{Error, Result};

/// One edge of a built graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    /// Source node id (first endpoint on undirected graphs).
    pub source: u64,
    /// Target node id (second endpoint on undirected graphs).
    pub target: u64,
    /// Interned edge type.
    pub edge_type: TypeId,
    /// Optional weight; `None` means no weight attribute.
    pub weight: Option<f64>,
}

/// An immutable heterogeneous multigraph.
///
/// Nodes and edges carry interned type labels; nodes may carry dense `f32`
/// feature vectors grouped per type. Parallel edges and self-loops are
/// allowed. All queries are reads; the only O(graph) read is
/// [`schema`](Self::schema) without a subset, which callers should treat as
/// a batch job and cache if needed.
#[derive(Debug)]
pub struct HeteroGraph {
    directed: bool,
    registry: TypeRegistry,
    /// Node ids in insertion order.
    nodes: Vec<u64>,
    node_types: FxHashMap<u64, TypeId>,
    edges: Vec<EdgeRecord>,
    features: FeatureStore,
    adjacency: AdjacencyIndex,
}

impl HeteroGraph {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        directed: bool,
        registry: TypeRegistry,
        nodes: Vec<u64>,
        node_types: FxHashMap<u64, TypeId>,
        edges: Vec<EdgeRecord>,
        features: FeatureStore,
        adjacency: AdjacencyIndex,
    ) -> Self {
        Self {
            directed,
            registry,
            nodes,
            node_types,
            edges,
            features,
            adjacency,
        }
    }

    /// Returns true for directed graphs.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, parallel edges counted individually.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node ids in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[u64] {
        &self.nodes
    }

    /// Returns true if `id` is a node of the graph.
    #[must_use]
    pub fn contains_node(&self, id: u64) -> bool {
        self.node_types.contains_key(&id)
    }

    /// Edge records in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Edges as `(source, target, type label)` triples, insertion order.
    #[must_use]
    pub fn edge_triples(&self) -> Vec<(u64, u64, &str)> {
        self.edges
            .iter()
            .map(|e| {
                (
                    e.source,
                    e.target,
                    self.registry.edge_type_label(e.edge_type).unwrap_or_default(),
                )
            })
            .collect()
    }

    /// The type registry of the graph.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The adjacency index of the graph.
    #[must_use]
    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Returns the type label of a node.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn node_type_of(&self, id: u64) -> Result<&str> {
        let type_id = self.node_types.get(&id).ok_or(Error::NodeNotFound(id))?;
        Ok(self.registry.node_type_label(*type_id).unwrap_or_default())
    }

    /// Node type labels in registration order.
    #[must_use]
    pub fn node_types(&self) -> Vec<&str> {
        self.registry.node_types()
    }

    /// Edge type labels in registration order.
    #[must_use]
    pub fn edge_types(&self) -> Vec<&str> {
        self.registry.edge_types()
    }

    /// Batch feature lookup; see
    /// [`FeatureStore::lookup`](super::features::FeatureStore::lookup) for
    /// the inference and zero-fill rules.
    ///
    /// # Errors
    ///
    /// Propagates the lookup's type-resolution and not-found errors.
    pub fn node_features(
        &self,
        ids: &[Option<u64>],
        node_type: Option<&str>,
    ) -> Result<FeatureMatrix> {
        self.features
            .lookup(&self.registry, &self.node_types, ids, node_type)
    }

    /// Returns `(type label, feature width)` for every node type.
    #[must_use]
    pub fn feature_sizes(&self) -> Vec<(&str, usize)> {
        self.features.feature_sizes(&self.registry)
    }

    /// Returns the stored feature row of a node, `None` if it never
    /// supplied one.
    #[must_use]
    pub fn stored_features_of(&self, id: u64) -> Option<&[f32]> {
        self.features.stored_row(id)
    }

    /// Returns matching neighbor ids, one per edge.
    ///
    /// `edge_types` filters by type label; labels absent from the graph
    /// simply match nothing.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn neighbors(
        &self,
        id: u64,
        direction: Direction,
        edge_types: Option<&[&str]>,
    ) -> Result<Vec<u64>> {
        let filter = self.edge_type_filter(edge_types);
        self.adjacency.neighbors(id, direction, filter.as_deref())
    }

    /// Returns matching `(neighbor id, weight)` pairs, one per edge.
    ///
    /// The weight is `None` for edges without a weight attribute.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn neighbors_with_weights(
        &self,
        id: u64,
        direction: Direction,
        edge_types: Option<&[&str]>,
    ) -> Result<Vec<(u64, Option<f64>)>> {
        let filter = self.edge_type_filter(edge_types);
        self.adjacency
            .neighbors_with_weights(id, direction, filter.as_deref())
    }

    /// Neighbors reached by in-edges (same as out on undirected graphs).
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn in_nodes(&self, id: u64, edge_types: Option<&[&str]>) -> Result<Vec<u64>> {
        self.neighbors(id, Direction::In, edge_types)
    }

    /// Neighbors reached by out-edges (same as in on undirected graphs).
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn out_nodes(&self, id: u64, edge_types: Option<&[&str]>) -> Result<Vec<u64>> {
        self.neighbors(id, Direction::Out, edge_types)
    }

    /// Derives the compatibility schema from out-edges.
    ///
    /// With `subset` given only those nodes are scanned, producing a cheap
    /// approximate schema; the full scan visits every node once. Results
    /// are not cached.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when `subset` contains unknown ids.
    pub fn schema(&self, subset: Option<&[u64]>) -> Result<GraphSchema> {
        derive_schema(
            &self.registry,
            &self.node_types,
            &self.adjacency,
            &self.nodes,
            subset,
        )
    }

    /// Exports the graph as a generic attributed multigraph.
    #[must_use]
    pub fn to_generic(&self) -> GenericGraph {
        GenericGraph::from_graph(self)
    }

    /// Human-readable summary: counts per node and edge type plus feature
    /// widths.
    #[must_use]
    pub fn info(&self) -> String {
        let kind = if self.directed {
            "directed"
        } else {
            "undirected"
        };
        let mut out = format!(
            "HetGraph: {kind} multigraph\n Nodes: {}, Edges: {}\n",
            self.node_count(),
            self.edge_count()
        );

        let mut node_counts: FxHashMap<TypeId, usize> = FxHashMap::default();
        for type_id in self.node_types.values() {
            *node_counts.entry(*type_id).or_default() += 1;
        }
        let _ = writeln!(out, " Node types:");
        for (type_id, label) in self.registry.node_type_ids() {
            let count = node_counts.get(&type_id).copied().unwrap_or(0);
            let width = self.features.width_of(type_id).unwrap_or(0);
            let _ = writeln!(out, "  {label}: [{count}] features: {width}");
        }

        let mut edge_counts: FxHashMap<TypeId, usize> = FxHashMap::default();
        for edge in &self.edges {
            *edge_counts.entry(edge.edge_type).or_default() += 1;
        }
        let _ = writeln!(out, " Edge types:");
        for (type_id, label) in self.registry.edge_type_ids() {
            let count = edge_counts.get(&type_id).copied().unwrap_or(0);
            let _ = writeln!(out, "  {label}: [{count}]");
        }
        out
    }

    /// Translates label filters to interned ids; unknown labels drop out.
    fn edge_type_filter(&self, edge_types: Option<&[&str]>) -> Option<Vec<TypeId>> {
        edge_types.map(|labels| {
            labels
                .iter()
                .filter_map(|label| self.registry.edge_type_id(label))
                .collect()
        })
    }
}
