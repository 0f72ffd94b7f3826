//! Derived graph schema for heterogeneous graphs.
//!
//! The schema is computed from a built graph, never declared up front: for
//! every node type it records the ordered set of `(edge type, neighbor node
//! type)` pairs observed on edges leaving that type. It is a summary of what
//! the data contains, suitable for driving typed sampling walks.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::adjacency::{AdjacencyIndex, Direction};
use super::types::{TypeId, TypeRegistry};
use crate::error::{Error, Result};

/// One outgoing connection kind of a node type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaEdge {
    /// Edge type label.
    pub edge_type: String,
    /// Node type label of the neighbor.
    pub neighbor_type: String,
}

/// Node-type to connection-kind summary of a built graph.
///
/// Every node type present in the graph has an entry, even when no edge
/// leaves it; such entries are present and empty, which distinguishes "type
/// with no out-edges" from "unknown type". On undirected graphs each edge
/// contributes a pair in both directions, so the schema is symmetric.
///
/// Iteration order is deterministic: node types in registration order, pairs
/// in first-observation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSchema {
    entries: IndexMap<String, IndexSet<SchemaEdge>>,
}

impl GraphSchema {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Ensures a node type has an entry, empty if new.
    pub(crate) fn add_node_type(&mut self, node_type: &str) {
        if !self.entries.contains_key(node_type) {
            self.entries.insert(node_type.to_string(), IndexSet::new());
        }
    }

    /// Records one observed `(edge type, neighbor type)` pair; duplicates
    /// collapse.
    pub(crate) fn add_edge_kind(&mut self, node_type: &str, edge_type: &str, neighbor_type: &str) {
        self.entries
            .entry(node_type.to_string())
            .or_default()
            .insert(SchemaEdge {
                edge_type: edge_type.to_string(),
                neighbor_type: neighbor_type.to_string(),
            });
    }

    /// Returns the connection kinds of a node type, or `None` for unknown
    /// types.
    #[must_use]
    pub fn edges_of(&self, node_type: &str) -> Option<&IndexSet<SchemaEdge>> {
        self.entries.get(node_type)
    }

    /// Returns true if the node type appears in the schema.
    #[must_use]
    pub fn contains(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// Returns node type labels in registration order.
    #[must_use]
    pub fn node_types(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of node types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the schema has no node types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(node type, connection kinds)` in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<SchemaEdge>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Derives the compatibility schema by scanning out-edges.
///
/// With `subset` given, only the listed nodes are scanned; the result is a
/// cheap approximation on large graphs. Every node type known to the
/// registry gets an entry either way, empty when none of the scanned nodes
/// of that type has out-edges.
pub(crate) fn derive_schema(
    registry: &TypeRegistry,
    node_types: &FxHashMap<u64, TypeId>,
    adjacency: &AdjacencyIndex,
    all_nodes: &[u64],
    subset: Option<&[u64]>,
) -> Result<GraphSchema> {
    let mut schema = GraphSchema::new();
    for (_, label) in registry.node_type_ids() {
        schema.add_node_type(label);
    }

    let scan = subset.unwrap_or(all_nodes);
    for &id in scan {
        let owner = *node_types.get(&id).ok_or(Error::NodeNotFound(id))?;
        let owner_label = registry.node_type_label(owner).unwrap_or_default();
        for entry in adjacency.entries(id, Direction::Out)? {
            let neighbor = node_types[&entry.neighbor];
            schema.add_edge_kind(
                owner_label,
                registry.edge_type_label(entry.edge_type).unwrap_or_default(),
                registry.node_type_label(neighbor).unwrap_or_default(),
            );
        }
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_keeps_empty_entry_for_leaf_types() {
        let mut schema = GraphSchema::new();
        schema.add_node_type("user");
        schema.add_node_type("movie");
        schema.add_edge_kind("user", "rating", "movie");

        assert!(schema.contains("movie"));
        assert!(schema.edges_of("movie").expect("entry").is_empty());
        assert_eq!(schema.edges_of("user").expect("entry").len(), 1);
        assert_eq!(schema.edges_of("actor"), None);
    }

    #[test]
    fn test_schema_collapses_duplicate_pairs() {
        let mut schema = GraphSchema::new();
        schema.add_edge_kind("user", "rating", "movie");
        schema.add_edge_kind("user", "rating", "movie");
        schema.add_edge_kind("user", "follows", "user");

        let edges = schema.edges_of("user").expect("entry");
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_schema_preserves_observation_order() {
        let mut schema = GraphSchema::new();
        schema.add_node_type("A");
        schema.add_node_type("B");
        schema.add_edge_kind("A", "z", "B");
        schema.add_edge_kind("A", "a", "B");

        assert_eq!(schema.node_types(), vec!["A", "B"]);
        let kinds: Vec<_> = schema
            .edges_of("A")
            .expect("entry")
            .iter()
            .map(|e| e.edge_type.as_str())
            .collect();
        assert_eq!(kinds, vec!["z", "a"]);
    }
}
