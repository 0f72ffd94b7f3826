//! Per-node adjacency index with direction, type, and weight queries.
//!
//! This module provides:
//! - `AdjacencyEntry`: one (neighbor, edge type, optional weight) record
//! - `AdjacencyIndex`: out/in indexes over all nodes, multiplicity preserved
//!
//! Each edge contributes one out-entry at its source and one in-entry at its
//! destination; undirected graphs store the same entry at both endpoints, so
//! every direction returns identical results. Parallel edges stay parallel:
//! a node joined twice to the same neighbor yields that neighbor twice.

use rustc_hash::FxHashMap;

use super::types::TypeId;
use crate::error::{Error, Result};

/// Traversal direction for neighbor queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow out-edges from the queried node.
    Out,
    /// Follow in-edges into the queried node.
    In,
    /// Union of out- and in-entries (identical to either one on
    /// undirected graphs).
    Both,
}

/// A single adjacency record: the neighbor reached by one edge.
///
/// `weight` is `None` when the edge carried no weight attribute; callers can
/// distinguish "no weight" from "weight = 0.0".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacencyEntry {
    /// Neighbor node id.
    pub neighbor: u64,
    /// Interned edge type.
    pub edge_type: TypeId,
    /// Edge weight, if the edge carried one.
    pub weight: Option<f64>,
}

/// Insertion-ordered out/in adjacency over all nodes of a graph.
///
/// Built once during graph construction; immutable and safe for
/// unsynchronized concurrent reads afterwards. Unknown node ids fail with a
/// not-found error rather than returning an empty list, so callers can tell
/// "isolated node" apart from "no such node".
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    directed: bool,
    /// Out-entries per node. Every node has a key, isolated nodes included.
    out: FxHashMap<u64, Vec<AdjacencyEntry>>,
    /// In-entries per node. For undirected graphs this mirrors `out`.
    inc: FxHashMap<u64, Vec<AdjacencyEntry>>,
}

impl AdjacencyIndex {
    /// Creates an empty index.
    #[must_use]
    pub(crate) fn new(directed: bool) -> Self {
        Self {
            directed,
            out: FxHashMap::default(),
            inc: FxHashMap::default(),
        }
    }

    /// Registers a node so that queries on it succeed even with no edges.
    pub(crate) fn add_node(&mut self, id: u64) {
        self.out.entry(id).or_default();
        self.inc.entry(id).or_default();
    }

    /// Records one edge.
    ///
    /// Directed: one out-entry at `source`, one in-entry at `target`.
    /// Undirected: one entry at each endpoint pointing to the other, stored
    /// in both indexes so every direction sees it. A self-loop contributes a
    /// single entry per index.
    pub(crate) fn add_edge(
        &mut self,
        source: u64,
        target: u64,
        edge_type: TypeId,
        weight: Option<f64>,
    ) {
        if self.directed {
            self.out.entry(source).or_default().push(AdjacencyEntry {
                neighbor: target,
                edge_type,
                weight,
            });
            self.inc.entry(target).or_default().push(AdjacencyEntry {
                neighbor: source,
                edge_type,
                weight,
            });
        } else {
            self.push_undirected(source, target, edge_type, weight);
            if source != target {
                self.push_undirected(target, source, edge_type, weight);
            }
        }
    }

    fn push_undirected(&mut self, at: u64, neighbor: u64, edge_type: TypeId, weight: Option<f64>) {
        let entry = AdjacencyEntry {
            neighbor,
            edge_type,
            weight,
        };
        self.out.entry(at).or_default().push(entry);
        self.inc.entry(at).or_default().push(entry);
    }

    /// Returns true if the index was built for a directed graph.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Returns true if `id` is a node of the graph.
    #[must_use]
    pub fn contains_node(&self, id: u64) -> bool {
        self.out.contains_key(&id)
    }

    /// Returns the degree of `id` in the given direction.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn degree(&self, id: u64, direction: Direction) -> Result<usize> {
        Ok(self.entries(id, direction)?.count())
    }

    /// Returns the raw adjacency entries for `id` in the given direction.
    ///
    /// Entries come back in insertion order; `Both` on a directed graph
    /// yields out-entries first, then in-entries.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn entries(
        &self,
        id: u64,
        direction: Direction,
    ) -> Result<impl Iterator<Item = &AdjacencyEntry>> {
        let out = self.out.get(&id).ok_or(Error::NodeNotFound(id))?;
        // `out` existing implies `inc` exists too; every node has both keys.
        let inc = &self.inc[&id];

        let (first, second): (&[AdjacencyEntry], &[AdjacencyEntry]) =
            match (self.directed, direction) {
                (_, Direction::Out) => (out, &[]),
                (_, Direction::In) => (inc, &[]),
                // Undirected: out and in hold identical entries.
                (false, Direction::Both) => (out, &[]),
                (true, Direction::Both) => (out, inc),
            };

        Ok(first.iter().chain(second.iter()))
    }

    /// Returns matching neighbor ids, one per edge.
    ///
    /// `edge_types`, if given, keeps only entries whose type is in the set;
    /// an empty result is valid when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown node ids.
    pub fn neighbors(
        &self,
        id: u64,
        direction: Direction,
        edge_types: Option<&[TypeId]>,
    ) -> Result<Vec<u64>> {
        Ok(self
            .entries(id, direction)?
            .filter(|e| matches_filter(e, edge_types))
            .map(|e| e.neighbor)
            .collect())
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
        edge_types: Option<&[TypeId]>,
    ) -> Result<Vec<(u64, Option<f64>)>> {
        Ok(self
            .entries(id, direction)?
            .filter(|e| matches_filter(e, edge_types))
            .map(|e| (e.neighbor, e.weight))
            .collect())
    }

    /// Returns the number of nodes known to the index.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.out.len()
    }
}

fn matches_filter(entry: &AdjacencyEntry, edge_types: Option<&[TypeId]>) -> bool {
    edge_types.map_or(true, |types| types.contains(&entry.edge_type))
}
