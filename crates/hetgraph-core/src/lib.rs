//! # `HetGraph` Core
//!
//! Heterogeneous multigraph storage and indexing engine for graph-ML
//! sampling workloads.
//!
//! `HetGraph` builds immutable typed multigraphs in one validated pass and
//! serves concurrent read queries: batch feature lookup with zero-fill
//! semantics, typed neighbor expansion with multiplicity, derived
//! compatibility schemas, and a generic attributed-multigraph export.
//!
//! ## Quick Start
//!
//! ```
//! use hetgraph_core::{Direction, GraphBuilder, GraphStore, RawEdge, RawNode};
//!
//! let graph = GraphBuilder::new()
//!     .add_node(RawNode::new(0).with_type("user"))
//!     .add_node(RawNode::new(1).with_type("movie").with_features(vec![1.0, 0.0]))
//!     .add_edge(RawEdge::new(0, 1).with_type("rating").with_weight(5.0))
//!     .build()
//!     .expect("valid graph");
//!
//! // Query the graph directly...
//! assert_eq!(graph.neighbors(1, Direction::Both, None).unwrap(), vec![0]);
//!
//! // ...or register it for shared access across sampling workers.
//! let store = GraphStore::new();
//! store.insert("ratings", graph).expect("fresh name");
//! let handle = store.get("ratings").expect("registered");
//! assert_eq!(handle.edge_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
// Feature values are f32 by contract; weights stay f64.
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod graph;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

pub use config::{ConfigError, EngineConfig, LabelConfig, LimitsConfig, LoggingConfig};
pub use error::{Error, Result};
pub use graph::{
    AdjacencyEntry, AdjacencyIndex, Direction, EdgeRecord, FeatureMatrix, FeatureSource,
    FeatureStore, GenericEdge, GenericGraph, GenericNode, GraphBuilder, GraphSchema, HeteroGraph,
    RawEdge, RawNode, SchemaEdge, TypeId, TypeRegistry,
};

/// Registry of built graphs, shared across sampling workers.
///
/// Graphs are immutable, so the store hands out cheap `Arc` clones; the
/// lock only guards the name table, never a query.
#[derive(Debug, Default)]
pub struct GraphStore {
    graphs: RwLock<HashMap<String, Arc<HeteroGraph>>>,
}

impl GraphStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built graph under a unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken.
    pub fn insert(&self, name: &str, graph: HeteroGraph) -> Result<()> {
        let mut graphs = self.graphs.write();
        if graphs.contains_key(name) {
            return Err(Error::GraphExists(name.to_string()));
        }
        graphs.insert(name.to_string(), Arc::new(graph));
        Ok(())
    }

    /// Returns a shared handle to a registered graph.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<HeteroGraph>> {
        self.graphs.read().get(name).cloned()
    }

    /// Lists registered graph names.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.graphs.read().keys().cloned().collect()
    }

    /// Removes a graph from the store.
    ///
    /// Outstanding handles stay valid; only the name is released.
    ///
    /// # Errors
    ///
    /// Returns an error if no graph is registered under the name.
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut graphs = self.graphs.write();
        if graphs.remove(name).is_none() {
            return Err(Error::GraphNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Number of registered graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.read().len()
    }

    /// Returns true if no graph is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.read().is_empty()
    }
}
