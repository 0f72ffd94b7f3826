//! Heterogeneous multigraph storage and indexing.
//!
//! This module builds immutable typed multigraphs for graph-ML sampling
//! workloads and answers the two hot queries of that domain: batch feature
//! lookup and typed neighbor expansion.
//!
//! # Features
//!
//! - **Typed nodes and edges**: string labels interned once, compact ids
//!   everywhere after construction
//! - **Per-type dense features**: one row-major `f32` matrix per node type,
//!   zero-fill for null ids and featureless nodes
//! - **Multigraph adjacency**: parallel edges and self-loops preserved,
//!   direction and type filters, optional `f64` weights
//! - **Derived schema**: per node type, the observed (edge type, neighbor
//!   type) pairs
//! - **Generic export**: attributed-multigraph view for external tooling,
//!   stable under round-trips
//!
//! # Example
//!
//! ```
//! use hetgraph_core::graph::{Direction, GraphBuilder, RawEdge, RawNode};
//!
//! let graph = GraphBuilder::new()
//!     .add_node(RawNode::new(0).with_type("user"))
//!     .add_node(RawNode::new(1).with_type("movie").with_features(vec![0.5, 1.0]))
//!     .add_edge(RawEdge::new(0, 1).with_type("rating").with_weight(4.5))
//!     .build()
//!     .expect("valid graph");
//!
//! assert_eq!(graph.neighbors(0, Direction::Out, None).unwrap(), vec![1]);
//! let features = graph.node_features(&[Some(1), None], Some("movie")).unwrap();
//! assert_eq!(features.rows(), 2);
//! assert_eq!(features.row(1).unwrap(), &[0.0, 0.0]);
//! ```

mod adjacency;
mod builder;
mod core;
mod export;
mod features;
mod schema;
mod types;

#[cfg(test)]
mod features_tests;

pub use adjacency::{AdjacencyEntry, AdjacencyIndex, Direction};
pub use builder::{FeatureSource, GraphBuilder, RawEdge, RawNode};
pub use self::core::{EdgeRecord, HeteroGraph};
pub use export::{GenericEdge, GenericGraph, GenericNode, FEATURE_KEY, LABEL_KEY, WEIGHT_KEY};
pub use features::{FeatureMatrix, FeatureStore};
pub use schema::{GraphSchema, SchemaEdge};
pub use types::{TypeId, TypeRegistry, TypeTable};
