//! Generic attributed-multigraph view for interchange.
//!
//! `GenericGraph` mirrors the built graph as plain nodes and edges with
//! JSON attribute maps, the shape external tooling expects. Type labels are
//! always materialized (including defaults assigned at construction);
//! feature vectors appear only for nodes that supplied one, so exporting
//! never invents zero vectors the input did not contain.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::builder::{GraphBuilder, RawEdge, RawNode};
use super::core::HeteroGraph;
use crate::error::{Error, Result};

/// Attribute key for node and edge type labels.
pub const LABEL_KEY: &str = "label";
/// Attribute key for node feature vectors.
pub const FEATURE_KEY: &str = "feature";
/// Attribute key for edge weights.
pub const WEIGHT_KEY: &str = "weight";

/// One exported node: id plus a JSON attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericNode {
    /// Node id.
    pub id: u64,
    /// Attributes; always carries `label`, carries `feature` when stored.
    pub attributes: Map<String, Value>,
}

/// One exported edge: endpoints plus a JSON attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericEdge {
    /// Source node id.
    pub source: u64,
    /// Target node id.
    pub target: u64,
    /// Attributes; always carries `label`, carries `weight` when present.
    pub attributes: Map<String, Value>,
}

/// A generic attributed multigraph, isomorphic to the graph it was exported
/// from.
///
/// Feeding an export back through [`GenericGraph::to_builder`] and
/// exporting again yields an identical value; the first build materializes
/// default labels and after that the representation is a fixed point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericGraph {
    /// Directedness of the source graph.
    pub directed: bool,
    /// Nodes in insertion order.
    pub nodes: Vec<GenericNode>,
    /// Edges in insertion order.
    pub edges: Vec<GenericEdge>,
}

impl GenericGraph {
    /// Exports a built graph.
    #[must_use]
    pub fn from_graph(graph: &HeteroGraph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|&id| {
                let mut attributes = Map::new();
                // Every node of a built graph has a type label.
                let label = graph.node_type_of(id).unwrap_or_default();
                attributes.insert(LABEL_KEY.to_string(), Value::from(label));
                if let Some(row) = graph.stored_features_of(id) {
                    attributes.insert(FEATURE_KEY.to_string(), json!(row));
                }
                GenericNode { id, attributes }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let mut attributes = Map::new();
                let label = graph
                    .registry()
                    .edge_type_label(edge.edge_type)
                    .unwrap_or_default();
                attributes.insert(LABEL_KEY.to_string(), Value::from(label));
                if let Some(weight) = edge.weight {
                    attributes.insert(WEIGHT_KEY.to_string(), json!(weight));
                }
                GenericEdge {
                    source: edge.source,
                    target: edge.target,
                    attributes,
                }
            })
            .collect();

        Self {
            directed: graph.is_directed(),
            nodes,
            edges,
        }
    }

    /// Turns the export back into a builder, for re-ingestion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when an attribute has the wrong JSON
    /// shape (non-string label, non-numeric weight, non-array feature).
    pub fn to_builder(&self) -> Result<GraphBuilder> {
        let mut builder = GraphBuilder::new().with_directed(self.directed);

        for node in &self.nodes {
            let mut raw = RawNode::new(node.id);
            if let Some(label) = node.attributes.get(LABEL_KEY) {
                raw = raw.with_type(as_label(label, node.id)?);
            }
            if let Some(feature) = node.attributes.get(FEATURE_KEY) {
                raw = raw.with_features(as_feature(feature, node.id)?);
            }
            builder = builder.add_node(raw);
        }

        for edge in &self.edges {
            let mut raw = RawEdge::new(edge.source, edge.target);
            if let Some(label) = edge.attributes.get(LABEL_KEY) {
                raw = raw.with_type(as_label(label, edge.source)?);
            }
            if let Some(weight) = edge.attributes.get(WEIGHT_KEY) {
                let weight = weight.as_f64().ok_or_else(|| {
                    Error::Construction(format!(
                        "edge ({}, {}) has a non-numeric weight attribute",
                        edge.source, edge.target
                    ))
                })?;
                raw = raw.with_weight(weight);
            }
            builder = builder.add_edge(raw);
        }

        Ok(builder)
    }
}

fn as_label(value: &Value, id: u64) -> Result<&str> {
    value
        .as_str()
        .ok_or_else(|| Error::Construction(format!("element {id} has a non-string label")))
}

#[allow(clippy::cast_possible_truncation)]
fn as_feature(value: &Value, id: u64) -> Result<Vec<f32>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::Construction(format!("node {id} has a non-array feature")))?;
    items
        .iter()
        .map(|item| {
            item.as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| Error::Construction(format!("node {id} has a non-numeric feature")))
        })
        .collect()
}
