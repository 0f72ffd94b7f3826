//! End-to-end scenarios: build, query, derive schema, export.

use std::collections::HashMap;

use hetgraph_core::{
    Direction, FeatureSource, GraphBuilder, GraphStore, RawEdge, RawNode, SchemaEdge,
};

/// The ratings graph: movies 0-3, users 4-5, five undirected rating edges.
fn ratings_graph() -> GraphBuilder {
    GraphBuilder::new()
        .add_nodes((0..4).map(|id| RawNode::new(id).with_type("movie")))
        .add_nodes((4..6).map(|id| RawNode::new(id).with_type("user")))
        .add_edges(
            [(4, 0), (4, 1), (5, 1), (4, 2), (5, 3)]
                .into_iter()
                .map(|(s, t)| RawEdge::new(s, t).with_type("rating")),
        )
}

// =============================================================================
// Ratings scenario
// =============================================================================

#[test]
fn test_ratings_schema_is_symmetric() {
    let graph = ratings_graph().build().expect("valid graph");
    let schema = graph.schema(None).expect("derivable");

    // Undirected: both endpoints observe the other side.
    let movie = schema.edges_of("movie").expect("entry");
    assert!(movie.contains(&SchemaEdge {
        edge_type: "rating".to_string(),
        neighbor_type: "user".to_string(),
    }));
    let user = schema.edges_of("user").expect("entry");
    assert!(user.contains(&SchemaEdge {
        edge_type: "rating".to_string(),
        neighbor_type: "movie".to_string(),
    }));
}

#[test]
fn test_directed_ratings_schema_has_empty_movie_entry() {
    let graph = ratings_graph()
        .with_directed(true)
        .build()
        .expect("valid graph");
    let schema = graph.schema(None).expect("derivable");

    // All rating edges point user -> movie, so movies have no out-edges;
    // their entry is present and empty rather than missing.
    assert!(schema.contains("movie"));
    assert!(schema.edges_of("movie").expect("entry").is_empty());
    assert_eq!(schema.edges_of("user").expect("entry").len(), 1);
}

#[test]
fn test_sampled_schema_sees_only_the_subset() {
    let graph = ratings_graph()
        .add_node(RawNode::new(6).with_type("actor"))
        .add_edge(RawEdge::new(6, 0).with_type("acts_in"))
        .build()
        .expect("valid graph");

    // Scanning only user 4 observes ratings but never acts_in.
    let schema = graph.schema(Some(&[4])).expect("derivable");
    assert_eq!(schema.edges_of("user").expect("entry").len(), 1);
    assert!(schema.edges_of("actor").expect("entry").is_empty());
    assert!(schema.edges_of("movie").expect("entry").is_empty());
}

#[test]
fn test_ratings_neighbor_queries() {
    let graph = ratings_graph().build().expect("valid graph");

    assert_eq!(graph.neighbors(4, Direction::Both, None).unwrap(), vec![0, 1, 2]);
    assert_eq!(graph.in_nodes(1, None).unwrap(), vec![4, 5]);
    // Unknown edge type labels filter to nothing instead of failing.
    assert!(graph
        .neighbors(4, Direction::Both, Some(&["purchase"]))
        .unwrap()
        .is_empty());
}

#[test]
fn test_info_summarizes_types_and_counts() {
    let graph = ratings_graph().build().expect("valid graph");
    let info = graph.info();

    assert!(info.contains("undirected multigraph"));
    assert!(info.contains("Nodes: 6, Edges: 5"));
    assert!(info.contains("movie: [4]"));
    assert!(info.contains("user: [2]"));
    assert!(info.contains("rating: [5]"));
}

// =============================================================================
// Features end to end
// =============================================================================

#[test]
fn test_per_type_widths_and_lookup() {
    let mut tables = HashMap::new();
    tables.insert(
        "A".to_string(),
        (0u64..4).map(|id| (id, vec![id as f32; 8])).collect(),
    );
    tables.insert("B".to_string(), vec![(4u64, vec![4.0, 4.0]), (5, vec![5.0, 5.0])]);

    let graph = GraphBuilder::new()
        .add_nodes((0..4).map(|id| RawNode::new(id).with_type("A")))
        .add_nodes((4..7).map(|id| RawNode::new(id).with_type("B")))
        .with_features(FeatureSource::PerType(tables))
        .build()
        .expect("valid graph");

    assert_eq!(graph.feature_sizes(), vec![("A", 8), ("B", 2)]);

    let matrix = graph
        .node_features(&[Some(4), Some(5), Some(6)], Some("B"))
        .expect("valid batch");
    assert_eq!(matrix.rows(), 3);
    assert_eq!(matrix.width(), 2);
    // Node 6 exists but supplied no features.
    assert_eq!(matrix.row(2).unwrap(), &[0.0, 0.0]);
}

#[test]
fn test_mixed_type_batch_is_rejected() {
    let graph = ratings_graph().build().expect("valid graph");

    let err = graph
        .node_features(&[Some(0), Some(4)], None)
        .expect_err("movie and user in one batch");
    assert!(err.is_invalid_argument());
}

// =============================================================================
// Round-trip through the store
// =============================================================================

#[test]
fn test_export_round_trip_through_store() {
    let store = GraphStore::new();
    let graph = ratings_graph()
        .add_node(RawNode::new(6)) // untyped node, default label
        .build()
        .expect("valid graph");
    store.insert("ratings", graph).expect("fresh name");

    let first = store.get("ratings").expect("registered").to_generic();
    let rebuilt = first
        .to_builder()
        .expect("well-formed export")
        .build()
        .expect("valid graph");
    store.insert("ratings-copy", rebuilt).expect("fresh name");

    let second = store.get("ratings-copy").expect("registered").to_generic();
    assert_eq!(first, second);
}

// =============================================================================
// Property tests
// =============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn build_line_graph(num_nodes: u64, width: usize) -> hetgraph_core::HeteroGraph {
        let mut builder = GraphBuilder::new().add_nodes((0..num_nodes).map(|id| {
            RawNode::new(id)
                .with_type("point")
                .with_features(vec![id as f32; width])
        }));
        for id in 1..num_nodes {
            builder = builder.add_edge(RawEdge::new(id - 1, id).with_type("next"));
        }
        builder.build().expect("valid graph")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Lookup always returns len(ids) rows of the type's width, for any
        /// mix of valid and null ids.
        #[test]
        fn prop_lookup_shape(
            width in 1usize..16,
            picks in proptest::collection::vec(proptest::option::of(0u64..20), 0..32)
        ) {
            let graph = build_line_graph(20, width);
            let matrix = graph.node_features(&picks, Some("point")).expect("valid batch");

            prop_assert_eq!(matrix.rows(), picks.len());
            prop_assert_eq!(matrix.width(), width);
            for (i, pick) in picks.iter().enumerate() {
                let row = matrix.row(i).expect("in range");
                match pick {
                    Some(id) => prop_assert!(row.iter().all(|&v| v == *id as f32)),
                    None => prop_assert!(row.iter().all(|&v| v == 0.0)),
                }
            }
        }

        /// Every edge appears exactly once among out-entries: summed out
        /// degrees equal the edge count on directed graphs.
        #[test]
        fn prop_out_degrees_sum_to_edge_count(
            edges in proptest::collection::vec((0u64..10, 0u64..10), 0..64)
        ) {
            let graph = GraphBuilder::new()
                .with_directed(true)
                .add_nodes((0..10).map(RawNode::new))
                .add_edges(edges.iter().map(|&(s, t)| RawEdge::new(s, t)))
                .build()
                .expect("valid graph");

            let total: usize = graph
                .nodes()
                .iter()
                .map(|&id| graph.out_nodes(id, None).expect("known node").len())
                .sum();
            prop_assert_eq!(total, edges.len());
        }

        /// Export then rebuild preserves node and edge counts and the
        /// generic representation itself.
        #[test]
        fn prop_round_trip_counts(
            num_nodes in 1u64..20,
            edges in proptest::collection::vec((0u64..20, 0u64..20), 0..40)
        ) {
            let edges: Vec<_> = edges
                .into_iter()
                .filter(|&(s, t)| s < num_nodes && t < num_nodes)
                .collect();
            let graph = GraphBuilder::new()
                .add_nodes((0..num_nodes).map(RawNode::new))
                .add_edges(edges.iter().map(|&(s, t)| RawEdge::new(s, t)))
                .build()
                .expect("valid graph");

            let first = graph.to_generic();
            let rebuilt = first.to_builder().expect("well-formed").build().expect("valid");

            prop_assert_eq!(rebuilt.node_count(), graph.node_count());
            prop_assert_eq!(rebuilt.edge_count(), graph.edge_count());
            prop_assert_eq!(rebuilt.to_generic(), first);
        }
    }
}
