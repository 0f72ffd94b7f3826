//! Tests for FeatureStore and FeatureMatrix.

use rustc_hash::FxHashMap;

use super::features::{FeatureMatrix, FeatureStore};
use super::types::{TypeId, TypeRegistry};
use crate::error::Error;

/// Two node types: "A" ids 0-3 at width 8, "B" ids 4-6 at width 2 where
/// id 6 never supplied a row.
fn sample_store() -> (TypeRegistry, FxHashMap<u64, TypeId>, FeatureStore) {
    let mut registry = TypeRegistry::new();
    let a = registry.intern_node_type("A");
    let b = registry.intern_node_type("B");

    let mut node_types = FxHashMap::default();
    for id in 0..=3u64 {
        node_types.insert(id, a);
    }
    for id in 4..=6u64 {
        node_types.insert(id, b);
    }

    let mut store = FeatureStore::new();
    let mut data = Vec::new();
    for id in 0..4 {
        data.extend(std::iter::repeat(id as f32).take(8));
    }
    store.insert_type(a, FeatureMatrix::from_raw(8, 4, data), vec![0, 1, 2, 3]);
    store.insert_type(
        b,
        FeatureMatrix::from_raw(2, 2, vec![4.0, 4.5, 5.0, 5.5]),
        vec![4, 5],
    );

    (registry, node_types, store)
}

// =============================================================================
// Shape and zero-fill
// =============================================================================

#[test]
fn test_lookup_shape_matches_ids_and_width() {
    let (registry, node_types, store) = sample_store();

    let matrix = store
        .lookup(&registry, &node_types, &[Some(4), Some(5), Some(6)], Some("B"))
        .unwrap();

    assert_eq!(matrix.rows(), 3);
    assert_eq!(matrix.width(), 2);
    assert_eq!(matrix.row(0).unwrap(), &[4.0, 4.5]);
    assert_eq!(matrix.row(1).unwrap(), &[5.0, 5.5]);
    // Id 6 is a valid node without a stored row: zero-filled.
    assert_eq!(matrix.row(2).unwrap(), &[0.0, 0.0]);
}

#[test]
fn test_lookup_null_ids_zero_fill() {
    let (registry, node_types, store) = sample_store();

    let matrix = store
        .lookup(&registry, &node_types, &[None, Some(2), None], Some("A"))
        .unwrap();

    assert_eq!(matrix.rows(), 3);
    assert_eq!(matrix.row(0).unwrap(), &[0.0; 8]);
    assert_eq!(matrix.row(1).unwrap(), &[2.0; 8]);
    assert_eq!(matrix.row(2).unwrap(), &[0.0; 8]);
}

#[test]
fn test_lookup_all_null_with_explicit_type() {
    let (registry, node_types, store) = sample_store();

    let matrix = store
        .lookup(&registry, &node_types, &[None, None], Some("B"))
        .unwrap();

    assert_eq!(matrix.rows(), 2);
    assert_eq!(matrix.width(), 2);
    assert!(matrix.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn test_lookup_empty_batch_with_explicit_type() {
    let (registry, node_types, store) = sample_store();

    let matrix = store.lookup(&registry, &node_types, &[], Some("A")).unwrap();
    assert_eq!(matrix.rows(), 0);
    assert_eq!(matrix.width(), 8);
}

// =============================================================================
// Type inference and validation
// =============================================================================

#[test]
fn test_lookup_infers_type_from_ids() {
    let (registry, node_types, store) = sample_store();

    let matrix = store
        .lookup(&registry, &node_types, &[Some(4), None, Some(5)], None)
        .unwrap();

    assert_eq!(matrix.width(), 2);
    assert_eq!(matrix.row(1).unwrap(), &[0.0, 0.0]);
}

#[test]
fn test_lookup_rejects_mixed_types() {
    let (registry, node_types, store) = sample_store();

    let err = store
        .lookup(&registry, &node_types, &[Some(0), Some(4)], None)
        .expect_err("ids span A and B");
    assert!(matches!(err, Error::MixedNodeTypes { .. }));
    assert!(err.is_invalid_argument());
}

#[test]
fn test_lookup_all_null_without_type_is_unresolvable() {
    let (registry, node_types, store) = sample_store();

    let err = store
        .lookup(&registry, &node_types, &[None, None], None)
        .expect_err("no width determinable");
    assert!(matches!(err, Error::UnresolvableNodeType));
}

#[test]
fn test_lookup_rejects_contradicted_explicit_type() {
    let (registry, node_types, store) = sample_store();

    let err = store
        .lookup(&registry, &node_types, &[Some(0)], Some("B"))
        .expect_err("node 0 has type A");
    assert!(matches!(
        err,
        Error::NodeTypeMismatch { id: 0, .. }
    ));
}

#[test]
fn test_lookup_rejects_unknown_type_label() {
    let (registry, node_types, store) = sample_store();

    let err = store
        .lookup(&registry, &node_types, &[Some(0)], Some("C"))
        .expect_err("no such type");
    assert!(matches!(err, Error::NodeTypeNotFound(_)));
}

#[test]
fn test_lookup_rejects_unknown_id() {
    let (registry, node_types, store) = sample_store();

    for node_type in [Some("A"), None] {
        let err = store
            .lookup(&registry, &node_types, &[Some(99)], node_type)
            .expect_err("id 99 is not a node");
        assert!(matches!(err, Error::NodeNotFound(99)));
    }
}

// =============================================================================
// Accessors
// =============================================================================

#[test]
fn test_feature_sizes_reports_all_types() {
    let (registry, _, store) = sample_store();

    assert_eq!(store.feature_sizes(&registry), vec![("A", 8), ("B", 2)]);
}

#[test]
fn test_stored_row_only_for_explicit_features() {
    let (_, _, store) = sample_store();

    assert!(store.has_row(5));
    assert_eq!(store.stored_row(5), Some(&[5.0, 5.5][..]));
    assert!(!store.has_row(6));
    assert_eq!(store.stored_row(6), None);
}

#[test]
fn test_matrix_row_out_of_range() {
    let matrix = FeatureMatrix::from_raw(2, 1, vec![1.0, 2.0]);

    assert_eq!(matrix.row(0).unwrap(), &[1.0, 2.0]);
    assert_eq!(matrix.row(1), None);
    assert_eq!(matrix.iter_rows().count(), 1);
}
