//! Dense per-type feature storage and batch lookup.
//!
//! Every node type owns one row-major `f32` matrix; a node with an explicit
//! feature vector owns one row of its type's matrix. Nodes without a stored
//! row (and null-id placeholders) resolve to zero vectors of the type's
//! width, so lookups never fail on missing data, only on type conflicts.

use rustc_hash::FxHashMap;

use super::types::{TypeId, TypeRegistry};
use crate::error::{Error, Result};

/// Row-major dense matrix of `f32` features.
///
/// Doubles as the return type of batch lookups: `rows x width` values in a
/// single contiguous buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    width: usize,
    rows: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Creates a matrix with no rows.
    #[must_use]
    pub fn empty(width: usize) -> Self {
        Self {
            width,
            rows: 0,
            data: Vec::new(),
        }
    }

    /// Creates a matrix from raw row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not `rows * width`.
    #[must_use]
    pub fn from_raw(width: usize, rows: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), rows * width, "row-major shape mismatch");
        Self { width, rows, data }
    }

    pub(crate) fn with_capacity(width: usize, rows: usize) -> Self {
        Self {
            width,
            rows: 0,
            data: Vec::with_capacity(width * rows),
        }
    }

    /// Number of values per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns one row as a slice, or `None` if `row` is out of range.
    ///
    /// Rows of a zero-width matrix are in range but empty.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.data[row * self.width..(row + 1) * self.width])
    }

    /// Returns the full row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Iterates over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).map(|r| &self.data[r * self.width..(r + 1) * self.width])
    }

    pub(crate) fn push_row(&mut self, row: &[f32]) {
        debug_assert_eq!(row.len(), self.width);
        self.data.extend_from_slice(row);
        self.rows += 1;
    }

    pub(crate) fn push_zero_row(&mut self) {
        self.data.resize(self.data.len() + self.width, 0.0);
        self.rows += 1;
    }
}

/// Per-type feature matrices plus the id-to-row index.
///
/// Built once during graph construction; immutable and safe for
/// unsynchronized concurrent reads afterwards. Only nodes that supplied an
/// explicit feature vector have a row; all other nodes of the type read as
/// zero vectors of the type's width.
#[derive(Debug, Default)]
pub struct FeatureStore {
    matrices: FxHashMap<TypeId, FeatureMatrix>,
    /// Node id to its row in the owning type's matrix. Ids without explicit
    /// features are absent and zero-fill at lookup time.
    rows: FxHashMap<u64, (TypeId, usize)>,
}

impl FeatureStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Installs the built matrix for one node type.
    ///
    /// `ids` lists the nodes owning rows, in row order.
    pub(crate) fn insert_type(&mut self, type_id: TypeId, matrix: FeatureMatrix, ids: Vec<u64>) {
        debug_assert_eq!(matrix.rows(), ids.len());
        for (row, id) in ids.into_iter().enumerate() {
            self.rows.insert(id, (type_id, row));
        }
        self.matrices.insert(type_id, matrix);
    }

    /// Returns the feature width of a node type, or `None` for unknown
    /// types.
    #[must_use]
    pub fn width_of(&self, type_id: TypeId) -> Option<usize> {
        self.matrices.get(&type_id).map(|m| m.width)
    }

    /// Returns true if `id` owns an explicit feature row.
    #[must_use]
    pub fn has_row(&self, id: u64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Returns the stored feature row of `id`, or `None` if the node never
    /// supplied one.
    #[must_use]
    pub fn stored_row(&self, id: u64) -> Option<&[f32]> {
        let (type_id, row) = self.rows.get(&id).copied()?;
        self.matrices[&type_id].row(row)
    }

    /// Batch feature lookup with type inference and zero-fill.
    ///
    /// `ids` may mix real ids with `None` placeholders. The governing node
    /// type is `node_type` when given, otherwise inferred from the types of
    /// the non-null ids. `None` entries and nodes without a stored row both
    /// produce all-zero rows of the type's width; the result always has
    /// `ids.len()` rows.
    ///
    /// # Errors
    ///
    /// - [`Error::UnresolvableNodeType`] if every id is `None` and no type
    ///   was given.
    /// - [`Error::NodeTypeNotFound`] if the explicit type label is unknown.
    /// - [`Error::NodeNotFound`] for ids absent from the graph.
    /// - [`Error::MixedNodeTypes`] when inferred ids span two types.
    /// - [`Error::NodeTypeMismatch`] when an id contradicts the explicit
    ///   type.
    pub fn lookup(
        &self,
        registry: &TypeRegistry,
        node_types: &FxHashMap<u64, TypeId>,
        ids: &[Option<u64>],
        node_type: Option<&str>,
    ) -> Result<FeatureMatrix> {
        let type_id = self.resolve_batch_type(registry, node_types, ids, node_type)?;
        let width = self.width_of(type_id).unwrap_or(0);

        let mut matrix = FeatureMatrix::with_capacity(width, ids.len());
        for id in ids {
            match id.and_then(|id| self.rows.get(&id)) {
                Some(&(_, row)) => {
                    // Rows are always in range of their matrix.
                    let data = self.matrices[&type_id].row(row).unwrap_or(&[]);
                    matrix.push_row(data);
                }
                None => matrix.push_zero_row(),
            }
        }
        Ok(matrix)
    }

    /// Resolves and validates the single node type governing a lookup batch.
    fn resolve_batch_type(
        &self,
        registry: &TypeRegistry,
        node_types: &FxHashMap<u64, TypeId>,
        ids: &[Option<u64>],
        node_type: Option<&str>,
    ) -> Result<TypeId> {
        if let Some(label) = node_type {
            let type_id = registry
                .node_type_id(label)
                .ok_or_else(|| Error::NodeTypeNotFound(label.to_string()))?;
            for id in ids.iter().flatten() {
                let actual = *node_types.get(id).ok_or(Error::NodeNotFound(*id))?;
                if actual != type_id {
                    return Err(Error::NodeTypeMismatch {
                        id: *id,
                        expected: label.to_string(),
                        actual: label_of(registry, actual),
                    });
                }
            }
            return Ok(type_id);
        }

        let mut inferred: Option<TypeId> = None;
        for id in ids.iter().flatten() {
            let type_id = *node_types.get(id).ok_or(Error::NodeNotFound(*id))?;
            match inferred {
                None => inferred = Some(type_id),
                Some(first) if first != type_id => {
                    return Err(Error::MixedNodeTypes {
                        first: label_of(registry, first),
                        second: label_of(registry, type_id),
                    });
                }
                Some(_) => {}
            }
        }
        inferred.ok_or(Error::UnresolvableNodeType)
    }

    /// Returns `(label, width)` for every node type, in registration order.
    #[must_use]
    pub fn feature_sizes<'a>(&self, registry: &'a TypeRegistry) -> Vec<(&'a str, usize)> {
        registry
            .node_type_ids()
            .into_iter()
            .map(|(id, label)| (label, self.width_of(id).unwrap_or(0)))
            .collect()
    }
}

fn label_of(registry: &TypeRegistry, id: TypeId) -> String {
    registry.node_type_label(id).unwrap_or_default().to_string()
}
