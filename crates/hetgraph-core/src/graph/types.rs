//! Type label interning and the node/edge type registry.
//!
//! Heterogeneous graphs repeat a handful of type labels across millions of
//! nodes and edges. Labels are interned once at construction and handled as
//! compact `TypeId`s everywhere else; no attribute probing happens at query
//! time.

use rustc_hash::FxHashMap;

/// ID for an interned type label.
///
/// Using u32 allows ~4 billion unique labels while saving memory
/// compared to storing String on each node/edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeId(u32);

impl TypeId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Creates a `TypeId` from a raw value.
    #[must_use]
    pub fn from_u32(id: u32) -> Self {
        Self(id)
    }
}

/// String interning table for type labels.
///
/// Stores each unique label string once and returns a compact `TypeId`
/// that can be used for efficient comparison and storage.
#[derive(Debug, Default, Clone)]
pub struct TypeTable {
    /// Stored labels indexed by `TypeId`
    labels: Vec<String>,
    /// Reverse lookup: label -> `TypeId`
    ids: FxHashMap<String, TypeId>,
}

impl TypeTable {
    /// Creates a new empty type table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a label and returns its ID.
    ///
    /// If the label was already interned, returns the existing ID.
    ///
    /// # Panics
    ///
    /// Panics if the number of interned labels exceeds `u32::MAX`.
    /// This is extremely unlikely in practice.
    pub fn intern(&mut self, label: &str) -> TypeId {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let len = self.labels.len();
        assert!(
            len < u32::MAX as usize,
            "TypeTable overflow: cannot intern more than {} labels",
            u32::MAX
        );
        #[allow(clippy::cast_possible_truncation)]
        let id = TypeId(len as u32);
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        id
    }

    /// Resolves a `TypeId` back to its original label.
    ///
    /// Returns `None` if the ID is invalid.
    #[must_use]
    pub fn resolve(&self, id: TypeId) -> Option<&str> {
        self.labels.get(id.0 as usize).map(String::as_str)
    }

    /// Gets the ID for a label if it exists, without interning.
    #[must_use]
    pub fn get_id(&self, label: &str) -> Option<TypeId> {
        self.ids.get(label).copied()
    }

    /// Returns the number of unique labels in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no labels have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns an iterator over all interned labels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, s)| (TypeId(i as u32), s.as_str()))
    }

    /// Checks if a label is already interned.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.ids.contains_key(label)
    }
}

/// Registry of the node and edge type labels present in a built graph.
///
/// The registry is populated once during construction and is a closed,
/// enumerable set afterwards. Elements ingested without an explicit type
/// carry the shared default label, so the default label shows up here like
/// any other type.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    node_types: TypeTable,
    edge_types: TypeTable,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a node type label.
    pub fn intern_node_type(&mut self, label: &str) -> TypeId {
        self.node_types.intern(label)
    }

    /// Interns an edge type label.
    pub fn intern_edge_type(&mut self, label: &str) -> TypeId {
        self.edge_types.intern(label)
    }

    /// Resolves a node `TypeId` to its label.
    #[must_use]
    pub fn node_type_label(&self, id: TypeId) -> Option<&str> {
        self.node_types.resolve(id)
    }

    /// Resolves an edge `TypeId` to its label.
    #[must_use]
    pub fn edge_type_label(&self, id: TypeId) -> Option<&str> {
        self.edge_types.resolve(id)
    }

    /// Gets the ID of a node type label, if present.
    #[must_use]
    pub fn node_type_id(&self, label: &str) -> Option<TypeId> {
        self.node_types.get_id(label)
    }

    /// Gets the ID of an edge type label, if present.
    #[must_use]
    pub fn edge_type_id(&self, label: &str) -> Option<TypeId> {
        self.edge_types.get_id(label)
    }

    /// Returns all node type labels in insertion order.
    #[must_use]
    pub fn node_types(&self) -> Vec<&str> {
        self.node_types.iter().map(|(_, s)| s).collect()
    }

    /// Returns all edge type labels in insertion order.
    #[must_use]
    pub fn edge_types(&self) -> Vec<&str> {
        self.edge_types.iter().map(|(_, s)| s).collect()
    }

    /// Returns `(id, label)` pairs for node types in insertion order.
    #[must_use]
    pub fn node_type_ids(&self) -> Vec<(TypeId, &str)> {
        self.node_types.iter().collect()
    }

    /// Returns `(id, label)` pairs for edge types in insertion order.
    #[must_use]
    pub fn edge_type_ids(&self) -> Vec<(TypeId, &str)> {
        self.edge_types.iter().collect()
    }

    /// Returns the number of node types.
    #[must_use]
    pub fn node_type_count(&self) -> usize {
        self.node_types.len()
    }

    /// Returns the number of edge types.
    #[must_use]
    pub fn edge_type_count(&self) -> usize {
        self.edge_types.len()
    }
}
