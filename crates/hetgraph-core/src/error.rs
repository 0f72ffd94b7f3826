//! Error types for `HetGraph`.
//!
//! This module provides a unified error type for all `HetGraph` operations.
//! Construction errors are fatal to the build attempt; query errors never
//! corrupt the built graph and are safe to retry with corrected arguments.

use thiserror::Error;

/// Result type alias for `HetGraph` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `HetGraph` operations.
///
/// Each variant includes a descriptive error message suitable for end-users.
/// Error codes follow the pattern `HGRAPH-XXX` for easy debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// Graph already registered under this name (HGRAPH-001).
    #[error("[HGRAPH-001] Graph '{0}' already exists")]
    GraphExists(String),

    /// Graph not found in the store (HGRAPH-002).
    #[error("[HGRAPH-002] Graph '{0}' not found")]
    GraphNotFound(String),

    /// Node not found (HGRAPH-003).
    ///
    /// Adjacency queries are strict about node existence, unlike feature
    /// lookups which zero-fill null ids.
    #[error("[HGRAPH-003] Node with ID '{0}' not found")]
    NodeNotFound(u64),

    /// Node type not found (HGRAPH-004).
    #[error("[HGRAPH-004] Node type '{0}' not found")]
    NodeTypeNotFound(String),

    /// Supplied ids span more than one node type (HGRAPH-005).
    #[error("[HGRAPH-005] Ids span multiple node types ('{first}' and '{second}'); pass an explicit node type")]
    MixedNodeTypes {
        /// First node type encountered.
        first: String,
        /// Conflicting node type encountered.
        second: String,
    },

    /// A node's actual type contradicts the requested type (HGRAPH-006).
    #[error("[HGRAPH-006] Node '{id}' has type '{actual}', expected '{expected}'")]
    NodeTypeMismatch {
        /// The offending node id.
        id: u64,
        /// Type requested by the caller.
        expected: String,
        /// The node's actual type.
        actual: String,
    },

    /// No node type could be determined for a lookup (HGRAPH-007).
    ///
    /// Raised when all supplied ids are null and no explicit type was given.
    #[error("[HGRAPH-007] Cannot resolve a node type: all ids are null and no type was given")]
    UnresolvableNodeType,

    /// Feature width mismatch within one node type (HGRAPH-008).
    #[error("[HGRAPH-008] Feature width mismatch for node type '{node_type}': expected {expected}, got {actual}")]
    FeatureWidthMismatch {
        /// Node type whose features disagree.
        node_type: String,
        /// Previously established width.
        expected: usize,
        /// Conflicting width.
        actual: usize,
    },

    /// Fatal construction error (HGRAPH-009).
    ///
    /// Raised only during the builder's single pass; there is no partial graph.
    #[error("[HGRAPH-009] Construction error: {0}")]
    Construction(String),

    /// Configuration error (HGRAPH-010).
    #[error("[HGRAPH-010] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "HGRAPH-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::GraphExists(_) => "HGRAPH-001",
            Self::GraphNotFound(_) => "HGRAPH-002",
            Self::NodeNotFound(_) => "HGRAPH-003",
            Self::NodeTypeNotFound(_) => "HGRAPH-004",
            Self::MixedNodeTypes { .. } => "HGRAPH-005",
            Self::NodeTypeMismatch { .. } => "HGRAPH-006",
            Self::UnresolvableNodeType => "HGRAPH-007",
            Self::FeatureWidthMismatch { .. } => "HGRAPH-008",
            Self::Construction(_) => "HGRAPH-009",
            Self::Config(_) => "HGRAPH-010",
        }
    }

    /// Returns true if this error names an invalid argument.
    ///
    /// Invalid-argument errors are safe to retry with corrected arguments.
    /// Construction errors are fatal to the build attempt instead.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::MixedNodeTypes { .. }
                | Self::NodeTypeMismatch { .. }
                | Self::UnresolvableNodeType
                | Self::FeatureWidthMismatch { .. }
        )
    }

    /// Returns true if this error names a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound(_) | Self::NodeTypeNotFound(_) | Self::GraphNotFound(_)
        )
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
