//! Error types for the scene store

use thiserror::Error;

/// Unrecoverable failures that abort the current operation.
///
/// Recoverable problems (ownership conflicts, NaN writes, children under
/// reference nodes) never surface here; they become
/// [`Diagnostic`](super::Diagnostic)s and leave the store untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    /// An operation named an id that is not in the store
    #[error("node '{id}' not found")]
    NodeNotFound { id: String },

    /// A reference points at an id that is not in the store
    #[error("reference '{id}' points at missing node '{ref_id}'")]
    RefTargetNotFound { id: String, ref_id: String },

    /// Reference chain longer than the configured depth
    #[error("reference '{id}' points at reference '{ref_id}'; ref of ref is not supported")]
    RefOfRef { id: String, ref_id: String },

    /// A reference chain that revisits a node
    #[error("reference cycle: {}", chain.join(" -> "))]
    ReferenceCycle { chain: Vec<String> },

    /// Ownership query with an axis other than x, y, width or height
    #[error("invalid axis '{axis}' (expected x, y, width or height)")]
    InvalidAxis { axis: String },

    /// Two nodes that do not share a root
    #[error("nodes '{a}' and '{b}' have no common ancestor")]
    NoCommonAncestor { a: String, b: String },

    /// The parent chain of a node loops back on itself
    #[error("parent chain of '{id}' contains a cycle")]
    ParentCycle { id: String },

    /// A raw merge was aimed at a reference node
    #[error("node '{id}' is a reference; resolve it before merging")]
    NotConcrete { id: String },
}

impl SceneError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    pub fn ref_target_not_found(id: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self::RefTargetNotFound {
            id: id.into(),
            ref_id: ref_id.into(),
        }
    }

    pub fn ref_of_ref(id: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self::RefOfRef {
            id: id.into(),
            ref_id: ref_id.into(),
        }
    }

    pub fn cycle(chain: Vec<String>) -> Self {
        Self::ReferenceCycle { chain }
    }

    pub fn invalid_axis(axis: impl Into<String>) -> Self {
        Self::InvalidAxis { axis: axis.into() }
    }

    /// The node the error is about, if there is a single one
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::NodeNotFound { id }
            | Self::RefTargetNotFound { id, .. }
            | Self::RefOfRef { id, .. }
            | Self::ParentCycle { id }
            | Self::NotConcrete { id } => Some(id),
            Self::NoCommonAncestor { a, .. } => Some(a),
            Self::ReferenceCycle { chain } => chain.first().map(String::as_str),
            Self::InvalidAxis { .. } => None,
        }
    }
}
