//! Change notifications for the recomputation layer

use super::types::Id;

/// What about a node changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A stored bounding box field changed value
    BBox,
    /// A translate component changed value (including materialized defaults)
    Transform,
    CustomData,
    /// The node was created or gained a child
    Structure,
}

/// A single change to the store, delivered to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub id: Id,
    pub kind: ChangeKind,
}
