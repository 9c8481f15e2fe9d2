//! Scene graph node variants

use super::types::{BBox, Id, Transform};

/// Owner of each bounding box field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BBoxOwners {
    pub left: Option<Id>,
    pub top: Option<Id>,
    pub width: Option<Id>,
    pub height: Option<Id>,
}

/// Owner of each translate axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOwners {
    pub x: Option<Id>,
    pub y: Option<Id>,
}

/// A node with geometry of its own
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteNode<D> {
    pub bbox: BBox,
    pub bbox_owners: BBoxOwners,
    pub transform: Transform,
    pub transform_owners: TransformOwners,
    /// Child ids in insertion order
    pub children: Vec<Id>,
    pub parent: Option<Id>,
    pub custom_data: Option<D>,
}

impl<D> ConcreteNode<D> {
    pub fn new(parent: Option<Id>) -> Self {
        Self {
            bbox: BBox::default(),
            bbox_owners: BBoxOwners::default(),
            transform: Transform::default(),
            transform_owners: TransformOwners::default(),
            children: Vec::new(),
            parent,
            custom_data: None,
        }
    }
}

/// A node that stands in for another node for layout purposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefNode {
    pub ref_id: Id,
    pub parent: Option<Id>,
}

/// A node of the scene graph
#[derive(Debug, Clone, PartialEq)]
pub enum ScenegraphNode<D> {
    Concrete(ConcreteNode<D>),
    Ref(RefNode),
}

impl<D> ScenegraphNode<D> {
    pub fn parent(&self) -> Option<&str> {
        match self {
            ScenegraphNode::Concrete(node) => node.parent.as_deref(),
            ScenegraphNode::Ref(node) => node.parent.as_deref(),
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, ScenegraphNode::Ref(_))
    }

    pub fn as_concrete(&self) -> Option<&ConcreteNode<D>> {
        match self {
            ScenegraphNode::Concrete(node) => Some(node),
            ScenegraphNode::Ref(_) => None,
        }
    }

    pub fn as_concrete_mut(&mut self) -> Option<&mut ConcreteNode<D>> {
        match self {
            ScenegraphNode::Concrete(node) => Some(node),
            ScenegraphNode::Ref(_) => None,
        }
    }

    /// Target id when this is a reference node
    pub fn ref_id(&self) -> Option<&str> {
        match self {
            ScenegraphNode::Concrete(_) => None,
            ScenegraphNode::Ref(node) => Some(&node.ref_id),
        }
    }
}
