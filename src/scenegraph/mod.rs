//! Scene graph store for derived diagram geometry
//!
//! Nodes are created once by the component layer and then filled in,
//! field by field, by layout rules. Every geometric property of a concrete
//! node (`left`, `top`, `width`, `height`, `translate.x`, `translate.y`) has
//! at most one owner: the first writer claims it and writes from anybody
//! else are refused with a [`Diagnostic`].
//!
//! Reference nodes carry no geometry. Reading or writing through one
//! resolves it to its concrete target and reconciles the two coordinate
//! frames along the tree path through their lowest common ancestor (see
//! [`Scenegraph::resolve`]).
//!
//! ## Key Functions
//!
//! - [`Scenegraph::create_node`] / [`Scenegraph::create_ref`]: construction
//! - [`Scenegraph::get_bbox`] / [`Scenegraph::set_bbox`]: effective geometry
//! - [`Scenegraph::owned_by_other`]: ownership queries
//! - [`Scenegraph::child_view`]: the per-child handle layout rules consume

pub mod bbox;
pub mod change;
pub mod child;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod node;
pub mod ownership;
pub mod resolve;
pub mod types;

use std::collections::HashMap;
use std::fmt;

pub use bbox::WritePolicy;
pub use change::{Change, ChangeKind};
pub use child::ChildView;
pub use config::SceneConfig;
pub use diagnostics::{Diagnostic, DiagnosticCategory};
pub use error::SceneError;
pub use layout::{LayoutFn, LayoutOutput};
pub use node::{BBoxOwners, ConcreteNode, RefNode, ScenegraphNode, TransformOwners};
pub use ownership::{Axis, Owned};
pub use resolve::{ResolveMode, Resolved};
pub use types::*;

type Observer = Box<dyn FnMut(&Change)>;

/// The scene graph: nodes by id plus the bookkeeping around them.
///
/// `D` is the payload type the rendering layer stores on concrete nodes; the
/// store never inspects it.
pub struct Scenegraph<D = ()> {
    nodes: HashMap<Id, ScenegraphNode<D>>,
    /// Ids in creation order
    order: Vec<Id>,
    config: SceneConfig,
    diagnostics: Vec<Diagnostic>,
    /// Ids changed since the last `take_dirty`, in the order first marked
    dirty: Vec<Id>,
    observers: Vec<Observer>,
}

impl<D> Default for Scenegraph<D> {
    fn default() -> Self {
        Self::with_config(SceneConfig::default())
    }
}

impl<D: fmt::Debug> fmt::Debug for Scenegraph<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenegraph")
            .field("nodes", &self.nodes)
            .field("order", &self.order)
            .field("config", &self.config)
            .field("diagnostics", &self.diagnostics)
            .field("dirty", &self.dirty)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<D> Scenegraph<D> {
    /// Create an empty scene graph with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene graph with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            config,
            diagnostics: Vec::new(),
            dirty: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Get the active configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Insert a concrete node with empty geometry under `parent`.
    ///
    /// A parent that is a reference node, or that does not exist, is reported
    /// as a diagnostic and the node is inserted as a detached root.
    /// Re-creating an existing id overwrites it and moves it under the new
    /// parent.
    pub fn create_node(&mut self, id: &str, parent: Option<&str>) {
        let parent = parent.and_then(|p| self.checked_parent(id, p));
        self.insert(id, ScenegraphNode::Concrete(ConcreteNode::new(parent)));
    }

    /// Insert a reference node standing in for `ref_id`, registered under
    /// `parent` with the same restrictions as [`create_node`](Self::create_node).
    ///
    /// The target is not checked here; it only has to exist by the time the
    /// reference is resolved.
    pub fn create_ref(&mut self, id: &str, ref_id: &str, parent: &str) {
        let parent = self.checked_parent(id, parent);
        self.insert(
            id,
            ScenegraphNode::Ref(RefNode {
                ref_id: ref_id.to_string(),
                parent,
            }),
        );
    }

    /// Validate a prospective parent, reporting why it cannot take children
    fn checked_parent(&mut self, id: &str, parent: &str) -> Option<Id> {
        match self.nodes.get(parent) {
            Some(ScenegraphNode::Concrete(_)) => Some(parent.to_string()),
            Some(ScenegraphNode::Ref(_)) => {
                self.report(
                    DiagnosticCategory::RefChild,
                    format!("cannot add '{id}' as a child of reference node '{parent}'"),
                );
                None
            }
            None => {
                self.report(
                    DiagnosticCategory::UnknownParent,
                    format!("parent '{parent}' of '{id}' does not exist; '{id}' is a detached root"),
                );
                None
            }
        }
    }

    fn insert(&mut self, id: &str, node: ScenegraphNode<D>) {
        let parent = node.parent().map(str::to_string);
        match self.nodes.insert(id.to_string(), node) {
            None => self.order.push(id.to_string()),
            Some(previous) => {
                let old_parent = previous.parent().map(str::to_string);
                if let Some(old_parent) = old_parent.filter(|p| Some(p) != parent.as_ref()) {
                    self.detach(&old_parent, id);
                }
            }
        }

        if let Some(parent) = parent {
            if let Some(ScenegraphNode::Concrete(p)) = self.nodes.get_mut(&parent) {
                if !p.children.iter().any(|c| c == id) {
                    p.children.push(id.to_string());
                }
            }
            self.mark(&parent, ChangeKind::Structure);
        }
        self.mark(id, ChangeKind::Structure);
    }

    /// Drop `id` from the children of its former parent
    fn detach(&mut self, parent: &str, id: &str) {
        if let Some(ScenegraphNode::Concrete(p)) = self.nodes.get_mut(parent) {
            p.children.retain(|c| c != id);
        }
        self.mark(parent, ChangeKind::Structure);
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Raw node stored under `id`
    pub fn node(&self, id: &str) -> Option<&ScenegraphNode<D>> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Children of `id` in insertion order; reference nodes have none
    pub fn children(&self, id: &str) -> Result<&[Id], SceneError> {
        match self.nodes.get(id) {
            Some(ScenegraphNode::Concrete(node)) => Ok(&node.children),
            Some(ScenegraphNode::Ref(_)) => Ok(&[]),
            None => Err(SceneError::not_found(id)),
        }
    }

    /// Parent of `id`; `None` for roots and detached nodes
    pub fn parent(&self, id: &str) -> Result<Option<&str>, SceneError> {
        self.nodes
            .get(id)
            .map(ScenegraphNode::parent)
            .ok_or_else(|| SceneError::not_found(id))
    }

    pub(crate) fn concrete(&self, id: &str) -> Result<&ConcreteNode<D>, SceneError> {
        match self.nodes.get(id) {
            Some(ScenegraphNode::Concrete(node)) => Ok(node),
            Some(ScenegraphNode::Ref(_)) => Err(SceneError::NotConcrete { id: id.to_string() }),
            None => Err(SceneError::not_found(id)),
        }
    }

    pub(crate) fn concrete_mut(&mut self, id: &str) -> Result<&mut ConcreteNode<D>, SceneError> {
        match self.nodes.get_mut(id) {
            Some(ScenegraphNode::Concrete(node)) => Ok(node),
            Some(ScenegraphNode::Ref(_)) => Err(SceneError::NotConcrete { id: id.to_string() }),
            None => Err(SceneError::not_found(id)),
        }
    }

    // ========================================================================
    // Diagnostics and change notification
    // ========================================================================

    /// Recoverable problems recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the recorded diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn report(&mut self, category: DiagnosticCategory, message: String) {
        if self.config.log_diagnostics {
            tracing::warn!(%category, "{}", message);
        }
        self.diagnostics.push(Diagnostic::new(category, message));
    }

    /// Register an observer called after every change to the store
    pub fn subscribe(&mut self, observer: impl FnMut(&Change) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Drain the ids changed since the last call, in the order first marked
    pub fn take_dirty(&mut self) -> Vec<Id> {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark(&mut self, id: &str, kind: ChangeKind) {
        if !self.dirty.iter().any(|d| d == id) {
            self.dirty.push(id.to_string());
        }
        let change = Change {
            id: id.to_string(),
            kind,
        };
        for observer in &mut self.observers {
            observer(&change);
        }
    }

    // ========================================================================
    // Dump
    // ========================================================================

    /// Render every node's effective bounding box, one line per node in
    /// creation order. Unknown values print as `?`.
    ///
    /// Reading goes through [`get_bbox`](Self::get_bbox), so it may
    /// materialize default transforms exactly like any other read.
    pub fn dump(&mut self, with_owners: bool) -> Result<String, SceneError> {
        let mut out = String::new();
        for id in self.order.clone() {
            let bbox = self.get_bbox(&id)?;
            out.push_str(&format!(
                "{} left={} top={} width={} height={}",
                id,
                fmt_value(bbox.left),
                fmt_value(bbox.top),
                fmt_value(bbox.width),
                fmt_value(bbox.height),
            ));
            match self.nodes.get(&id) {
                Some(ScenegraphNode::Ref(r)) => {
                    out.push_str(&format!(" (ref -> {})", r.ref_id));
                }
                Some(ScenegraphNode::Concrete(node)) if with_owners => {
                    let owners = fmt_owners(node);
                    if !owners.is_empty() {
                        out.push_str(&format!("\n  owners: {}", owners));
                    }
                }
                _ => {}
            }
            out.push('\n');
        }
        Ok(out)
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn fmt_owners<D>(node: &ConcreteNode<D>) -> String {
    [
        ("left", &node.bbox_owners.left),
        ("top", &node.bbox_owners.top),
        ("width", &node.bbox_owners.width),
        ("height", &node.bbox_owners.height),
        ("x", &node.transform_owners.x),
        ("y", &node.transform_owners.y),
    ]
    .iter()
    .filter_map(|(field, owner)| owner.as_ref().map(|o| format!("{}={}", field, o)))
    .collect::<Vec<_>>()
    .join(" ")
}
