//! Per-child geometry views handed to layout rules

use super::diagnostics::DiagnosticCategory;
use super::error::SceneError;
use super::ownership::{Axis, Owned};
use super::types::{BBox, Id};
use super::Scenegraph;

/// A layout rule's handle on one of its children.
///
/// The view stores only the `(owner, child)` pair; every accessor goes
/// through the store, so reads always see the current effective geometry and
/// writes are checked against ownership on behalf of `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildView {
    owner: Id,
    child: Id,
}

impl ChildView {
    /// A view of `child` whose writes are attributed to `owner`
    pub fn new(owner: impl Into<Id>, child: impl Into<Id>) -> Self {
        Self {
            owner: owner.into(),
            child: child.into(),
        }
    }

    /// Id of the child this view reads and writes
    pub fn name(&self) -> &str {
        &self.child
    }

    /// Id writes through this view are attributed to
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Effective bounding box of the child
    pub fn bbox<D>(&self, scene: &mut Scenegraph<D>) -> Result<BBox, SceneError> {
        scene.get_bbox(&self.child)
    }

    /// Effective left edge of the child
    pub fn left<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.left)
    }

    /// Effective top edge of the child
    pub fn top<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.top)
    }

    /// Effective width of the child
    pub fn width<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.width)
    }

    /// Effective height of the child
    pub fn height<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.height)
    }

    /// Effective right edge of the child
    pub fn right<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.right())
    }

    /// Effective bottom edge of the child
    pub fn bottom<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.bottom())
    }

    /// Effective horizontal center of the child
    pub fn center_x<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.center_x())
    }

    /// Effective vertical center of the child
    pub fn center_y<D>(&self, scene: &mut Scenegraph<D>) -> Result<Option<f64>, SceneError> {
        Ok(self.bbox(scene)?.center_y())
    }

    /// Write the child's left; `None` is refused with a diagnostic
    pub fn set_left<D>(&self, scene: &mut Scenegraph<D>, left: Option<f64>) -> Result<(), SceneError> {
        self.set(scene, "left", left, |v| BBox::default().with_left(v))
    }

    /// Write the child's top; `None` is refused with a diagnostic
    pub fn set_top<D>(&self, scene: &mut Scenegraph<D>, top: Option<f64>) -> Result<(), SceneError> {
        self.set(scene, "top", top, |v| BBox::default().with_top(v))
    }

    /// Write the child's width; `None` is refused with a diagnostic
    pub fn set_width<D>(&self, scene: &mut Scenegraph<D>, width: Option<f64>) -> Result<(), SceneError> {
        self.set(scene, "width", width, |v| BBox::default().with_width(v))
    }

    /// Write the child's height; `None` is refused with a diagnostic
    pub fn set_height<D>(&self, scene: &mut Scenegraph<D>, height: Option<f64>) -> Result<(), SceneError> {
        self.set(scene, "height", height, |v| BBox::default().with_height(v))
    }

    fn set<D>(
        &self,
        scene: &mut Scenegraph<D>,
        field: &str,
        value: Option<f64>,
        to_bbox: impl FnOnce(f64) -> BBox,
    ) -> Result<(), SceneError> {
        match value {
            Some(v) => scene.set_bbox(&self.owner, &self.child, to_bbox(v)),
            None => {
                scene.report(
                    DiagnosticCategory::UndefinedWrite,
                    format!("{} tried to set {}'s {} to undefined; skipped", self.owner, self.child, field),
                );
                Ok(())
            }
        }
    }

    /// Ownership flags of the child from this view's owner's perspective
    pub fn owned<D>(&self, scene: &Scenegraph<D>) -> Result<Owned, SceneError> {
        scene.owned(&self.owner, &self.child)
    }

    /// Whether the child's horizontal translate is owned by someone else
    pub fn owned_x<D>(&self, scene: &Scenegraph<D>) -> Result<bool, SceneError> {
        scene.owned_by_other(&self.owner, &self.child, Axis::X)
    }

    /// Whether the child's vertical translate is owned by someone else
    pub fn owned_y<D>(&self, scene: &Scenegraph<D>) -> Result<bool, SceneError> {
        scene.owned_by_other(&self.owner, &self.child, Axis::Y)
    }

    /// Whether the child's width is owned by someone else
    pub fn owned_width<D>(&self, scene: &Scenegraph<D>) -> Result<bool, SceneError> {
        scene.owned_by_other(&self.owner, &self.child, Axis::Width)
    }

    /// Whether the child's height is owned by someone else
    pub fn owned_height<D>(&self, scene: &Scenegraph<D>) -> Result<bool, SceneError> {
        scene.owned_by_other(&self.owner, &self.child, Axis::Height)
    }
}

impl<D> Scenegraph<D> {
    /// A view of `child` whose writes are attributed to `owner`
    pub fn child_view(&self, owner: &str, child: &str) -> ChildView {
        ChildView::new(owner, child)
    }
}
