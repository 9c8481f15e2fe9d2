//! Layout function contract
//!
//! A layout rule reads its children's effective geometry through
//! [`ChildView`]s, may write back through the same views, and returns the
//! geometry of the node it lays out. Scheduling (deciding which rule reruns
//! after a change) belongs to the recomputation layer; [`Scenegraph::apply_layout`]
//! runs one rule synchronously and merges its result.

use super::child::ChildView;
use super::error::SceneError;
use super::types::{BBox, Id, Transform};
use super::Scenegraph;

/// What a layout rule produces for the node it lays out
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutput<D> {
    pub bbox: BBox,
    pub transform: Transform,
    pub custom_data: Option<D>,
}

impl<D> Default for LayoutOutput<D> {
    fn default() -> Self {
        Self {
            bbox: BBox::default(),
            transform: Transform::default(),
            custom_data: None,
        }
    }
}

impl<D> LayoutOutput<D> {
    /// Set the bounding box merged into the laid-out node
    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Set the translate merged into the laid-out node
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the payload stored on the laid-out node
    pub fn with_custom_data(mut self, data: D) -> Self {
        self.custom_data = Some(data);
        self
    }
}

/// A rule that positions children and sizes their parent
pub trait LayoutFn<D> {
    fn layout(
        &mut self,
        scene: &mut Scenegraph<D>,
        children: &[ChildView],
    ) -> Result<LayoutOutput<D>, SceneError>;
}

impl<D, F> LayoutFn<D> for F
where
    F: FnMut(&mut Scenegraph<D>, &[ChildView]) -> Result<LayoutOutput<D>, SceneError>,
{
    fn layout(
        &mut self,
        scene: &mut Scenegraph<D>,
        children: &[ChildView],
    ) -> Result<LayoutOutput<D>, SceneError> {
        self(scene, children)
    }
}

impl<D> Scenegraph<D> {
    /// Run `rule` for node `id` over `children` and merge its output into `id`.
    ///
    /// Writes through the child views and into `id` are all attributed to
    /// `id`.
    pub fn apply_layout<L>(&mut self, id: &str, children: &[Id], rule: &mut L) -> Result<(), SceneError>
    where
        L: LayoutFn<D> + ?Sized,
    {
        let views: Vec<ChildView> = children.iter().map(|c| self.child_view(id, c)).collect();
        let output = rule.layout(self, &views)?;

        if !output.bbox.is_empty() {
            self.set_bbox(id, id, output.bbox)?;
        }
        if !output.transform.is_empty() {
            let resolved = self.resolve_id(id)?;
            self.merge_bbox_and_transform(id, &resolved, BBox::default(), output.transform)?;
        }
        if let Some(data) = output.custom_data {
            self.set_custom_data(id, data)?;
        }
        Ok(())
    }
}
