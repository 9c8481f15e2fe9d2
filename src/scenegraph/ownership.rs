//! Ownership queries

use std::fmt;
use std::str::FromStr;

use super::error::SceneError;
use super::types::Id;
use super::{ConcreteNode, Scenegraph};

/// A property whose ownership can be queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `translate.x`
    X,
    /// `translate.y`
    Y,
    Width,
    Height,
}

impl Axis {
    /// Every queryable axis
    pub fn all() -> &'static [Axis] {
        &[Axis::X, Axis::Y, Axis::Width, Axis::Height]
    }

    fn owner<D>(self, node: &ConcreteNode<D>) -> Option<&Id> {
        match self {
            Axis::X => node.transform_owners.x.as_ref(),
            Axis::Y => node.transform_owners.y.as_ref(),
            Axis::Width => node.bbox_owners.width.as_ref(),
            Axis::Height => node.bbox_owners.height.as_ref(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

impl FromStr for Axis {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "width" => Ok(Axis::Width),
            "height" => Ok(Axis::Height),
            other => Err(SceneError::invalid_axis(other)),
        }
    }
}

/// Which properties of a node are controlled by someone else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Owned {
    pub x: bool,
    pub y: bool,
    pub width: bool,
    pub height: bool,
}

impl<D> Scenegraph<D> {
    /// Whether `axis` of `target` (or the node it refers to) is owned by
    /// someone other than `asker`. Unowned properties are free to claim and
    /// report `false`.
    pub fn owned_by_other(&self, asker: &str, target: &str, axis: Axis) -> Result<bool, SceneError> {
        Ok(self
            .owner_of(target, axis)?
            .is_some_and(|owner| owner != asker))
    }

    /// Like [`owned_by_other`](Self::owned_by_other) with the axis given by name
    pub fn owned_by_other_named(&self, asker: &str, target: &str, axis: &str) -> Result<bool, SceneError> {
        self.owned_by_other(asker, target, axis.parse()?)
    }

    /// Current owner of `axis` on `target` (or the node it refers to)
    pub fn owner_of(&self, target: &str, axis: Axis) -> Result<Option<&str>, SceneError> {
        let resolved = self.resolve_id(target)?;
        let node = self.concrete(&resolved)?;
        Ok(axis.owner(node).map(String::as_str))
    }

    /// Ownership of every queryable property of `target`, from `asker`'s view
    pub fn owned(&self, asker: &str, target: &str) -> Result<Owned, SceneError> {
        Ok(Owned {
            x: self.owned_by_other(asker, target, Axis::X)?,
            y: self.owned_by_other(asker, target, Axis::Y)?,
            width: self.owned_by_other(asker, target, Axis::Width)?,
            height: self.owned_by_other(asker, target, Axis::Height)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenegraph::{BBox, ResolveMode};

    fn scene() -> Scenegraph {
        let mut scene = Scenegraph::new();
        scene.create_node("root", None);
        scene.create_node("n", Some("root"));
        scene.create_node("group", Some("root"));
        scene.create_ref("r", "n", "group");
        scene
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!("height".parse::<Axis>().unwrap(), Axis::Height);
        assert_eq!(
            "depth".parse::<Axis>().unwrap_err(),
            SceneError::invalid_axis("depth")
        );
        for axis in Axis::all() {
            assert_eq!(axis.to_string().parse::<Axis>().unwrap(), *axis);
        }
    }

    #[test]
    fn test_unowned_is_free() {
        let scene = scene();
        assert!(!scene.owned_by_other("me", "n", Axis::Width).unwrap());
        assert_eq!(scene.owned("me", "n").unwrap(), Owned::default());
    }

    #[test]
    fn test_owned_by_self_vs_other() {
        let mut scene = scene();
        scene
            .set_bbox("align", "n", BBox::default().with_left(1.0).with_width(2.0))
            .unwrap();

        assert!(!scene.owned_by_other("align", "n", Axis::X).unwrap());
        assert!(scene.owned_by_other("stack", "n", Axis::X).unwrap());
        assert!(scene.owned_by_other("stack", "n", Axis::Width).unwrap());
        assert!(!scene.owned_by_other("stack", "n", Axis::Height).unwrap());
        assert_eq!(scene.owner_of("n", Axis::Width).unwrap(), Some("align"));
    }

    #[test]
    fn test_query_through_reference_does_not_mutate() {
        let mut scene = scene();
        scene.set_bbox("align", "n", BBox::default().with_height(2.0)).unwrap();

        assert!(scene.owned_by_other("stack", "r", Axis::Height).unwrap());
        assert!(!scene.owned_by_other("stack", "r", Axis::Y).unwrap());
        // check-mode resolution leaves the reference's ancestors alone
        assert_eq!(scene.owner_of("group", Axis::X).unwrap(), None);

        scene.resolve("r", ResolveMode::Write).unwrap();
        assert_eq!(scene.owner_of("group", Axis::X).unwrap(), Some("r"));
    }

    #[test]
    fn test_named_axis() {
        let scene = scene();
        assert!(!scene.owned_by_other_named("me", "n", "y").unwrap());
        assert!(matches!(
            scene.owned_by_other_named("me", "n", "z"),
            Err(SceneError::InvalidAxis { .. })
        ));
    }
}
