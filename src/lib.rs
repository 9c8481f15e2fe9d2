//! Diagram Scenegraph - the constraint-resolution core of a diagram library
//!
//! Callers build a tree of geometric nodes whose positions and sizes are
//! derived by pluggable layout rules. This crate provides the scene store,
//! its ownership-tracked bounding box and transform model, and the
//! reference resolver that lets one node stand in for another.
//!
//! # Example
//!
//! ```rust
//! use diagram_scenegraph::{BBox, Scenegraph};
//!
//! let mut scene: Scenegraph = Scenegraph::new();
//! scene.create_node("root", None);
//! scene.create_node("a", Some("root"));
//! scene.create_node("b", Some("a"));
//! scene.create_ref("c", "b", "root");
//!
//! scene.set_bbox("group", "a", BBox::default().with_left(0.0)).unwrap();
//! scene.set_bbox("layout", "b", BBox::default().with_left(10.0)).unwrap();
//!
//! let bbox = scene.get_bbox("c").unwrap();
//! assert_eq!(bbox.left, Some(10.0));
//! assert_eq!(bbox.top, None);
//! ```

pub mod scene_file;
pub mod scenegraph;

pub use scene_file::{SceneFile, SceneFileError};
pub use scenegraph::{
    Axis, BBox, Change, ChangeKind, ChildView, Diagnostic, DiagnosticCategory, Id, LayoutFn,
    LayoutOutput, Offset, Owned, ResolveMode, Resolved, SceneConfig, SceneError, Scenegraph,
    Transform, WritePolicy,
};

/// Configuration for rendering a scene file to a text listing
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Also list the owner of every owned property
    pub owners: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the owner listing
    pub fn with_owners(mut self, owners: bool) -> Self {
        self.owners = owners;
        self
    }
}

/// A rendered scene: the node listing plus every recoverable problem hit
/// while building it
#[derive(Debug, Clone)]
pub struct Rendered {
    pub listing: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build a TOML scene description and list every node's effective geometry
///
/// # Example
///
/// ```rust
/// use diagram_scenegraph::render;
///
/// let rendered = render(r#"
///     [[node]]
///     id = "root"
///
///     [[write]]
///     owner = "layout"
///     id = "root"
///     width = 40.0
/// "#).unwrap();
///
/// assert_eq!(rendered.listing, "root left=? top=? width=40 height=?\n");
/// assert!(rendered.diagnostics.is_empty());
/// ```
pub fn render(source: &str) -> Result<Rendered, SceneFileError> {
    render_with_config(source, &RenderConfig::default())
}

/// Build a TOML scene description with custom configuration
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<Rendered, SceneFileError> {
    let file = SceneFile::from_str(source)?;
    let mut scene = file.build()?;
    let listing = scene
        .dump(config.owners)
        .map_err(|error| file.scene_error(error))?;

    Ok(Rendered {
        listing,
        diagnostics: scene.take_diagnostics(),
    })
}
