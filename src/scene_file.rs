//! TOML scene descriptions
//!
//! A scene file declares nodes in creation order and a sequence of bounding
//! box writes to replay through [`Scenegraph::set_bbox`]:
//!
//! ```toml
//! [engine]
//! max_reference_depth = 1
//!
//! [[node]]
//! id = "root"
//!
//! [[node]]
//! id = "label"
//! parent = "root"
//! data = "Global Frame"
//!
//! [[node]]
//! id = "label_ref"
//! parent = "root"
//! ref = "label"
//!
//! [[write]]
//! owner = "align"
//! id = "label_ref"
//! left = 10.0
//! ```

use std::path::Path;

use ariadne::{Color, Label, Report, ReportKind, Source};
use serde::Deserialize;
use thiserror::Error;
use toml::Spanned;

use crate::scenegraph::{BBox, SceneConfig, SceneError, Scenegraph};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors that can occur when loading or building a scene file
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid scene: {message}")]
    Invalid { message: String, span: Span },

    #[error("scene error: {error}")]
    Scene {
        #[source]
        error: SceneError,
        span: Span,
    },
}

impl SceneFileError {
    /// Source span the error points at, if any
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Io(_) => None,
            Self::Toml(e) => e.span(),
            Self::Invalid { span, .. } | Self::Scene { span, .. } => Some(span.clone()),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = match self {
            Self::Io(_) => return self.to_string(),
            Self::Toml(e) => e.message().to_string(),
            Self::Invalid { message, .. } => message.clone(),
            Self::Scene { error, .. } => error.to_string(),
        };
        let span = self.span().unwrap_or(0..0);

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// A parsed scene file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub engine: SceneConfig,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeDecl>,
    #[serde(default, rename = "write")]
    pub writes: Vec<WriteDecl>,
}

/// A `[[node]]` entry; a `ref` key makes it a reference node
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDecl {
    pub id: Spanned<String>,
    pub parent: Option<String>,
    #[serde(rename = "ref")]
    pub ref_id: Option<String>,
    /// Payload stored on the node (or the node it refers to)
    pub data: Option<String>,
}

/// A `[[write]]` entry replayed through `set_bbox`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteDecl {
    pub owner: String,
    pub id: Spanned<String>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl WriteDecl {
    pub fn bbox(&self) -> BBox {
        BBox {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        }
    }
}

impl SceneFile {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneFileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scene from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SceneFileError> {
        Ok(toml::from_str(content)?)
    }

    /// Span of the declaration that last created `id`
    pub fn span_of(&self, id: &str) -> Option<Span> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.id.get_ref() == id)
            .map(|n| n.id.span())
    }

    /// Wrap a store error, pointing at the declaration of the node it names
    pub fn scene_error(&self, error: SceneError) -> SceneFileError {
        let span = error.node_id().and_then(|id| self.span_of(id)).unwrap_or(0..0);
        SceneFileError::Scene { error, span }
    }

    /// Create every node, check that every reference resolves, attach
    /// payloads, then replay the writes in order.
    ///
    /// Recoverable problems end up in the returned scene's diagnostics.
    pub fn build(&self) -> Result<Scenegraph<String>, SceneFileError> {
        let mut scene = Scenegraph::with_config(self.engine.clone());

        for node in &self.nodes {
            let id = node.id.get_ref();
            match &node.ref_id {
                Some(target) => {
                    let parent = node.parent.as_deref().ok_or_else(|| SceneFileError::Invalid {
                        message: format!("reference node '{}' needs a parent", id),
                        span: node.id.span(),
                    })?;
                    scene.create_ref(id, target, parent);
                }
                None => scene.create_node(id, node.parent.as_deref()),
            }
        }

        for node in self.nodes.iter().filter(|n| n.ref_id.is_some()) {
            scene
                .resolve_id(node.id.get_ref())
                .map_err(|error| SceneFileError::Scene {
                    error,
                    span: node.id.span(),
                })?;
        }

        for node in &self.nodes {
            if let Some(data) = &node.data {
                scene
                    .set_custom_data(node.id.get_ref(), data.clone())
                    .map_err(|error| SceneFileError::Scene {
                        error,
                        span: node.id.span(),
                    })?;
            }
        }

        for write in &self.writes {
            scene
                .set_bbox(&write.owner, write.id.get_ref(), write.bbox())
                .map_err(|error| SceneFileError::Scene {
                    error,
                    span: write.id.span(),
                })?;
        }

        Ok(scene)
    }
}
