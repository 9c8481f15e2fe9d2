//! Geometry types shared by the scene store and layout rules

/// Node identifier. Identities are stable strings chosen by the caller.
pub type Id = String;

/// Add two optional values, propagating unknowns
pub fn maybe_add(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? + b?)
}

/// Subtract two optional values, propagating unknowns
pub fn maybe_sub(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

/// Divide an optional value, propagating unknowns
pub fn maybe_div(a: Option<f64>, divisor: f64) -> Option<f64> {
    Some(a? / divisor)
}

/// Sum optional values; any unknown term makes the whole sum unknown
pub fn maybe_add_all(values: &[Option<f64>]) -> Option<f64> {
    values.iter().try_fold(0.0, |acc, v| Some(acc + (*v)?))
}

/// An axis-aligned box whose four fields are resolved independently.
///
/// A missing field means "not yet determined by any layout rule". Derived
/// edges and centers are missing whenever one of their inputs is missing;
/// unknowns are never treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl BBox {
    /// A box with every field known
    pub fn from_rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Set the left edge
    pub fn with_left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    /// Set the top edge
    pub fn with_top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    /// Set the width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> Option<f64> {
        maybe_add(self.left, self.width)
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> Option<f64> {
        maybe_add(self.top, self.height)
    }

    /// Horizontal center
    pub fn center_x(&self) -> Option<f64> {
        maybe_add(self.left, maybe_div(self.width, 2.0))
    }

    /// Vertical center
    pub fn center_y(&self) -> Option<f64> {
        maybe_add(self.top, maybe_div(self.height, 2.0))
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// True when any supplied field is NaN
    pub fn has_nan(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .any(|v| v.is_some_and(f64::is_nan))
    }
}

/// A 2D translation with independently optional components
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl Transform {
    /// A translation with both components known
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// True when neither component is set
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// A fully known translation, as accumulated while following references
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    /// No translation
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    /// Create an offset from its components
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Offset> for Transform {
    fn from(offset: Offset) -> Self {
        Transform::translate(offset.x, offset.y)
    }
}
