//! Recoverable problems reported by the scene store.
//!
//! A rejected write leaves the store in its last valid state and records a
//! [`Diagnostic`] so that callers and tests can observe what was refused.

use std::fmt;

/// A recoverable problem; the operation that produced it became a no-op
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub message: String,
}

impl Diagnostic {
    pub fn new(category: DiagnosticCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.category, self.message)
    }
}

/// Category of recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// A child was attached under a reference node
    RefChild,
    /// A child was attached under an id that does not exist
    UnknownParent,
    /// A bounding box write carried a NaN value
    NaN,
    /// A write targeted a property owned by someone else
    Ownership,
    /// A child view setter was handed no value
    UndefinedWrite,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::RefChild => write!(f, "ref-child"),
            DiagnosticCategory::UnknownParent => write!(f, "unknown-parent"),
            DiagnosticCategory::NaN => write!(f, "nan"),
            DiagnosticCategory::Ownership => write!(f, "ownership"),
            DiagnosticCategory::UndefinedWrite => write!(f, "undefined-write"),
        }
    }
}
