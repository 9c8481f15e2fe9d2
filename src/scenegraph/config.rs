//! Configuration for the scene store

use serde::Deserialize;

/// Configuration options for reference resolution and diagnostics
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Longest reference chain the resolver will follow. With the default of
    /// 1, a reference whose target is itself a reference is rejected.
    pub max_reference_depth: usize,

    /// Also emit recoverable diagnostics through `tracing`
    pub log_diagnostics: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_reference_depth: 1,
            log_diagnostics: true,
        }
    }
}

impl SceneConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum reference chain length (clamped to at least 1)
    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth.max(1);
        self
    }

    /// Enable or disable diagnostic logging
    pub fn with_log_diagnostics(mut self, enabled: bool) -> Self {
        self.log_diagnostics = enabled;
        self
    }
}
