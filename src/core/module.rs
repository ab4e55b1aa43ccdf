//! User module descriptors.

use serde::{Deserialize, Serialize};

/// A user module as written in configuration.
///
/// Either a bare source path or a table with overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserModuleSpec {
    /// Just the source directory.
    Source(String),

    /// Source directory with optional overrides.
    #[serde(rename_all = "camelCase")]
    Detailed {
        source: String,
        #[serde(default)]
        output_path: Option<String>,
        #[serde(default)]
        debug_build: Option<bool>,
    },
}

impl UserModuleSpec {
    /// Source directory of the module.
    pub fn source(&self) -> &str {
        match self {
            UserModuleSpec::Source(source) => source,
            UserModuleSpec::Detailed { source, .. } => source,
        }
    }

    /// Explicit output sub-path, if any.
    pub fn output_path(&self) -> Option<&str> {
        match self {
            UserModuleSpec::Source(_) => None,
            UserModuleSpec::Detailed { output_path, .. } => output_path.as_deref(),
        }
    }

    /// Debug-build override, if any.
    pub fn debug_build(&self) -> Option<bool> {
        match self {
            UserModuleSpec::Source(_) => None,
            UserModuleSpec::Detailed { debug_build, .. } => *debug_build,
        }
    }
}

/// A validated user module with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Source directory, relative to the project root.
    pub source: String,

    /// Output sub-path under the output root.
    pub output_path: String,

    /// Debug-build override; `None` inherits the global setting.
    pub debug_build: Option<bool>,
}

impl ModuleDescriptor {
    /// Create a descriptor with no debug override.
    pub fn new(source: impl Into<String>, output_path: impl Into<String>) -> Self {
        ModuleDescriptor {
            source: source.into(),
            output_path: output_path.into(),
            debug_build: None,
        }
    }

    /// Set the debug-build override.
    pub fn with_debug_build(mut self, debug: bool) -> Self {
        self.debug_build = Some(debug);
        self
    }

    /// Whether to build debug binaries, given the global setting.
    pub fn is_debug(&self, global_debug: bool) -> bool {
        self.debug_build.unwrap_or(global_debug)
    }
}
