//! Resolution error types.

use std::path::PathBuf;

use thiserror::Error;

/// Error resolving an installed module.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("module `{name}` is not installed")]
    NotInstalled { name: String },

    #[error("module `{name}` is installed at `{}` but unusable: {message}", .path.display())]
    InvalidPackage {
        name: String,
        path: PathBuf,
        message: String,
    },
}

impl ResolveError {
    /// Whether the module is simply absent, as opposed to broken.
    pub fn is_not_installed(&self) -> bool {
        matches!(self, ResolveError::NotInstalled { .. })
    }
}
