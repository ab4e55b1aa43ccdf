//! Installed-module resolution.
//!
//! Maps a dependency name to the directory it was installed into, the way the
//! running process would find it when loading the module.

pub mod errors;
pub mod node_modules;

pub use errors::ResolveError;
pub use node_modules::NodeModulesResolver;

use std::path::PathBuf;

/// An installed module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Module name.
    pub name: String,

    /// Directory holding the module's `package.json`.
    pub package_dir: PathBuf,

    /// Directory of the module's entry point.
    pub entry_dir: PathBuf,
}

/// Locates installed modules by name.
pub trait ModuleResolver {
    /// Resolve `name` to its installed location.
    fn resolve(&self, name: &str) -> Result<ResolvedModule, ResolveError>;
}
