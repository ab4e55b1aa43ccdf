//! native-rebuild - rebuild native Node add-ons for Electron
//!
//! Finds the native add-ons among a project's declared dependencies, rebuilds
//! each one against the Electron ABI, copies the rebuilt binaries into the
//! build output and records where each one went in a substitution map that a
//! bundler uses to redirect load paths.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Provides a recording command runner, a stub module builder and fixtures for
/// fake projects with installed `node_modules`.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    ArtifactPair, DependencyDeclaration, ModuleDescriptor, PlannedArtifact, ProjectManifest,
    SubstitutionMap,
};
pub use ops::{rebuild_native_modules, RebuildReport, RebuildSession};
pub use resolver::{ModuleResolver, NodeModulesResolver};
pub use util::context::GlobalContext;
