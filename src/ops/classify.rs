//! Dependency classification.
//!
//! Sorts the declared dependencies into those that need a native rebuild and
//! those that are skipped. Resolution problems never abort the run: the
//! affected dependency is skipped and a warning is logged.

use crate::core::DependencyDeclaration;
use crate::resolver::{ModuleResolver, ResolveError};
use crate::util::fs::{search, NATIVE_EXTENSION};

/// Why a dependency was left out of the rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Listed as optional and not installed.
    OptionalNotInstalled,

    /// Could not be resolved; the project configuration needs fixing.
    Unresolved(ResolveError),
}

/// A dependency that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDependency {
    pub name: String,
    pub reason: SkipReason,
}

/// Outcome of classifying a project's dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Native dependencies to rebuild, in declaration order.
    pub rebuild: Vec<String>,

    /// Dependencies skipped because they could not be resolved.
    pub skipped: Vec<SkippedDependency>,

    /// Installed dependencies without native binaries.
    pub non_native: Vec<String>,
}

impl Classification {
    /// Whether `name` is scheduled for a rebuild.
    pub fn needs_rebuild(&self, name: &str) -> bool {
        self.rebuild.iter().any(|n| n == name)
    }
}

/// Classify `dependencies` using `resolver`.
///
/// A dependency is native iff at least one `.node` file exists under its
/// resolved entry directory.
pub fn classify(
    dependencies: &[DependencyDeclaration],
    resolver: &dyn ModuleResolver,
) -> Classification {
    let mut result = Classification::default();

    for dep in dependencies {
        let resolved = match resolver.resolve(&dep.name) {
            Ok(resolved) => resolved,
            Err(err) if dep.optional && err.is_not_installed() => {
                tracing::warn!(
                    "module `{}`, configured as optional, not found; skipped",
                    dep.name
                );
                result.skipped.push(SkippedDependency {
                    name: dep.name.clone(),
                    reason: SkipReason::OptionalNotInstalled,
                });
                continue;
            }
            Err(err) => {
                tracing::error!("{}; check your dependencies", err);
                result.skipped.push(SkippedDependency {
                    name: dep.name.clone(),
                    reason: SkipReason::Unresolved(err),
                });
                continue;
            }
        };

        if search(&resolved.entry_dir, NATIVE_EXTENSION).is_empty() {
            tracing::debug!("`{}` has no native binaries", dep.name);
            result.non_native.push(dep.name.clone());
        } else {
            tracing::debug!("`{}` is native", dep.name);
            result.rebuild.push(dep.name.clone());
        }
    }

    result
}
