//! Artifact pairs produced by a rebuild.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::fs::file_name_string;

/// An artifact pair could not be formed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("{role} artifact `{path}` does not exist")]
    Missing { role: &'static str, path: PathBuf },
}

/// The two binaries built for one native module.
///
/// Both files exist on disk when the pair is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    runtime: PathBuf,
    target: PathBuf,
}

impl ArtifactPair {
    /// Pair a runtime-ABI binary with its target-ABI rebuild.
    pub fn new(
        runtime: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Result<Self, ArtifactError> {
        let runtime = runtime.into();
        let target = target.into();

        for (role, path) in [("runtime", &runtime), ("target", &target)] {
            if !path.is_file() {
                return Err(ArtifactError::Missing {
                    role,
                    path: path.clone(),
                });
            }
        }

        Ok(ArtifactPair { runtime, target })
    }

    /// Binary loadable by the development runtime.
    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    /// Binary loadable by the deployment runtime.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// File name the running process requests; the substitution map key.
    pub fn runtime_file_name(&self) -> String {
        file_name_string(&self.runtime).unwrap_or_default()
    }

    /// File name of the target-ABI binary.
    pub fn target_file_name(&self) -> String {
        file_name_string(&self.target).unwrap_or_default()
    }
}

/// An artifact pair scheduled for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    /// The built binaries.
    pub pair: ArtifactPair,

    /// Dependency name or user module source, for messages.
    pub origin: String,

    /// Output sub-path; `None` uses the configured default.
    pub output_path: Option<String>,
}

impl PlannedArtifact {
    /// An artifact routed to the default output sub-path.
    pub fn new(pair: ArtifactPair, origin: impl Into<String>) -> Self {
        PlannedArtifact {
            pair,
            origin: origin.into(),
            output_path: None,
        }
    }

    /// Route the artifact to an explicit output sub-path.
    pub fn with_output_path(mut self, output_path: impl Into<String>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pair_requires_both_files() {
        let tmp = TempDir::new().unwrap();
        let runtime = tmp.path().join("addon.node");
        let target = tmp.path().join("bin/addon.node");
        std::fs::write(&runtime, "node").unwrap();

        let err = ArtifactPair::new(&runtime, &target).unwrap_err();
        assert_eq!(
            err,
            ArtifactError::Missing {
                role: "target",
                path: target.clone()
            }
        );

        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "electron").unwrap();
        let pair = ArtifactPair::new(&runtime, &target).unwrap();
        assert_eq!(pair.runtime_file_name(), "addon.node");
        assert_eq!(pair.target(), target.as_path());
    }

    #[test]
    fn test_pair_rejects_directories() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("addon.node");
        std::fs::write(&file, "").unwrap();

        assert!(matches!(
            ArtifactPair::new(tmp.path(), &file),
            Err(ArtifactError::Missing { role: "runtime", .. })
        ));
    }
}
