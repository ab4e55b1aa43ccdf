//! Project metadata (`package.json`) parsing.
//!
//! Only the dependency tables are read. Declaration order is kept so that
//! classification and rebuild output are reproducible.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the project metadata file.
pub const MANIFEST_FILE: &str = "package.json";

/// Errors loading the project metadata.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no `package.json` found in `{dir}` or any parent directory")]
    NotFound { dir: PathBuf },

    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{path}`")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{table}` in `{path}` must be an object")]
    InvalidTable { path: PathBuf, table: &'static str },
}

/// A dependency as declared by the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    /// Package name, unique within the project.
    pub name: String,

    /// Version requirement as written.
    pub version_req: String,

    /// Whether the dependency is listed under `optionalDependencies`.
    pub optional: bool,
}

impl DependencyDeclaration {
    /// A required dependency.
    pub fn required(name: impl Into<String>, version_req: impl Into<String>) -> Self {
        DependencyDeclaration {
            name: name.into(),
            version_req: version_req.into(),
            optional: false,
        }
    }

    /// An optional dependency.
    pub fn optional(name: impl Into<String>, version_req: impl Into<String>) -> Self {
        DependencyDeclaration {
            optional: true,
            ..Self::required(name, version_req)
        }
    }
}

/// The parsed dependency tables of a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectManifest {
    dependencies: Map<String, Value>,
    optional_dependencies: Map<String, Value>,
}

impl ProjectManifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse manifest contents. `path` is only used for error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(ProjectManifest {
            dependencies: table(&value, "dependencies", path)?,
            optional_dependencies: table(&value, "optionalDependencies", path)?,
        })
    }

    /// Declared dependencies in declaration order.
    ///
    /// With `include_optional`, entries of `optionalDependencies` follow the
    /// regular ones; a name listed in both keeps its first position.
    pub fn declared_dependencies(&self, include_optional: bool) -> Vec<DependencyDeclaration> {
        let mut merged = self.dependencies.clone();
        if include_optional {
            for (name, req) in &self.optional_dependencies {
                merged.insert(name.clone(), req.clone());
            }
        }

        merged
            .into_iter()
            .map(|(name, req)| DependencyDeclaration {
                optional: self.optional_dependencies.contains_key(&name),
                version_req: version_string(&req),
                name,
            })
            .collect()
    }

    /// Whether `name` is listed under `optionalDependencies`.
    pub fn is_optional(&self, name: &str) -> bool {
        self.optional_dependencies.contains_key(name)
    }
}

/// Find `package.json` starting at `dir` and searching upward.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: dir.to_path_buf(),
            });
        }
    }
}

fn table(
    value: &Value,
    key: &'static str,
    path: &Path,
) -> Result<Map<String, Value>, ManifestError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(ManifestError::InvalidTable {
            path: path.to_path_buf(),
            table: key,
        }),
    }
}

fn version_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
