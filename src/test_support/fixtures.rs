//! Test fixtures for fake projects.
//!
//! A [`ProjectFixture`] describes a project's `package.json` plus whatever is
//! installed in its `node_modules`, and writes it into a temporary directory.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use crate::core::manifest::MANIFEST_FILE;
use crate::core::ProjectManifest;

/// Fixture for a project with installed modules.
#[derive(Debug, Clone, Default)]
pub struct ProjectFixture {
    dependencies: Map<String, Value>,
    optional_dependencies: Map<String, Value>,
    /// Files relative to the project root, with contents.
    files: Vec<(PathBuf, String)>,
}

impl ProjectFixture {
    /// Create an empty project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a dependency.
    pub fn dependency(mut self, name: &str, req: &str) -> Self {
        self.dependencies.insert(name.to_string(), json!(req));
        self
    }

    /// Declare an optional dependency.
    pub fn optional_dependency(mut self, name: &str, req: &str) -> Self {
        self.optional_dependencies
            .insert(name.to_string(), json!(req));
        self
    }

    /// Install a module whose own build left `build/Release/<binary>`.
    pub fn native_module(self, name: &str, binary: &str) -> Self {
        self.raw_module(name, &format!(r#"{{"name": "{}"}}"#, name))
            .file(
                &format!("node_modules/{}/build/Release/{}", name, binary),
                "runtime-abi",
            )
    }

    /// Install a pure script module.
    pub fn script_module(self, name: &str) -> Self {
        self.raw_module(name, &format!(r#"{{"name": "{}"}}"#, name))
            .file(
                &format!("node_modules/{}/index.js", name),
                "module.exports = {};",
            )
    }

    /// Install a module with the given `package.json` contents.
    pub fn raw_module(self, name: &str, manifest: &str) -> Self {
        self.file(
            &format!("node_modules/{}/{}", name, MANIFEST_FILE),
            manifest,
        )
    }

    /// Add an arbitrary file.
    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.files.push((PathBuf::from(path), contents.to_string()));
        self
    }

    /// The `package.json` this fixture writes.
    pub fn manifest_json(&self) -> String {
        let value = json!({
            "name": "fixture-app",
            "version": "1.0.0",
            "dependencies": self.dependencies,
            "optionalDependencies": self.optional_dependencies,
        });
        serde_json::to_string_pretty(&value).unwrap()
    }

    /// Write the project into a fresh temporary directory.
    pub fn write(&self) -> WrittenProject {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILE), self.manifest_json()).unwrap();

        for (path, contents) in &self.files {
            let full = tmp.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, contents).unwrap();
        }

        WrittenProject { tmp }
    }
}

/// A fixture written to disk. The directory is removed on drop.
pub struct WrittenProject {
    tmp: TempDir,
}

impl WrittenProject {
    /// Project root.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Installed directory of module `name`.
    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.root().join("node_modules").join(name)
    }

    /// The project's parsed manifest.
    pub fn manifest(&self) -> ProjectManifest {
        ProjectManifest::load(&self.root().join(MANIFEST_FILE)).unwrap()
    }
}
