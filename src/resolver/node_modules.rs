//! `node_modules` lookup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::manifest::MANIFEST_FILE;
use crate::resolver::{ModuleResolver, ResolveError, ResolvedModule};

/// Resolves modules from `node_modules` directories.
///
/// Starting at `base`, each ancestor's `node_modules/<name>` is tried in turn.
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
    base: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct PackageEntry {
    #[serde(default)]
    main: Option<String>,
}

impl NodeModulesResolver {
    /// Create a resolver rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        NodeModulesResolver { base: base.into() }
    }

    fn find_package_dir(&self, name: &str) -> Option<PathBuf> {
        self.base
            .ancestors()
            .map(|dir| dir.join("node_modules").join(name))
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
    }
}

impl ModuleResolver for NodeModulesResolver {
    fn resolve(&self, name: &str) -> Result<ResolvedModule, ResolveError> {
        let package_dir =
            self.find_package_dir(name)
                .ok_or_else(|| ResolveError::NotInstalled {
                    name: name.to_string(),
                })?;

        let manifest_path = package_dir.join(MANIFEST_FILE);
        let invalid = |message: String| ResolveError::InvalidPackage {
            name: name.to_string(),
            path: manifest_path.clone(),
            message,
        };

        let contents = std::fs::read_to_string(&manifest_path).map_err(|e| invalid(e.to_string()))?;
        let entry: PackageEntry =
            serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;

        let entry_dir = match entry.main.as_deref() {
            Some(main) if !main.trim().is_empty() => entry_dir_for(&package_dir, main),
            _ => package_dir.clone(),
        };

        Ok(ResolvedModule {
            name: name.to_string(),
            package_dir,
            entry_dir,
        })
    }
}

/// Directory of the entry file `main`, which may name a file or a directory.
fn entry_dir_for(package_dir: &Path, main: &str) -> PathBuf {
    let main_path = package_dir.join(main);
    if main_path.is_dir() {
        return main_path;
    }
    main_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| package_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn install(root: &Path, name: &str, manifest: &str) -> PathBuf {
        let dir = root.join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
        dir
    }

    #[test]
    fn test_resolve_default_entry() {
        let tmp = TempDir::new().unwrap();
        let dir = install(tmp.path(), "bcrypt", r#"{"name": "bcrypt"}"#);

        let resolved = NodeModulesResolver::new(tmp.path()).resolve("bcrypt").unwrap();
        assert_eq!(resolved.package_dir, dir);
        assert_eq!(resolved.entry_dir, dir);
    }

    #[test]
    fn test_resolve_nested_main() {
        let tmp = TempDir::new().unwrap();
        let dir = install(
            tmp.path(),
            "sqlite3",
            r#"{"name": "sqlite3", "main": "./lib/sqlite3.js"}"#,
        );

        let resolved = NodeModulesResolver::new(tmp.path()).resolve("sqlite3").unwrap();
        assert_eq!(resolved.entry_dir, dir.join("./lib"));
    }

    #[test]
    fn test_resolve_scoped_and_parent() {
        let tmp = TempDir::new().unwrap();
        let dir = install(tmp.path(), "@serialport/bindings", "{}");
        let nested = tmp.path().join("packages/app");
        fs::create_dir_all(&nested).unwrap();

        let resolved = NodeModulesResolver::new(&nested)
            .resolve("@serialport/bindings")
            .unwrap();
        assert_eq!(resolved.package_dir, dir);
    }

    #[test]
    fn test_not_installed() {
        let tmp = TempDir::new().unwrap();
        let err = NodeModulesResolver::new(tmp.path())
            .resolve("definitely-not-installed-module")
            .unwrap_err();
        assert!(err.is_not_installed());
    }

    #[test]
    fn test_invalid_package() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "broken", "{ nope");

        let err = NodeModulesResolver::new(tmp.path())
            .resolve("broken")
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPackage { .. }));
        assert!(!err.is_not_installed());
    }
}
