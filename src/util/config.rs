//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.native-rebuild/config.toml` - User-wide defaults
//! - Project: `native-rebuild.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::module::{ModuleDescriptor, UserModuleSpec};

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILE: &str = "native-rebuild.toml";

/// Default rebuild tool, invoked once per native dependency.
pub const DEFAULT_REBUILD_TOOL: &str = "electron-rebuild";

/// Default compiler driver for user modules.
pub const DEFAULT_NODE_GYP: &str = "node-gyp";

/// Default output sub-path for artifacts without an explicit override.
pub const DEFAULT_OUTPUT_PATH: &str = "./";

/// Default output root when the build does not configure one.
pub const DEFAULT_OUTPUT_DIR: &str = "./dist";

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("user module #{index} has an empty `source`")]
    EmptyModuleSource { index: usize },
}

/// Per-run rebuild configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RebuildConfig {
    /// Pass the force flag to the rebuild tool.
    pub force_rebuild: Option<bool>,

    /// Default output sub-path, relative to the output root.
    pub output_path: Option<String>,

    /// Python interpreter forwarded to the rebuild tool environment.
    pub python_path: Option<PathBuf>,

    /// Build debug binaries.
    pub debug_build: Option<bool>,

    /// Let the rebuild tool parallelize its own work.
    pub parallel_build: Option<bool>,

    /// Native modules built from source in this project.
    pub user_modules: Vec<UserModuleSpec>,

    /// Also scan `optionalDependencies` for native modules.
    pub optional_dependencies: Option<bool>,

    /// Rebuild tool executable.
    pub rebuild_tool: Option<String>,

    /// node-gyp executable used for user modules.
    pub node_gyp: Option<String>,

    /// Electron version user modules are built against.
    pub electron_version: Option<String>,

    /// Output root the artifacts are copied into.
    pub output_dir: Option<PathBuf>,
}

impl RebuildConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: RebuildConfig) {
        if other.force_rebuild.is_some() {
            self.force_rebuild = other.force_rebuild;
        }
        if other.output_path.is_some() {
            self.output_path = other.output_path;
        }
        if other.python_path.is_some() {
            self.python_path = other.python_path;
        }
        if other.debug_build.is_some() {
            self.debug_build = other.debug_build;
        }
        if other.parallel_build.is_some() {
            self.parallel_build = other.parallel_build;
        }
        if !other.user_modules.is_empty() {
            self.user_modules = other.user_modules;
        }
        if other.optional_dependencies.is_some() {
            self.optional_dependencies = other.optional_dependencies;
        }
        if other.rebuild_tool.is_some() {
            self.rebuild_tool = other.rebuild_tool;
        }
        if other.node_gyp.is_some() {
            self.node_gyp = other.node_gyp;
        }
        if other.electron_version.is_some() {
            self.electron_version = other.electron_version;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
    }

    /// Whether to pass the force flag.
    pub fn force_rebuild(&self) -> bool {
        self.force_rebuild.unwrap_or(false)
    }

    /// Whether to build debug binaries.
    pub fn debug_build(&self) -> bool {
        self.debug_build.unwrap_or(false)
    }

    /// Whether the rebuild tool may parallelize.
    pub fn parallel_build(&self) -> bool {
        self.parallel_build.unwrap_or(false)
    }

    /// Whether `optionalDependencies` are scanned too.
    pub fn optional_dependencies(&self) -> bool {
        self.optional_dependencies.unwrap_or(false)
    }

    /// Default output sub-path.
    pub fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    /// Rebuild tool name or path.
    pub fn rebuild_tool(&self) -> &str {
        self.rebuild_tool.as_deref().unwrap_or(DEFAULT_REBUILD_TOOL)
    }

    /// node-gyp name or path.
    pub fn node_gyp(&self) -> &str {
        self.node_gyp.as_deref().unwrap_or(DEFAULT_NODE_GYP)
    }

    /// Output root, relative paths resolved against `base`.
    pub fn output_dir(&self, base: &Path) -> PathBuf {
        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        if dir.is_absolute() {
            dir
        } else {
            base.join(dir)
        }
    }

    /// Validate user modules and fill in their defaults.
    ///
    /// A module without its own `outputPath` inherits the global one.
    pub fn resolved_user_modules(&self) -> Result<Vec<ModuleDescriptor>, ConfigError> {
        self.user_modules
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let source = spec.source();
                if source.trim().is_empty() {
                    return Err(ConfigError::EmptyModuleSource { index });
                }
                Ok(ModuleDescriptor {
                    source: source.to_string(),
                    output_path: spec
                        .output_path()
                        .unwrap_or_else(|| self.output_path())
                        .to_string(),
                    debug_build: spec.debug_build(),
                })
            })
            .collect()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`native-rebuild.toml`)
/// 2. Global config (`~/.native-rebuild/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<RebuildConfig> {
    let mut config = RebuildConfig::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            match RebuildConfig::load(global_path) {
                Ok(global) => config.merge(global),
                Err(e) => tracing::warn!("ignoring global config: {:#}", e),
            }
        }
    }

    // A broken project config is an error, unlike the global one.
    config.merge(RebuildConfig::load_or_default(project_path)?);

    Ok(config)
}

/// Get the global config directory (`~/.native-rebuild`).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".native-rebuild"))
}

/// Get the global config path (`~/.native-rebuild/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}
