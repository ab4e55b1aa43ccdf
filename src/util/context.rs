//! Global context for a run.
//!
//! Provides centralized access to the working directory and the paths derived
//! from it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, ManifestError};
use crate::ops::substitution::SUBSTITUTION_MAP_FILE;
use crate::util::config::{global_config_path, PROJECT_CONFIG_FILE};

/// Global context containing paths and output settings.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext {
            cwd,
            verbose: false,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            verbose: false,
        }
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find the project root (directory containing `package.json`), searching upward.
    pub fn find_project_root(&self) -> Result<PathBuf, ManifestError> {
        let manifest = find_manifest(&self.cwd)?;
        Ok(manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone()))
    }

    /// Project configuration file for `project_root`.
    pub fn project_config_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_CONFIG_FILE)
    }

    /// Global configuration file, if a home directory is known.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        global_config_path()
    }

    /// Where the substitution map is written.
    pub fn substitution_map_path(&self) -> PathBuf {
        self.cwd.join(SUBSTITUTION_MAP_FILE)
    }
}
