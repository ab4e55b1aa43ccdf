//! Command implementations

pub mod classify;
pub mod clean;
pub mod completions;
pub mod rebuild;

use std::path::{Path, PathBuf};

use anyhow::Result;

use native_rebuild::util::config::load_config;
use native_rebuild::util::{GlobalContext, RebuildConfig};

/// Locate the project and load its merged configuration.
pub fn load_project(
    ctx: &GlobalContext,
    config_path: Option<&Path>,
) -> Result<(PathBuf, RebuildConfig)> {
    let root = ctx.find_project_root().map_err(|e| {
        anyhow::anyhow!("{}\nhelp: run this command inside a Node project", e)
    })?;

    let project_config = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.project_config_path(&root));
    let global_config = ctx.global_config_path();
    let config = load_config(global_config.as_deref(), &project_config)?;

    Ok((root, config))
}
