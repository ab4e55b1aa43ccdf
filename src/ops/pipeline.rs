//! The full rebuild run.
//!
//! Phases run strictly one after another: classify the declared dependencies,
//! rebuild the native ones, build user modules, copy everything into the
//! output tree, then write the substitution map. Any failure after
//! classification aborts the run before the map is written.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::manifest::MANIFEST_FILE;
use crate::core::{ProjectManifest, SubstitutionMap};
use crate::ops::classify::{classify, Classification};
use crate::ops::rebuild::{rebuild_all, RebuildFlags, RebuildOptions};
use crate::ops::reconcile::reconcile;
use crate::ops::substitution::write_substitution_map;
use crate::ops::user_modules::{build_user_modules, ModuleBuilder};
use crate::resolver::ModuleResolver;
use crate::util::config::RebuildConfig;
use crate::util::fs::ensure_dir;
use crate::util::process::{resolve_tool, CommandRunner};

/// Everything one run needs.
pub struct RebuildSession<'a> {
    /// Directory holding `package.json`.
    pub project_root: PathBuf,

    /// Effective configuration.
    pub config: &'a RebuildConfig,

    /// Output root artifacts are copied into.
    pub output_root: PathBuf,

    /// Where the substitution map is written.
    pub map_path: PathBuf,

    pub resolver: &'a dyn ModuleResolver,
    pub runner: &'a dyn CommandRunner,
    pub builder: &'a dyn ModuleBuilder,
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RebuildReport {
    /// How the declared dependencies were classified.
    pub classification: Classification,

    /// The map that was written.
    pub map: SubstitutionMap,

    /// Files copied into the output tree.
    pub copied: Vec<PathBuf>,
}

/// Classify the project's declared dependencies without rebuilding anything.
pub fn plan_rebuild(
    project_root: &Path,
    config: &RebuildConfig,
    resolver: &dyn ModuleResolver,
) -> Result<Classification> {
    let manifest = ProjectManifest::load(&project_root.join(MANIFEST_FILE))?;
    let dependencies = manifest.declared_dependencies(config.optional_dependencies());
    Ok(classify(&dependencies, resolver))
}

/// Run the whole pipeline.
pub fn rebuild_native_modules(session: &RebuildSession<'_>) -> Result<RebuildReport> {
    let config = session.config;
    ensure_dir(&session.output_root)?;

    // Reject bad module configuration before anything expensive starts.
    let user_modules = config.resolved_user_modules()?;

    let classification = plan_rebuild(&session.project_root, config, session.resolver)?;
    tracing::info!(
        "{} native dependenc{} to rebuild, {} skipped",
        classification.rebuild.len(),
        if classification.rebuild.len() == 1 { "y" } else { "ies" },
        classification.skipped.len()
    );

    let opts = RebuildOptions {
        tool: resolve_tool(config.rebuild_tool(), &session.project_root),
        flags: RebuildFlags::from_config(config),
        python: config.python_path.clone(),
        cwd: session.project_root.clone(),
    };
    let mut planned = rebuild_all(
        &classification.rebuild,
        &opts,
        session.resolver,
        session.runner,
    )?;
    planned.extend(build_user_modules(&user_modules, session.builder)?);

    let reconciled = reconcile(&planned, config.output_path(), &session.output_root)?;
    write_substitution_map(&reconciled.map, &session.map_path)?;

    Ok(RebuildReport {
        classification,
        map: reconciled.map,
        copied: reconciled.copied,
    })
}
