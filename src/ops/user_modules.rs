//! Building native modules that live in the project's own source tree.
//!
//! Each configured user module is handed to a [`ModuleBuilder`], which either
//! produces an artifact pair or reports that there was nothing to build.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::{ArtifactPair, ModuleDescriptor, PlannedArtifact};
use crate::util::fs::{ensure_dir, file_name_string, first_match, move_file, NATIVE_EXTENSION};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Build file that marks a directory as a node-gyp project.
pub const BINDING_GYP: &str = "binding.gyp";

/// Headers location for Electron builds.
pub const ELECTRON_DIST_URL: &str = "https://electronjs.org/headers";

/// Compiles a user module from source.
pub trait ModuleBuilder {
    /// Build `module`, returning `None` when nothing was produced.
    fn compile(&self, module: &ModuleDescriptor) -> Result<Option<ArtifactPair>>;
}

/// Build every user module in order.
///
/// A module that produces nothing is skipped; a build error aborts the run.
pub fn build_user_modules(
    modules: &[ModuleDescriptor],
    builder: &dyn ModuleBuilder,
) -> Result<Vec<PlannedArtifact>> {
    let mut planned = Vec::new();
    for module in modules {
        eprintln!("    Building user module {}", module.source);
        let pair = builder
            .compile(module)
            .with_context(|| format!("failed to build user module `{}`", module.source))?;

        match pair {
            Some(pair) => planned.push(
                PlannedArtifact::new(pair, module.source.as_str())
                    .with_output_path(module.output_path.as_str()),
            ),
            None => tracing::info!("user module `{}` produced nothing; skipped", module.source),
        }
    }
    Ok(planned)
}

/// Builds user modules with node-gyp, once for the development runtime and
/// once for Electron.
///
/// The runtime-ABI binary is staged under `build/runtime/`, the Electron binary
/// is moved to `bin/`, both inside the module's source directory.
pub struct GypModuleBuilder<'a> {
    project_root: PathBuf,
    node_gyp: PathBuf,
    electron_version: String,
    global_debug: bool,
    python: Option<PathBuf>,
    runner: &'a dyn CommandRunner,
}

impl<'a> GypModuleBuilder<'a> {
    /// Create a builder for modules under `project_root`.
    pub fn new(
        project_root: impl Into<PathBuf>,
        node_gyp: impl Into<PathBuf>,
        electron_version: impl Into<String>,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        GypModuleBuilder {
            project_root: project_root.into(),
            node_gyp: node_gyp.into(),
            electron_version: electron_version.into(),
            global_debug: false,
            python: None,
            runner,
        }
    }

    /// Debug setting for modules without their own override.
    pub fn debug(mut self, debug: bool) -> Self {
        self.global_debug = debug;
        self
    }

    /// Python interpreter for node-gyp.
    pub fn python(mut self, python: Option<PathBuf>) -> Self {
        self.python = python;
        self
    }

    fn gyp(&self, source_dir: &Path, debug: bool) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.node_gyp)
            .arg("rebuild")
            .cwd(source_dir);
        if debug {
            cmd = cmd.arg("--debug");
        }
        if let Some(ref python) = self.python {
            cmd = cmd.arg(format!("--python={}", python.display()));
        }
        cmd
    }

    fn run(&self, cmd: &ProcessBuilder) -> Result<()> {
        let status = self.runner.run(cmd)?;
        if !status.success() {
            bail!(
                "`{}` failed with exit code {:?}",
                cmd.display_command(),
                status.code
            );
        }
        Ok(())
    }
}

impl ModuleBuilder for GypModuleBuilder<'_> {
    fn compile(&self, module: &ModuleDescriptor) -> Result<Option<ArtifactPair>> {
        let source_dir = self.project_root.join(&module.source);
        if !source_dir.join(BINDING_GYP).is_file() {
            tracing::warn!(
                "user module `{}` has no {}; skipped",
                module.source,
                BINDING_GYP
            );
            return Ok(None);
        }

        let debug = module.is_debug(self.global_debug);
        let config_dir = source_dir
            .join("build")
            .join(if debug { "Debug" } else { "Release" });

        self.run(&self.gyp(&source_dir, debug))?;
        let built = first_match(&config_dir, NATIVE_EXTENSION).with_context(|| {
            format!("node-gyp produced no binary under {}", config_dir.display())
        })?;
        let file_name = file_name_string(&built).unwrap_or_default();
        let runtime = source_dir.join("build").join("runtime").join(&file_name);
        move_file(&built, &runtime)?;

        let electron = self
            .gyp(&source_dir, debug)
            .arg("--runtime=electron")
            .arg(format!("--target={}", self.electron_version))
            .arg(format!("--dist-url={}", ELECTRON_DIST_URL));
        self.run(&electron)?;
        let built = first_match(&config_dir, NATIVE_EXTENSION).with_context(|| {
            format!(
                "node-gyp produced no Electron binary under {}",
                config_dir.display()
            )
        })?;
        let bin_dir = source_dir.join("bin");
        ensure_dir(&bin_dir)?;
        let target = bin_dir.join(file_name_string(&built).unwrap_or_default());
        move_file(&built, &target)?;

        Ok(Some(ArtifactPair::new(runtime, target)?))
    }
}

#[derive(Debug, Deserialize)]
struct VersionOnly {
    version: String,
}

/// Version of the `electron` package installed in the project.
pub fn installed_electron_version(project_root: &Path) -> Result<String> {
    let path = project_root
        .join("node_modules")
        .join("electron")
        .join("package.json");
    let contents = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "cannot determine the Electron version: failed to read {}\n\
             help: set `electronVersion` in the configuration",
            path.display()
        )
    })?;
    let parsed: VersionOnly = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(parsed.version)
}
