//! Rebuilding native dependencies with the external rebuild tool.
//!
//! The tool is invoked once per dependency as
//! `<tool> [-f] [-b] [-p] -o <dependency>`. After it succeeds, the runtime-ABI
//! binary is expected under `<entry dir>/build` and the target-ABI binary under
//! `<package dir>/bin`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::{ArtifactPair, PlannedArtifact};
use crate::resolver::ModuleResolver;
use crate::util::config::RebuildConfig;
use crate::util::fs::{first_match, NATIVE_EXTENSION};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Directory, relative to a module's entry directory, holding its own build output.
pub const RUNTIME_ARTIFACT_DIR: &str = "build";

/// Directory, relative to a module's package directory, the rebuild tool writes to.
pub const TARGET_ARTIFACT_DIR: &str = "bin";

/// Environment variable the rebuild tool reads the Python interpreter from.
pub const PYTHON_ENV: &str = "PYTHON";

/// Fatal rebuild failures.
#[derive(Debug, Error)]
pub enum RebuildError {
    #[error("rebuilding `{dependency}` failed: `{command}` exited with {}", describe_code(.code))]
    ToolFailed {
        dependency: String,
        command: String,
        code: Option<i32>,
    },

    #[error("no runtime binary for `{dependency}` under `{}` after rebuild", .dir.display())]
    MissingRuntimeArtifact { dependency: String, dir: PathBuf },

    #[error("no rebuilt binary for `{dependency}` under `{}` after rebuild", .dir.display())]
    MissingTargetArtifact { dependency: String, dir: PathBuf },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

/// Flags passed through to the rebuild tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildFlags {
    pub force: bool,
    pub debug: bool,
    pub parallel: bool,
}

impl RebuildFlags {
    /// Derive the flags from configuration.
    pub fn from_config(config: &RebuildConfig) -> Self {
        RebuildFlags {
            force: config.force_rebuild(),
            debug: config.debug_build(),
            parallel: config.parallel_build(),
        }
    }

    /// Command-line form of the flags.
    pub fn to_args(self) -> Vec<&'static str> {
        let mut args = Vec::new();
        if self.force {
            args.push("-f");
        }
        if self.debug {
            args.push("-b");
        }
        if self.parallel {
            args.push("-p");
        }
        args
    }
}

/// How to invoke the rebuild tool.
#[derive(Debug, Clone)]
pub struct RebuildOptions {
    /// Tool executable.
    pub tool: PathBuf,

    /// Flags for every invocation.
    pub flags: RebuildFlags,

    /// Python interpreter for the tool's environment.
    pub python: Option<PathBuf>,

    /// Working directory, normally the project root.
    pub cwd: PathBuf,
}

/// Build the rebuild command for one dependency.
pub fn rebuild_command(dependency: &str, opts: &RebuildOptions) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new(&opts.tool)
        .args(opts.flags.to_args())
        .args(["-o", dependency])
        .cwd(&opts.cwd);
    if let Some(ref python) = opts.python {
        cmd = cmd.env(PYTHON_ENV, python.to_string_lossy());
    }
    cmd
}

/// Rebuild one dependency and locate its artifact pair.
pub fn rebuild_dependency(
    dependency: &str,
    opts: &RebuildOptions,
    resolver: &dyn ModuleResolver,
    runner: &dyn CommandRunner,
) -> Result<ArtifactPair> {
    let cmd = rebuild_command(dependency, opts);
    let status = runner.run(&cmd)?;
    if !status.success() {
        return Err(RebuildError::ToolFailed {
            dependency: dependency.to_string(),
            command: cmd.display_command(),
            code: status.code,
        }
        .into());
    }

    let resolved = resolver
        .resolve(dependency)
        .with_context(|| format!("`{}` disappeared during its rebuild", dependency))?;

    let runtime = locate(&resolved.entry_dir.join(RUNTIME_ARTIFACT_DIR)).ok_or_else(|| {
        RebuildError::MissingRuntimeArtifact {
            dependency: dependency.to_string(),
            dir: resolved.entry_dir.join(RUNTIME_ARTIFACT_DIR),
        }
    })?;
    let target = locate(&resolved.package_dir.join(TARGET_ARTIFACT_DIR)).ok_or_else(|| {
        RebuildError::MissingTargetArtifact {
            dependency: dependency.to_string(),
            dir: resolved.package_dir.join(TARGET_ARTIFACT_DIR),
        }
    })?;

    Ok(ArtifactPair::new(runtime, target)?)
}

/// Rebuild every dependency in order, stopping at the first failure.
pub fn rebuild_all(
    dependencies: &[String],
    opts: &RebuildOptions,
    resolver: &dyn ModuleResolver,
    runner: &dyn CommandRunner,
) -> Result<Vec<PlannedArtifact>> {
    let mut planned = Vec::with_capacity(dependencies.len());
    for dep in dependencies {
        eprintln!("  Rebuilding native module {}", dep);
        let pair = rebuild_dependency(dep, opts, resolver, runner)?;
        tracing::debug!(
            "`{}`: {} -> {}",
            dep,
            pair.runtime().display(),
            pair.target().display()
        );
        planned.push(PlannedArtifact::new(pair, dep.as_str()));
    }
    Ok(planned)
}

fn locate(dir: &Path) -> Option<PathBuf> {
    first_match(dir, NATIVE_EXTENSION)
}
