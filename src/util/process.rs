//! Subprocess execution utilities.
//!
//! External tools are described as data ([`ProcessBuilder`]) and launched
//! through a [`CommandRunner`], so the rebuild steps can be driven by a fake
//! runner in tests.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get an environment variable set on this builder.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Get the working directory, if set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute with inherited stdio, streaming the child's output through.
    pub fn status(&self) -> Result<ProcessStatus> {
        let status = self
            .build_command()
            .status()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))?;
        Ok(ProcessStatus {
            code: status.code(),
        })
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Exit status of a finished subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessStatus {
    /// A status with the given exit code.
    pub fn exited(code: i32) -> Self {
        ProcessStatus { code: Some(code) }
    }

    /// Whether the process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launches external commands and waits for them to finish.
pub trait CommandRunner {
    /// Run `cmd` to completion, forwarding its standard streams.
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessStatus>;
}

/// Runs commands as real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessStatus> {
        tracing::debug!("running `{}`", cmd.display_command());
        cmd.status()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Resolve a Node tool by name.
///
/// Looks on `PATH` first, then in the project's `node_modules/.bin`. Falls back
/// to the bare name so the spawn error names what was missing.
pub fn resolve_tool(name: &str, project_root: &Path) -> PathBuf {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.to_path_buf();
    }

    if let Some(path) = find_executable(name) {
        return path;
    }

    let bin_dir = project_root.join("node_modules").join(".bin");
    if let Ok(path) = which::which_in(name, Some(&bin_dir), project_root) {
        return path;
    }

    PathBuf::from(name)
}
