//! Test utilities and mocks for unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use native_rebuild::test_support::{MockResponse, MockRunner, ProjectFixture};
//!
//! #[test]
//! fn test_example() {
//!     let project = ProjectFixture::new()
//!         .dependency("sqlite3", "*")
//!         .native_module("sqlite3", "node_sqlite3.node")
//!         .write();
//!
//!     let runner = MockRunner::new();
//!     runner.expect_contains("-o sqlite3", MockResponse::failure(1));
//!
//!     // Use the runner in place of SystemRunner...
//! }
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::{ArtifactPair, ModuleDescriptor};
use crate::ops::user_modules::ModuleBuilder;
use crate::util::process::{CommandRunner, ProcessBuilder, ProcessStatus};

// Re-export fixtures for convenience
pub use fixtures::*;

/// What a mocked command does when it runs.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Files the command "produces", with their contents.
    pub creates: Vec<(PathBuf, String)>,
}

impl MockResponse {
    /// A command that exits with code zero.
    pub fn success() -> Self {
        MockResponse {
            status: 0,
            creates: Vec::new(),
        }
    }

    /// A command that exits with `status`.
    pub fn failure(status: i32) -> Self {
        MockResponse {
            status,
            creates: Vec::new(),
        }
    }

    /// Write an empty file at `path` when the command runs.
    pub fn creates(self, path: impl AsRef<Path>) -> Self {
        self.creates_with(path, "")
    }

    /// Write `contents` to `path` when the command runs.
    pub fn creates_with(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.creates
            .push((path.as_ref().to_path_buf(), contents.into()));
        self
    }
}

/// Pattern for matching commands in [`MockRunner`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Contains(s) => cmd.contains(s.as_str()),
        }
    }
}

/// Command runner that records calls instead of spawning processes.
///
/// Expectations are checked in registration order; the first match decides the
/// outcome. Commands matching nothing succeed without side effects.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: RefCell<Vec<(CommandPattern, MockResponse)>>,
    calls: RefCell<Vec<ProcessBuilder>>,
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, response: MockResponse) -> &Self {
        self.expectations
            .borrow_mut()
            .push((CommandPattern::Exact(cmd.to_string()), response));
        self
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, response: MockResponse) -> &Self {
        self.expectations
            .borrow_mut()
            .push((CommandPattern::Contains(substring.to_string()), response));
        self
    }

    /// Display strings of all commands that were run.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|cmd| cmd.display_command())
            .collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessStatus> {
        self.calls.borrow_mut().push(cmd.clone());
        let display = cmd.display_command();

        let expectations = self.expectations.borrow();
        let Some((_, response)) = expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&display))
        else {
            return Ok(ProcessStatus::exited(0));
        };

        for (path, contents) in &response.creates {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, contents)?;
        }
        Ok(ProcessStatus::exited(response.status))
    }
}

enum StubOutcome {
    Produces(PathBuf, PathBuf),
    Nothing,
    Fails,
}

/// Module builder with canned results keyed by module source.
#[derive(Default)]
pub struct StubModuleBuilder {
    outcomes: HashMap<String, StubOutcome>,
}

impl StubModuleBuilder {
    /// Create a builder that knows no modules.
    pub fn new() -> Self {
        Self::default()
    }

    /// `source` builds into the given runtime and target binaries.
    pub fn produces(
        mut self,
        source: &str,
        runtime: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        self.outcomes.insert(
            source.to_string(),
            StubOutcome::Produces(runtime.into(), target.into()),
        );
        self
    }

    /// `source` produces nothing.
    pub fn nothing(mut self, source: &str) -> Self {
        self.outcomes
            .insert(source.to_string(), StubOutcome::Nothing);
        self
    }

    /// `source` fails to build.
    pub fn fails(mut self, source: &str) -> Self {
        self.outcomes.insert(source.to_string(), StubOutcome::Fails);
        self
    }
}

impl ModuleBuilder for StubModuleBuilder {
    fn compile(&self, module: &ModuleDescriptor) -> Result<Option<ArtifactPair>> {
        match self.outcomes.get(&module.source) {
            Some(StubOutcome::Produces(runtime, target)) => {
                Ok(Some(ArtifactPair::new(runtime.clone(), target.clone())?))
            }
            Some(StubOutcome::Nothing) => Ok(None),
            Some(StubOutcome::Fails) => bail!("compiler exited with code 1"),
            None => bail!("unexpected module: {}", module.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_and_matches() {
        let runner = MockRunner::new();
        runner.expect("tool -o a", MockResponse::failure(3));

        let status = runner
            .run(&ProcessBuilder::new("tool").args(["-o", "a"]))
            .unwrap();
        assert_eq!(status.code, Some(3));

        let status = runner.run(&ProcessBuilder::new("other")).unwrap();
        assert!(status.success());
        assert_eq!(runner.calls(), vec!["tool -o a".to_string(), "other".to_string()]);
    }

    #[test]
    fn test_mock_runner_creates_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("bin/x.node");
        let runner = MockRunner::new();
        runner.expect_contains("x", MockResponse::success().creates_with(&out, "bin"));

        runner.run(&ProcessBuilder::new("x")).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "bin");
    }
}
