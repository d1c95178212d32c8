//! Test utilities and mocks for gostage unit tests.
//!
//! The pipeline talks to the outside world through two seams: a
//! [`CommandRunner`] for `go`, `godep` and `glide`, and a
//! [`DependencyInstaller`] for catalog downloads. This module provides
//! recording fakes for both.
//!
//! # Example
//!
//! ```rust,ignore
//! use gostage::test_support::{RecordingRunner, MockOutput};
//!
//! #[test]
//! fn test_example() {
//!     let runner = RecordingRunner::new();
//!     runner.respond("glide name", "github.com/example/app\n");
//!     runner.expect_prefix("go install", MockOutput::failure(2));
//!
//!     // Hand `&runner` to the code under test...
//!     assert_eq!(runner.calls(), vec!["glide name"]);
//! }
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::catalog::CatalogEntry;
use crate::sources::DependencyInstaller;
use crate::util::process::{CommandRunner, ProcessBuilder};

pub use fixtures::*;

/// Canned result of a mocked command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockOutput {
    /// Exit code; `None` simulates death by signal.
    pub status: Option<i32>,
    pub stdout: String,
}

impl MockOutput {
    /// Exit 0 with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockOutput {
            status: Some(0),
            stdout: stdout.into(),
        }
    }

    /// Exit with a non-zero code.
    pub fn failure(status: i32) -> Self {
        MockOutput {
            status: Some(status),
            stdout: String::new(),
        }
    }

    /// Killed by a signal.
    pub fn killed() -> Self {
        MockOutput {
            status: None,
            stdout: String::new(),
        }
    }
}

impl Default for MockOutput {
    fn default() -> Self {
        MockOutput::success("")
    }
}

/// How an expectation selects commands.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on the displayed command line.
    Exact(String),
    /// Displayed command line starts with the prefix.
    StartsWith(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
        }
    }
}

/// [`CommandRunner`] that records every command and never spawns anything.
///
/// Commands without a matching expectation succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    expectations: RefCell<Vec<(CommandPattern, MockOutput)>>,
    commands: RefCell<Vec<ProcessBuilder>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `cmd` with `stdout` and a zero exit.
    pub fn respond(&self, cmd: &str, stdout: &str) -> &Self {
        self.expect(cmd, MockOutput::success(stdout))
    }

    /// Make `cmd` exit with `code`.
    pub fn exit_with(&self, cmd: &str, code: Option<i32>) -> &Self {
        self.expect(
            cmd,
            MockOutput {
                status: code,
                stdout: String::new(),
            },
        )
    }

    /// Add an expectation for an exact command line.
    pub fn expect(&self, cmd: &str, output: MockOutput) -> &Self {
        self.expectations
            .borrow_mut()
            .push((CommandPattern::Exact(cmd.to_string()), output));
        self
    }

    /// Add an expectation for command lines starting with `prefix`.
    pub fn expect_prefix(&self, prefix: &str, output: MockOutput) -> &Self {
        self.expectations
            .borrow_mut()
            .push((CommandPattern::StartsWith(prefix.to_string()), output));
        self
    }

    /// Displayed command lines, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }

    /// Full commands, in call order.
    pub fn commands(&self) -> Vec<ProcessBuilder> {
        self.commands.borrow().clone()
    }

    fn record(&self, cmd: &ProcessBuilder) -> MockOutput {
        let line = cmd.display_command();
        self.commands.borrow_mut().push(cmd.clone());

        self.expectations
            .borrow()
            .iter()
            .find(|(pattern, _)| pattern.matches(&line))
            .map(|(_, output)| output.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<Option<i32>> {
        Ok(self.record(cmd).status)
    }

    fn capture_stdout(&self, cmd: &ProcessBuilder) -> Result<String> {
        let output = self.record(cmd);
        if output.status != Some(0) {
            bail!("`{}` failed with {:?}", cmd.display_command(), output.status);
        }
        Ok(output.stdout)
    }
}

/// [`DependencyInstaller`] that lays out a fake installation.
///
/// `go` gets `<dest>/go/bin/go`; any other tool gets `<dest>/bin/<name>`.
#[derive(Debug, Default)]
pub struct FakeInstaller {
    installs: RefCell<Vec<(String, String, PathBuf)>>,
}

impl FakeInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(name, version, dest)` for every install, in order.
    pub fn installs(&self) -> Vec<(String, String, PathBuf)> {
        self.installs.borrow().clone()
    }

    /// Names of installed dependencies, in order.
    pub fn installed_names(&self) -> Vec<String> {
        self.installs
            .borrow()
            .iter()
            .map(|(name, _, _)| name.clone())
            .collect()
    }
}

impl DependencyInstaller for FakeInstaller {
    fn install(&self, entry: &CatalogEntry, dest: &Path) -> Result<()> {
        let binary = if entry.name == "go" {
            dest.join("go/bin/go")
        } else {
            dest.join("bin").join(&entry.name)
        };
        write_executable(&binary, "#!/bin/sh\nexit 0\n");

        self.installs.borrow_mut().push((
            entry.name.clone(),
            entry.version.clone(),
            dest.to_path_buf(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_defaults_to_success() {
        let runner = RecordingRunner::new();
        let code = runner
            .run(&ProcessBuilder::new("go").args(["install", "."]))
            .unwrap();

        assert_eq!(code, Some(0));
        assert_eq!(runner.calls(), vec!["go install ."]);
    }

    #[test]
    fn test_recording_runner_expectations() {
        let runner = RecordingRunner::new();
        runner
            .respond("glide name", "example.com/app\n")
            .expect_prefix("go install", MockOutput::failure(2));

        let out = runner
            .capture_stdout(&ProcessBuilder::new("glide").arg("name"))
            .unwrap();
        assert_eq!(out, "example.com/app\n");

        let code = runner
            .run(&ProcessBuilder::new("go").args(["install", "-tags", "cloudfoundry"]))
            .unwrap();
        assert_eq!(code, Some(2));
    }

    #[test]
    fn test_fake_installer_layout() {
        let tmp = tempfile::TempDir::new().unwrap();
        let installer = FakeInstaller::new();
        let entry = CatalogEntry {
            name: "godep".to_string(),
            version: "v79".to_string(),
            uri: "file:///godep.tgz".to_string(),
            sha256: String::new(),
        };

        installer.install(&entry, &tmp.path().join("godep")).unwrap();

        assert!(tmp.path().join("godep/bin/godep").is_file());
        assert_eq!(installer.installed_names(), vec!["godep"]);
    }
}
