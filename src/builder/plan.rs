//! Build plan generation.
//!
//! A [`BuildPlan`] is the single `go install` invocation that compiles the
//! app: which binary runs it, with which flags, over which packages, from
//! which directory and against which GOPATH. It is fixed before anything
//! runs and can be printed as JSON.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::convention::VendoringConvention;
use crate::core::toolchain::ToolchainEnv;
use crate::core::workspace::Workspace;
use crate::resolver::packages::{PackageSpec, VendorMode};
use crate::util::config::{LayoutMode, StagingConfig};
use crate::util::process::ProcessBuilder;

/// Build tag every app is compiled with.
pub const BUILD_TAG: &str = "cloudfoundry";

/// A complete compile invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Program to run, `go` or `godep`
    pub command: String,

    /// Leading arguments before the flags (`install`, or `go install`)
    pub args: Vec<String>,

    /// Compiler flags
    pub flags: Vec<String>,

    /// Packages to install
    pub packages: PackageSpec,

    /// Directory the command runs in
    pub working_dir: PathBuf,

    /// `GOPATH` for the command
    pub gopath: PathBuf,

    /// `GOBIN` for the command, set only for an ephemeral GOPATH
    pub gobin: Option<PathBuf>,
}

/// Flags passed to `go install`.
///
/// `-ldflags` is added only when both the linker symbol and its value are
/// configured; either one alone is ignored.
pub fn build_flags(config: &StagingConfig) -> Vec<String> {
    let mut flags = vec![
        "-tags".to_string(),
        BUILD_TAG.to_string(),
        "-buildmode".to_string(),
        "pie".to_string(),
    ];

    if let Some((symbol, value)) = config.linker_pair() {
        flags.push("-ldflags".to_string());
        flags.push(format!("-X {}={}", symbol, value));
    }

    flags
}

impl BuildPlan {
    /// Plan the compile step.
    ///
    /// Godeps apps go through `godep go install` when they still carry a
    /// `_workspace` or vendor mode is off; everything else runs `go install`
    /// directly.
    pub fn new(
        config: &StagingConfig,
        convention: &VendoringConvention,
        mode: VendorMode,
        workspace: &Workspace,
        app_root: &Path,
        packages: PackageSpec,
    ) -> Self {
        let use_godep = convention.manifest().is_some()
            && (convention.has_legacy_workspace() || !mode.is_enabled());

        let (command, args) = if use_godep {
            ("godep", vec!["go".to_string(), "install".to_string()])
        } else {
            ("go", vec!["install".to_string()])
        };

        let gobin = match workspace.mode() {
            LayoutMode::Ephemeral => Some(app_root.join("bin")),
            LayoutMode::InPlace => None,
        };

        BuildPlan {
            command: command.to_string(),
            args,
            flags: build_flags(config),
            packages,
            working_dir: workspace.package_dir().to_path_buf(),
            gopath: workspace.root().to_path_buf(),
            gobin,
        }
    }

    /// Arguments after the program name.
    pub fn command_args(&self) -> Vec<String> {
        self.args
            .iter()
            .chain(&self.flags)
            .chain(self.packages.iter())
            .cloned()
            .collect()
    }

    /// The command line as shown to the user.
    pub fn display(&self) -> String {
        let mut parts = vec![self.command.clone()];
        parts.extend(self.command_args());
        parts.join(" ")
    }

    /// The subprocess that carries out this plan.
    pub fn to_process(&self, env: &ToolchainEnv) -> Result<ProcessBuilder> {
        let mut cmd = env
            .command(&self.command)?
            .args(self.command_args())
            .cwd(&self.working_dir)
            .env("GOPATH", self.gopath.to_string_lossy())
            .env_remove("GIT_DIR");

        if let Some(ref gobin) = self.gobin {
            cmd = cmd.env("GOBIN", gobin.to_string_lossy());
        }

        Ok(cmd)
    }
}
