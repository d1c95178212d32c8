//! Environment for subprocesses that need the installed toolchain.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::process::{find_executable_in, ProcessBuilder};

/// PATH additions and GOROOT produced by installation steps.
///
/// Installation writes this once; later subprocesses only read it. The
/// process environment itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    bin_dirs: Vec<PathBuf>,
    goroot: Option<PathBuf>,
    inherited_path: Option<OsString>,
}

impl ToolchainEnv {
    /// Start from the PATH of the current process.
    pub fn inherit() -> Self {
        ToolchainEnv {
            inherited_path: env::var_os("PATH"),
            ..Self::default()
        }
    }

    /// Put `dir` in front of every other PATH entry.
    pub fn prepend_path(&mut self, dir: impl Into<PathBuf>) {
        self.bin_dirs.insert(0, dir.into());
    }

    pub fn set_goroot(&mut self, goroot: impl Into<PathBuf>) {
        self.goroot = Some(goroot.into());
    }

    pub fn goroot(&self) -> Option<&Path> {
        self.goroot.as_deref()
    }

    pub fn bin_dirs(&self) -> &[PathBuf] {
        &self.bin_dirs
    }

    /// The PATH handed to subprocesses.
    pub fn search_path(&self) -> Result<OsString> {
        let inherited = self
            .inherited_path
            .as_ref()
            .map(|p| env::split_paths(p).collect::<Vec<_>>())
            .unwrap_or_default();

        env::join_paths(self.bin_dirs.iter().cloned().chain(inherited))
            .context("installed tool directory cannot be placed on PATH")
    }

    /// Locate `program` on the toolchain search path.
    pub fn locate(&self, program: &str, cwd: &Path) -> Result<Option<PathBuf>> {
        Ok(find_executable_in(program, &self.search_path()?, cwd))
    }

    /// A command for `program` running with this toolchain.
    pub fn command(&self, program: &str) -> Result<ProcessBuilder> {
        let mut cmd = ProcessBuilder::new(program);
        if !self.bin_dirs.is_empty() || self.inherited_path.is_some() {
            cmd = cmd.env("PATH", self.search_path()?.to_string_lossy());
        }
        if let Some(ref goroot) = self.goroot {
            cmd = cmd.env("GOROOT", goroot.to_string_lossy());
        }
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepended_dirs_come_first() {
        let mut env = ToolchainEnv {
            inherited_path: Some(OsString::from("/usr/bin")),
            ..ToolchainEnv::default()
        };
        env.prepend_path("/deps/godep/bin");
        env.prepend_path("/cache/go1.6.4/go/bin");

        let path = env.search_path().unwrap();
        assert_eq!(
            path,
            OsString::from("/cache/go1.6.4/go/bin:/deps/godep/bin:/usr/bin")
        );
    }

    #[test]
    fn test_command_carries_toolchain() {
        let mut env = ToolchainEnv::default();
        env.prepend_path("/cache/go1.7.5/go/bin");
        env.set_goroot("/cache/go1.7.5/go");

        let cmd = env.command("go").unwrap();
        assert_eq!(cmd.get_env("PATH"), Some("/cache/go1.7.5/go/bin"));
        assert_eq!(cmd.get_env("GOROOT"), Some("/cache/go1.7.5/go"));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_finds_installed_tool() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let tool = bin.join("godep");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut env = ToolchainEnv::default();
        env.prepend_path(&bin);

        assert_eq!(env.locate("godep", tmp.path()).unwrap(), Some(tool));
        assert_eq!(env.locate("glide", tmp.path()).unwrap(), None);
    }
}
