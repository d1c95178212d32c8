//! Installing the vendoring tool and the Go toolchain.
//!
//! Each install extends a [`ToolchainEnv`]; later subprocesses run with it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::catalog::Catalog;
use crate::core::convention::VendoringConvention;
use crate::core::toolchain::ToolchainEnv;
use crate::resolver::version::{ResolvedVersion, GO};
use crate::sources::DependencyInstaller;
use crate::util::fs::clear_dir;

/// Where a Go version is cached: `<cache>/go<version>`.
pub fn go_install_location(cache_dir: &Path, version: &ResolvedVersion) -> PathBuf {
    cache_dir.join(format!("go{}", version))
}

/// Install godep or glide into `<deps>/<tool>` and put its `bin` on PATH.
///
/// Apps without a vendoring tool install nothing.
pub fn install_vendor_tool(
    convention: &VendoringConvention,
    catalog: &Catalog,
    installer: &dyn DependencyInstaller,
    deps_dir: &Path,
    env: &mut ToolchainEnv,
) -> Result<Option<PathBuf>> {
    let Some(tool) = convention.tool() else {
        return Ok(None);
    };

    tracing::info!("Installing {}", tool);
    let entry = catalog.only_version(tool)?;
    tracing::info!("{} version: {}", tool, entry.version);

    let install_dir = deps_dir.join(tool);
    installer.install(entry, &install_dir)?;
    env.prepend_path(install_dir.join("bin"));

    Ok(Some(install_dir))
}

/// Install `version` of Go into the cache unless it is already there.
///
/// A cache miss clears the whole cache first, so stale toolchains do not
/// pile up. Returns the install location.
pub fn install_go(
    version: &ResolvedVersion,
    catalog: &Catalog,
    installer: &dyn DependencyInstaller,
    cache_dir: &Path,
    env: &mut ToolchainEnv,
) -> Result<PathBuf> {
    let install_dir = go_install_location(cache_dir, version);
    let goroot = install_dir.join("go");

    if goroot.exists() {
        tracing::info!("Using go {}", version);
    } else {
        clear_dir(cache_dir)?;
        let entry = catalog.find(GO, version.as_str())?;
        installer.install(entry, &install_dir)?;
    }

    env.set_goroot(&goroot);
    env.prepend_path(goroot.join("bin"));

    Ok(install_dir)
}

/// Check that `go` is reachable on the toolchain PATH.
pub fn verify_go(env: &ToolchainEnv, cwd: &Path) -> Result<PathBuf> {
    match env.locate(GO, cwd)? {
        Some(path) => {
            tracing::debug!("using go binary at {}", path.display());
            Ok(path)
        }
        None => bail!("go binary not found after installation"),
    }
}
