//! Package list computation and vendor handling.
//!
//! The package list starts from configuration or the Godeps manifest and is
//! then rewritten so packages that live under `vendor/` are addressed by
//! their vendored import path. Whether that rewrite happens depends on the
//! convention, the legacy Godeps workspace and the vendor toggle:
//!
//! | convention    | `_workspace` | vendor mode | behavior                         |
//! |---------------|--------------|-------------|----------------------------------|
//! | Godeps        | yes          | any         | no rewrite, warn if `vendor/` too |
//! | Godeps        | no           | enabled     | rewrite                          |
//! | Godeps        | no           | disabled    | no rewrite                       |
//! | glide         | n/a          | any         | `glide install` if needed, rewrite |
//! | native vendor | n/a          | enabled     | rewrite                          |
//! | native vendor | n/a          | disabled    | fatal                            |

use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::convention::VendoringConvention;
use crate::core::errors::{ExitCode, StageError, StageWarning, Warnings};
use crate::core::toolchain::ToolchainEnv;
use crate::core::workspace::Workspace;
use crate::resolver::version::ResolvedVersion;
use crate::util::config::{StagingConfig, VendorToggle};
use crate::util::fs::has_subdirectories;
use crate::util::process::CommandRunner;

/// Whether the compiler resolves imports through `vendor/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorMode {
    Enabled,
    Disabled,
}

impl VendorMode {
    pub fn is_enabled(self) -> bool {
        self == VendorMode::Enabled
    }
}

/// Ordered list of packages handed to `go install`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageSpec(Vec<String>);

impl PackageSpec {
    pub fn new(packages: Vec<String>) -> Self {
        PackageSpec(packages)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Apply `GO15VENDOREXPERIMENT` to the resolved compiler.
///
/// Only Go 1.6 understands the toggle; setting it for any other version is
/// an error rather than being silently ignored.
pub fn vendor_mode(toggle: &VendorToggle, version: &ResolvedVersion) -> Result<VendorMode> {
    if !toggle.is_set() {
        return Ok(VendorMode::Enabled);
    }

    if !version.is_go16() {
        return Err(StageError::UnsupportedToggle {
            version: version.to_string(),
        }
        .into());
    }

    Ok(match toggle {
        VendorToggle::Disabled => VendorMode::Disabled,
        _ => VendorMode::Enabled,
    })
}

/// Run `glide install` for glide apps whose `vendor/` is not populated yet.
///
/// Returns whether the tool was run.
pub fn ensure_lock_dependencies(
    convention: &VendoringConvention,
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    env: &ToolchainEnv,
) -> Result<bool> {
    if !matches!(convention, VendoringConvention::DeclarativeLock) {
        return Ok(false);
    }

    let vendor = workspace.vendor_dir();
    if vendor.is_dir() && has_subdirectories(&vendor)? {
        tracing::info!("Note: skipping (glide install) due to non-empty vendor directory.");
        return Ok(false);
    }

    tracing::info!("Fetching any unsaved dependencies (glide install)");
    let cmd = env
        .command("glide")?
        .arg("install")
        .cwd(workspace.package_dir());

    match runner.run(&cmd)? {
        Some(0) => Ok(true),
        code => bail!(
            "`{}` failed with {}",
            cmd.display_command(),
            ExitCode(code)
        ),
    }
}

/// The package list before any vendor rewrite.
fn initial_packages(
    config: &StagingConfig,
    convention: &VendoringConvention,
    warnings: &mut Warnings,
) -> Vec<String> {
    if !config.install_packages.is_empty() {
        if convention.manifest().is_some() {
            warnings.push(StageWarning::PackageSpecOverride {
                packages: config.install_packages.clone(),
            });
        }
        return config.install_packages.clone();
    }

    if let Some(manifest) = convention.manifest() {
        if !manifest.packages.is_empty() {
            return manifest.packages.clone();
        }
    }

    warnings.push(StageWarning::DefaultPackage);
    vec![".".to_string()]
}

/// Address vendored packages by their vendored import path.
///
/// `p` becomes `<import path>/vendor/p` when `<package dir>/vendor/p` is a
/// directory. `.` and already rewritten paths are left alone, so applying
/// this twice changes nothing.
pub fn rewrite_for_vendor(packages: &[String], import_path: &str, package_dir: &Path) -> Vec<String> {
    let vendored_prefix = format!("{}/vendor/", import_path);
    let vendor_dir = package_dir.join("vendor");

    packages
        .iter()
        .map(|pkg| {
            let relative = clean_package(pkg);
            if relative.is_empty() || relative == "." || pkg.starts_with(&vendored_prefix) {
                return pkg.clone();
            }
            if vendor_dir.join(relative).is_dir() {
                format!("{}{}", vendored_prefix, relative)
            } else {
                pkg.clone()
            }
        })
        .collect()
}

/// Drop leading `./` and trailing `/` so `./foo/` names the same package as `foo`.
fn clean_package(pkg: &str) -> &str {
    let mut pkg = pkg;
    while let Some(rest) = pkg.strip_prefix("./") {
        pkg = rest;
    }
    pkg.trim_end_matches('/')
}

/// Compute the final package list.
pub fn resolve_packages(
    config: &StagingConfig,
    convention: &VendoringConvention,
    workspace: &Workspace,
    mode: VendorMode,
    warnings: &mut Warnings,
) -> Result<PackageSpec> {
    let has_vendor = workspace.has_vendor_dir();

    let rewrite = match convention {
        VendoringConvention::ManifestBased(manifest) => {
            let legacy = manifest.legacy_workspace_present;
            if legacy && has_vendor {
                warnings.push(StageWarning::WorkspaceVendorCoexist);
            }

            let use_vendor = mode.is_enabled() && !legacy;
            if use_vendor && !has_vendor {
                warnings.push(StageWarning::MissingVendorDir);
            }
            use_vendor
        }
        VendoringConvention::NoTooling { .. } if !mode.is_enabled() => {
            return Err(StageError::MustUseVendor.into());
        }
        VendoringConvention::DeclarativeLock | VendoringConvention::NoTooling { .. } => true,
    };

    let packages = initial_packages(config, convention, warnings);
    let packages = if rewrite {
        rewrite_for_vendor(&packages, workspace.import_path(), workspace.package_dir())
    } else {
        packages
    };

    tracing::debug!("packages to install: {}", packages.join(" "));
    Ok(PackageSpec(packages))
}
