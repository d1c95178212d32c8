//! Vendoring convention detection.
//!
//! An app is classified exactly once, by looking for marker files in a fixed
//! order. Several markers can coexist while an app migrates between tools, so
//! the order below is significant:
//!
//! 1. `Godeps/Godeps.json` → [`VendoringConvention::ManifestBased`]
//! 2. `.godir` → deprecated, fatal
//! 3. `glide.yaml` → [`VendoringConvention::DeclarativeLock`]
//! 4. `src/**/*.go` below a top-level subdirectory → gb layout, fatal
//! 5. anything else → [`VendoringConvention::NoTooling`]

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::errors::StageError;
use crate::core::godeps::DependencyManifest;
use crate::core::toolchain::ToolchainEnv;
use crate::util::config::StagingConfig;
use crate::util::process::CommandRunner;

/// Deprecated single-file import path pointer.
pub const GODIR: &str = ".godir";

/// Glide's dependency declaration.
pub const GLIDE_YAML: &str = "glide.yaml";

/// The dependency-vendoring convention an app follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendoringConvention {
    /// Godep, with its parsed manifest.
    ManifestBased(DependencyManifest),
    /// Glide; the lockfile is left to the tool.
    DeclarativeLock,
    /// Plain `vendor/` directory; the import path comes from configuration.
    NoTooling { import_path: String },
}

impl VendoringConvention {
    /// Name of the vendoring tool, as used in the dependency catalog.
    pub fn tool(&self) -> Option<&'static str> {
        match self {
            VendoringConvention::ManifestBased(_) => Some("godep"),
            VendoringConvention::DeclarativeLock => Some("glide"),
            VendoringConvention::NoTooling { .. } => None,
        }
    }

    /// The Godeps manifest, under [`VendoringConvention::ManifestBased`].
    pub fn manifest(&self) -> Option<&DependencyManifest> {
        match self {
            VendoringConvention::ManifestBased(manifest) => Some(manifest),
            _ => None,
        }
    }

    /// Whether a Godeps `_workspace` is in play.
    pub fn has_legacy_workspace(&self) -> bool {
        self.manifest()
            .is_some_and(|m| m.legacy_workspace_present)
    }

    /// Determine the app's import path.
    ///
    /// Glide is asked through `glide name`, so the tool must already be
    /// installed into `env`.
    pub fn import_path(
        &self,
        app_root: &Path,
        runner: &dyn CommandRunner,
        env: &ToolchainEnv,
    ) -> Result<String> {
        match self {
            VendoringConvention::ManifestBased(manifest) => {
                Ok(manifest.import_path(app_root)?.to_string())
            }
            VendoringConvention::DeclarativeLock => {
                let cmd = env.command("glide")?.arg("name").cwd(app_root);
                let stdout = runner
                    .capture_stdout(&cmd)
                    .context("failed to ask glide for the import path")?;
                Ok(stdout.trim().to_string())
            }
            VendoringConvention::NoTooling { import_path } => Ok(import_path.clone()),
        }
    }
}

impl fmt::Display for VendoringConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendoringConvention::ManifestBased(_) => write!(f, "godep"),
            VendoringConvention::DeclarativeLock => write!(f, "glide"),
            VendoringConvention::NoTooling { .. } => write!(f, "go_nativevendoring"),
        }
    }
}

/// Classify the app at `app_root`. Reads only.
pub fn detect_convention(app_root: &Path, config: &StagingConfig) -> Result<VendoringConvention> {
    if DependencyManifest::path_in(app_root).exists() {
        tracing::info!("Checking Godeps/Godeps.json file");
        let manifest = DependencyManifest::load(app_root)?;
        return Ok(VendoringConvention::ManifestBased(manifest));
    }

    let godir = app_root.join(GODIR);
    if godir.exists() {
        return Err(StageError::DeprecatedConvention { marker: godir }.into());
    }

    if app_root.join(GLIDE_YAML).exists() {
        return Ok(VendoringConvention::DeclarativeLock);
    }

    if has_gb_layout(app_root)? {
        return Err(StageError::UnsupportedLayout {
            src_dir: app_root.join("src"),
        }
        .into());
    }

    match &config.package_name {
        Some(import_path) => Ok(VendoringConvention::NoTooling {
            import_path: import_path.clone(),
        }),
        None => Err(StageError::MissingPackageName.into()),
    }
}

/// Whether any top-level directory under `src/` contains a `.go` file.
fn has_gb_layout(app_root: &Path) -> Result<bool> {
    let src_dir = app_root.join("src");
    if !src_dir.is_dir() {
        return Ok(false);
    }

    for entry in fs::read_dir(&src_dir)
        .with_context(|| format!("failed to read directory: {}", src_dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        for file in WalkDir::new(entry.path()) {
            let file = file.with_context(|| {
                format!("failed to walk directory: {}", entry.path().display())
            })?;
            if file.file_type().is_file()
                && file.path().extension().is_some_and(|ext| ext == "go")
            {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
