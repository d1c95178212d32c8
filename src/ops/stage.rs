//! The staging pipeline.
//!
//! Stages run strictly in order and the first error aborts the run:
//!
//! 1. detect the vendoring convention
//! 2. resolve the Go version
//! 3. install the vendoring tool and Go
//! 4. determine the import path and lay out the GOPATH
//! 5. apply the vendor toggle, fetch glide dependencies, compute packages
//! 6. compile
//! 7. write release metadata and startup scripts

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::{BuildExecutor, BuildPlan};
use crate::core::catalog::Catalog;
use crate::core::convention::{detect_convention, VendoringConvention};
use crate::core::errors::Warnings;
use crate::core::toolchain::ToolchainEnv;
use crate::core::workspace::{plan_workspace, Workspace};
use crate::ops::release::write_startup_environment;
use crate::ops::supply::{install_go, install_vendor_tool, verify_go};
use crate::resolver::packages::{ensure_lock_dependencies, resolve_packages, vendor_mode};
use crate::resolver::version::{select_go_version, ResolvedVersion};
use crate::sources::DependencyInstaller;
use crate::util::config::StagingConfig;
use crate::util::process::CommandRunner;

/// Prefix of the temp dir vendoring tools go to when no deps dir is given.
const DEPS_PREFIX: &str = "gobuildpack.deps";

/// Options for a staging run.
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// The application source tree
    pub build_dir: PathBuf,

    /// Persistent cache; Go toolchains are kept here
    pub cache_dir: PathBuf,

    /// Where vendoring tools are installed; a temp dir if unset
    pub deps_dir: Option<PathBuf>,

    /// Release descriptor output
    pub release_file: PathBuf,

    /// Stop before compiling
    pub plan_only: bool,
}

/// Everything a staging run decided.
#[derive(Debug)]
pub struct StageOutcome {
    pub convention: VendoringConvention,
    pub version: ResolvedVersion,
    pub workspace: Workspace,
    pub plan: BuildPlan,
    pub warnings: Warnings,
    /// Whether the compile ran
    pub compiled: bool,
}

/// External collaborators of the pipeline.
pub struct StageContext<'a> {
    pub config: &'a StagingConfig,
    pub catalog: &'a Catalog,
    pub runner: &'a dyn CommandRunner,
    pub installer: &'a dyn DependencyInstaller,
}

/// Stage the app in `opts.build_dir`.
pub fn stage(opts: &StageOptions, ctx: &StageContext<'_>) -> Result<StageOutcome> {
    let app_root = opts.build_dir.as_path();
    let mut warnings = Warnings::new();

    let convention = detect_convention(app_root, ctx.config)?;
    tracing::info!("Vendoring convention: {}", convention);

    let version = select_go_version(ctx.config, &convention, ctx.catalog, &mut warnings)?;

    let deps_dir = match opts.deps_dir {
        Some(ref dir) => dir.clone(),
        None => tempfile::Builder::new()
            .prefix(DEPS_PREFIX)
            .tempdir()
            .context("failed to create dependency directory")?
            .keep(),
    };

    let mut env = ToolchainEnv::inherit();
    install_vendor_tool(&convention, ctx.catalog, ctx.installer, &deps_dir, &mut env)?;
    let go_install_dir = install_go(&version, ctx.catalog, ctx.installer, &opts.cache_dir, &mut env)?;
    verify_go(&env, app_root)?;

    let import_path = convention.import_path(app_root, ctx.runner, &env)?;
    tracing::info!("Import path: {}", import_path);

    let workspace = plan_workspace(app_root, &import_path, ctx.config.layout)?;
    let mode = vendor_mode(&ctx.config.vendor_toggle, &version)?;

    ensure_lock_dependencies(&convention, &workspace, ctx.runner, &env)?;
    let packages = resolve_packages(ctx.config, &convention, &workspace, mode, &mut warnings)?;

    let plan = BuildPlan::new(ctx.config, &convention, mode, &workspace, app_root, packages);

    let compiled = if opts.plan_only {
        false
    } else {
        BuildExecutor::new(ctx.runner, &env).execute(&plan)?;
        write_startup_environment(
            ctx.config,
            &workspace,
            app_root,
            &go_install_dir,
            &opts.release_file,
        )?;
        true
    };

    Ok(StageOutcome {
        convention,
        version,
        workspace,
        plan,
        warnings,
        compiled,
    })
}
