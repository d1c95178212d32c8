//! `gostage compile` command

use anyhow::{Context, Result};

use crate::cli::CompileArgs;
use gostage::core::Catalog;
use gostage::ops::{stage, StageContext, StageOptions};
use gostage::sources::TarballInstaller;
use gostage::util::config::StagingConfig;
use gostage::util::process::SystemRunner;

pub fn execute(args: CompileArgs) -> Result<()> {
    let config = StagingConfig::from_env();
    let catalog = Catalog::load(&args.catalog)?;

    let opts = StageOptions {
        build_dir: args.build_dir,
        cache_dir: args.cache_dir,
        deps_dir: args.deps_dir,
        release_file: args.release_file,
        plan_only: args.plan,
    };

    let installer = TarballInstaller::new();
    let ctx = StageContext {
        config: &config,
        catalog: &catalog,
        runner: &SystemRunner,
        installer: &installer,
    };

    let outcome = stage(&opts, &ctx)?;

    if !outcome.warnings.is_empty() {
        tracing::info!("Staged with {} warning(s)", outcome.warnings.as_slice().len());
    }

    if args.plan {
        let json = serde_json::to_string_pretty(&outcome.plan)
            .context("failed to serialize build plan")?;
        println!("{}", json);
    } else {
        tracing::info!("Compiled {} with go {}", outcome.workspace.import_path(), outcome.version);
    }

    Ok(())
}
