//! `gostage detect` command

use anyhow::Result;

use crate::cli::DetectArgs;
use gostage::core::detect_convention;
use gostage::util::config::StagingConfig;

pub fn execute(args: DetectArgs) -> Result<()> {
    let config = StagingConfig::from_env();
    let convention = detect_convention(&args.build_dir, &config)?;

    println!("{}", convention);
    Ok(())
}
