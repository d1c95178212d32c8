//! `gostage resolve-version` command

use anyhow::Result;

use crate::cli::ResolveVersionArgs;
use gostage::core::Catalog;
use gostage::resolver::version::{resolve_version, GO};

pub fn execute(args: ResolveVersionArgs) -> Result<()> {
    let catalog = Catalog::load(&args.catalog)?;
    let version = resolve_version(&args.spec, &catalog.all_versions(GO))?;

    println!("{}", version);
    Ok(())
}
