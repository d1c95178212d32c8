//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use gostage::core::catalog::CATALOG_FILE;
use gostage::ops::DEFAULT_RELEASE_FILE;

/// gostage - staging-time build orchestrator for Go applications
#[derive(Parser)]
#[command(name = "gostage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stage and compile an application
    Compile(CompileArgs),

    /// Print the vendoring convention of an application
    Detect(DetectArgs),

    /// Resolve a Go version specifier against the catalog
    ResolveVersion(ResolveVersionArgs),
}

#[derive(Args)]
pub struct CompileArgs {
    /// Application source directory
    pub build_dir: PathBuf,

    /// Cache directory kept between stagings
    pub cache_dir: PathBuf,

    /// Directory for vendoring tools (defaults to a temp dir)
    #[arg(long)]
    pub deps_dir: Option<PathBuf>,

    /// Dependency catalog
    #[arg(long, default_value = CATALOG_FILE)]
    pub catalog: PathBuf,

    /// Where to write the release descriptor
    #[arg(long, default_value = DEFAULT_RELEASE_FILE)]
    pub release_file: PathBuf,

    /// Print the build plan as JSON instead of compiling
    #[arg(long)]
    pub plan: bool,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Application source directory
    pub build_dir: PathBuf,
}

#[derive(Args)]
pub struct ResolveVersionArgs {
    /// Version specifier, e.g. go1.6 or 1.7.x
    pub spec: String,

    /// Dependency catalog
    #[arg(long, default_value = CATALOG_FILE)]
    pub catalog: PathBuf,
}
