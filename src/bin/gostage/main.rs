//! gostage CLI - stages Go applications for the platform

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gostage::core::StageError;
use gostage::util::diagnostic::emit;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gostage=debug")
    } else {
        EnvFilter::new("gostage=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<StageError>() {
            Some(err) => emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compile(args) => commands::compile::execute(args),
        Commands::Detect(args) => commands::detect::execute(args),
        Commands::ResolveVersion(args) => commands::resolve_version::execute(args),
    }
}
