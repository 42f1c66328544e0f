//! toolset CLI - tool list reconciliation for managed C/C++ builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolset::core::ManifestError;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Exit status of `check` when a resource reports an error.
const EXIT_FINDINGS: i32 = 2;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_FINDINGS),
        Err(e) => {
            match e.downcast::<ManifestError>() {
                Ok(manifest) => eprintln!("{:?}", miette::Report::new(manifest)),
                Err(e) => eprintln!("error: {:#}", e),
            }
            std::process::exit(1);
        }
    }
}

/// Run the command; `Ok(false)` reports findings that should fail the run.
fn run() -> Result<bool> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("toolset=debug")
    } else {
        EnvFilter::new("toolset=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, color).map(|_| true),
        Commands::Check(args) => commands::check::execute(args, color),
        Commands::Switch(args) => commands::switch::execute(args, color).map(|_| true),
        Commands::Completions(args) => commands::completions::execute(args).map(|_| true),
    }
}
