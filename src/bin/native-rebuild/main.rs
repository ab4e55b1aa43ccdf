//! native-rebuild CLI - rebuild native Node add-ons for Electron

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("native_rebuild=debug")
    } else {
        EnvFilter::new("native_rebuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Rebuild(args) => commands::rebuild::execute(args, cli.verbose),
        Commands::Classify(args) => commands::classify::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
