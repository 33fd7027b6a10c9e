//! Libforge CLI - build and package third-party native libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use libforge::ForgeError;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("libforge=debug")
    } else {
        EnvFilter::new("libforge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ForgeError>() {
            Some(err) => eprintln!("{}", err.to_diagnostic().format(color)),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let color = !cli.no_color;

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, color),
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Recipes => commands::recipes::execute(),
    }
}
