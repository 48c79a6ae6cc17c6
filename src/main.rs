//! Kiln CLI - incremental build orchestrator
//!
//! Usage: kiln <COMMAND>
//!
//! Commands:
//!   build   Build once (or keep rebuilding with --watch)
//!   watch   Build and rebuild on changes

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { watch, args } => {
            commands::build::cmd_build(&args, watch, cli.json, cli.verbose, cli.color)
        }
        Commands::Watch { args } => {
            commands::build::cmd_build(&args, true, cli.json, cli.verbose, cli.color)
        }
    }
}
