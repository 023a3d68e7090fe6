mod cli;
mod commands;
mod error;
mod mcp;
mod page_range;
mod paths;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Interactive => {
            commands::interactive::run()?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Merge {
            inputs,
            output,
            force,
        } => {
            commands::merge::run(&inputs, &output, force)?;
        }
        Commands::Split {
            path,
            pages,
            output,
            force,
        } => {
            commands::split::run(&path, &pages, &output, force)?;
        }
        Commands::Compress {
            path,
            output,
            level,
            force,
        } => {
            commands::compress::run(&path, level, &output, force)?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries results and the MCP transport.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
