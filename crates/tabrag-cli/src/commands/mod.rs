//! Command implementations

mod ask;
mod build;
mod config;
mod inspect;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Inspect(ref args) => inspect::execute(args, &output),
        Commands::Build(ref args) => build::execute(&cli, args, &output).await,
        Commands::Ask(ref args) => ask::execute(&cli, args, &output).await,
        Commands::Config => config::execute(&cli, &output),
    }
}
