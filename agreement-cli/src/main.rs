//! Command-line entry point for the article agreement analysis pipeline

use agreement_cli::commands::Commands;
use anyhow::Result;
use clap::Parser;

/// Reshape and score language-model article agreement results
#[derive(Debug, Parser)]
#[command(name = "agreement", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
