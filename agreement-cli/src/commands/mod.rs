//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod generate_config;
pub mod run;
pub mod summarize;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the wide analysis table
    Run(run::RunArgs),

    /// Check observation and frequency files without running the pipeline
    Validate(validate::ValidateArgs),

    /// Print per-condition statistics of an existing wide table
    Summarize(summarize::SummarizeArgs),

    /// Write a configuration file template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Run(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::Summarize(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` takes precedence over the verbosity flag. A logger installed
/// by an earlier call is kept.
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
