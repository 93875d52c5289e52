//! Summarize command implementation

use agreement_core::loader::load_items;
use agreement_core::summary::summarize;
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use crate::output::{formatter, write_summary, OutputFormat};

/// Arguments for the summarize command
#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Wide table written by `agreement run`
    #[arg(short, long, value_name = "FILE", required = true)]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl SummarizeArgs {
    /// Execute the summarize command
    pub fn execute(&self) -> Result<()> {
        let items = load_items(&self.input)
            .with_context(|| format!("Failed to load {}", self.input.display()))?;
        let summary = summarize(&items);

        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let mut formatter = formatter(self.format, BufWriter::new(file));
                write_summary(formatter.as_mut(), &summary)
            }
            None => {
                let mut formatter = formatter(self.format, io::stdout().lock());
                write_summary(formatter.as_mut(), &summary)
            }
        }
    }
}
