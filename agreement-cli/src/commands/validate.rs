//! Validate command implementation

use agreement_core::frequency::{join_frequencies, FrequencyTable};
use agreement_core::loader::{load_frequencies, load_observations};
use agreement_core::reshape::{pivot, ReshapeMode};
use agreement_core::FrequencyColumns;
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use super::init_logging;
use crate::error::CliError;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Observation files to check
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Frequency table to check, and to measure join coverage against
    #[arg(long, value_name = "FILE")]
    pub frequency: Option<PathBuf>,

    /// Word column of the frequency table
    #[arg(long, value_name = "NAME", default_value = "Word")]
    pub word_column: String,

    /// Log frequency column of the frequency table
    #[arg(long, value_name = "NAME", default_value = "Log10(freq count+1)")]
    pub value_column: String,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false);

        let mut failed = 0;

        let frequencies = match &self.frequency {
            Some(path) => match self.check_frequency(path) {
                Some(table) => Some(table),
                None => {
                    failed += 1;
                    None
                }
            },
            None => None,
        };

        for file in &self.files {
            if !check_observations(file, frequencies.as_ref()) {
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(CliError::ValidationFailed(failed).into());
        }
        Ok(())
    }

    fn check_frequency(&self, path: &Path) -> Option<FrequencyTable> {
        println!("Validating frequency table: {}", path.display());
        let columns = FrequencyColumns {
            word: self.word_column.clone(),
            value: self.value_column.clone(),
        };
        match load_frequencies(path, &columns) {
            Ok(table) => {
                println!("✓ Frequency table is valid!");
                println!("  Words: {}", table.len());
                Some(table)
            }
            Err(e) => {
                println!("✗ Frequency table is invalid!");
                println!("  Error: {e}");
                None
            }
        }
    }
}

/// Load and pivot one observation file, printing what was found
fn check_observations(path: &Path, frequencies: Option<&FrequencyTable>) -> bool {
    println!("Validating observations: {}", path.display());

    let observations = match load_observations(path) {
        Ok(observations) => observations,
        Err(e) => {
            println!("✗ File is invalid!");
            println!("  Error: {e}");
            return false;
        }
    };

    // Lenient pivots cannot fail; anomalies are counted instead.
    let reshaped = match pivot(&observations, ReshapeMode::Lenient) {
        Ok(reshaped) => reshaped,
        Err(e) => {
            println!("✗ File is invalid!");
            println!("  Error: {e}");
            return false;
        }
    };
    let report = reshaped.report;

    println!("✓ File is valid!");
    println!("  Rows: {}", observations.len());
    println!("  Items: {}", report.items);
    if !report.is_clean() {
        println!("  Incomplete items: {}", report.incomplete_items);
        println!("  Duplicate observations: {}", report.duplicate_observations);
        println!(
            "  Unknown article numbers: {}",
            report.unknown_article_numbers
        );
        println!("  (these fail under --strict)");
    }

    if let Some(table) = frequencies {
        let warning = join_frequencies(&reshaped.items, table).warning;
        println!(
            "  Frequency coverage: {} of {} items",
            warning.input_rows - warning.dropped,
            warning.input_rows
        );
    }

    true
}
