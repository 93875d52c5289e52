//! Run command implementation

use agreement_core::{InputPaths, Pipeline, PipelineConfig, PipelineReport};
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use super::init_logging;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::{formatter, write_summary, OutputFormat};
use crate::progress::ProgressReporter;

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Single-token results
    #[arg(long, value_name = "FILE")]
    pub single_token: Option<PathBuf>,

    /// Multi-token non-morphemic results
    #[arg(long, value_name = "FILE")]
    pub multitok_nonmorph: Option<PathBuf>,

    /// Multi-token morphemic results
    #[arg(long, value_name = "FILE")]
    pub multitok_morph: Option<PathBuf>,

    /// Word frequency table to inner-join onto the wide table
    #[arg(long, value_name = "FILE")]
    pub frequency: Option<PathBuf>,

    /// Destination of the wide table
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the merged long-form table
    #[arg(long, value_name = "FILE")]
    pub merged_output: Option<PathBuf>,

    /// Write the condition summary to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Fail on items without exactly one singular and one plural observation
    #[arg(long)]
    pub strict: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "AGREEMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Run settings after merging flags with the configuration file
#[derive(Debug)]
pub struct ResolvedRun {
    pub pipeline: PipelineConfig,
    pub summary: Option<PathBuf>,
    pub format: OutputFormat,
}

fn pick(flag: &Option<PathBuf>, configured: &Option<PathBuf>, name: &str) -> Result<PathBuf> {
    flag.clone()
        .or_else(|| configured.clone())
        .ok_or_else(|| CliError::MissingInput(name.to_string()).into())
}

impl RunArgs {
    /// Merge flags with the configuration file; flags win
    pub fn resolve(&self) -> Result<ResolvedRun> {
        let config = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };

        let inputs = InputPaths {
            single_token: pick(
                &self.single_token,
                &config.inputs.single_token,
                "--single-token",
            )?,
            multitok_nonmorph: pick(
                &self.multitok_nonmorph,
                &config.inputs.multitok_nonmorph,
                "--multitok-nonmorph",
            )?,
            multitok_morph: pick(
                &self.multitok_morph,
                &config.inputs.multitok_morph,
                "--multitok-morph",
            )?,
        };
        let output = pick(&self.output, &config.output.path, "--output")?;

        let mut pipeline = PipelineConfig::new(inputs, output)
            .strict(self.strict || config.processing.strict);
        if let Some(frequency) = self.frequency.clone().or(config.inputs.frequency) {
            pipeline = pipeline.with_frequency(frequency, config.frequency.columns());
        }
        if let Some(merged) = self.merged_output.clone().or(config.output.merged) {
            pipeline = pipeline.with_merged_output(merged);
        }
        let summary = self.summary.clone().or(config.output.summary);
        if let Some(summary) = &summary {
            pipeline = pipeline.with_summary_output(summary);
        }

        Ok(ResolvedRun {
            pipeline,
            summary,
            format: self.format.unwrap_or(config.output.format),
        })
    }

    /// Execute the run command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting analysis run");
        log::debug!("Arguments: {:?}", self);

        let resolved = self.resolve()?;
        let pipeline = Pipeline::new(resolved.pipeline)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let mut progress = ProgressReporter::new(self.quiet);
        let stages = if pipeline.config().frequency.is_some() { 5 } else { 4 };
        progress.init_stages(stages);

        let output = match pipeline.run_with_progress(|stage| progress.stage_started(stage)) {
            Ok(output) => output,
            Err(e) => {
                progress.abandon();
                return Err(e).context("Pipeline failed");
            }
        };
        pipeline
            .write(&output)
            .context("Failed to write analysis tables")?;
        progress.finish();

        log_report(&output.report);

        let summary = output.summary();
        match &resolved.summary {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let mut formatter = formatter(resolved.format, BufWriter::new(file));
                write_summary(formatter.as_mut(), &summary)?;
            }
            None => {
                let mut formatter = formatter(resolved.format, io::stdout().lock());
                write_summary(formatter.as_mut(), &summary)?;
            }
        }

        Ok(())
    }
}

fn log_report(report: &PipelineReport) {
    log::info!(
        "Rows read: {} single-token, {} multitok-nonmorph, {} multitok-morph",
        report.single_token_rows,
        report.multitok_nonmorph_rows,
        report.multitok_morph_rows
    );
    log::info!(
        "Merged {} rows ({} artificial rows excluded) into {} items, {} scored",
        report.merged_rows,
        report.artificial_excluded,
        report.reshape.items,
        report.scored_items
    );
    if let Some(join) = &report.join {
        log::info!(
            "Frequency join kept {} of {} items",
            join.input_rows - join.dropped,
            join.input_rows
        );
    }
}
