//! End-to-end orchestration: load, merge, pivot, score, join, write

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Item, Observation};
use crate::error::{CoreError, Result};
use crate::frequency::{join_frequencies, FrequencyColumns, JoinMismatchWarning, WithFrequency};
use crate::loader::{check_schema, load_frequencies, load_observations};
use crate::merger::{merge, SourceSets};
use crate::reshape::{pivot, ReshapeMode, ReshapeReport};
use crate::scorer::score_items;
use crate::summary::{summarize, Summary};
use crate::writer::{stage_items, stage_joined_items, stage_observations};

/// Paths of the three observation files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub single_token: PathBuf,
    pub multitok_nonmorph: PathBuf,
    pub multitok_morph: PathBuf,
}

/// Frequency file and its column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyInput {
    pub path: PathBuf,
    pub columns: FrequencyColumns,
}

/// Everything a pipeline run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub inputs: InputPaths,
    /// Joined onto the wide table when present
    pub frequency: Option<FrequencyInput>,
    /// Destination of the wide table
    pub output: PathBuf,
    /// Optional destination of the merged long-form table
    pub merged_output: Option<PathBuf>,
    /// Destination of the condition summary. The caller writes it; it is
    /// listed here so it takes part in the overwrite check.
    pub summary_output: Option<PathBuf>,
    pub mode: ReshapeMode,
}

impl PipelineConfig {
    /// Configuration with no frequency join, lenient mode
    pub fn new(inputs: InputPaths, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            frequency: None,
            output: output.into(),
            merged_output: None,
            summary_output: None,
            mode: ReshapeMode::Lenient,
        }
    }

    pub fn with_frequency(mut self, path: impl Into<PathBuf>, columns: FrequencyColumns) -> Self {
        self.frequency = Some(FrequencyInput {
            path: path.into(),
            columns,
        });
        self
    }

    pub fn with_merged_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.merged_output = Some(path.into());
        self
    }

    pub fn with_summary_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_output = Some(path.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.mode = ReshapeMode::from_strict(strict);
        self
    }

    /// Reject configurations that would overwrite an input, or write two
    /// outputs to the same file
    pub fn validate(&self) -> Result<()> {
        let inputs: Vec<&Path> = [
            Some(self.inputs.single_token.as_path()),
            Some(self.inputs.multitok_nonmorph.as_path()),
            Some(self.inputs.multitok_morph.as_path()),
            self.frequency.as_ref().map(|f| f.path.as_path()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let outputs: Vec<&Path> = std::iter::once(self.output.as_path())
            .chain(self.merged_output.as_deref())
            .chain(self.summary_output.as_deref())
            .collect();

        for (i, output) in outputs.iter().enumerate() {
            if inputs.iter().any(|input| same_file(input, output)) {
                return Err(CoreError::Config(format!(
                    "output '{}' would overwrite an input file",
                    output.display()
                )));
            }
            if let Some(other) = outputs[..i].iter().find(|other| same_file(other, output)) {
                return Err(CoreError::Config(format!(
                    "outputs '{}' and '{}' must be different files",
                    other.display(),
                    output.display()
                )));
            }
        }
        Ok(())
    }
}

/// Absolute form of `path` with `.`, `..` and symlinks resolved as far as
/// the filesystem allows
///
/// A file that does not exist yet is resolved through its parent.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            fs::canonicalize(parent)
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    a == b || resolve(a) == resolve(b)
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Merge,
    Reshape,
    Score,
    Join,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Load,
        Stage::Merge,
        Stage::Reshape,
        Stage::Score,
        Stage::Join,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Load => "loading results",
            Stage::Merge => "merging result sets",
            Stage::Reshape => "pivoting to wide form",
            Stage::Score => "scoring accuracy",
            Stage::Join => "joining frequencies",
        }
    }
}

/// Row counts and anomalies of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub single_token_rows: usize,
    pub multitok_nonmorph_rows: usize,
    pub multitok_morph_rows: usize,
    pub artificial_excluded: usize,
    pub merged_rows: usize,
    pub reshape: ReshapeReport,
    /// Items with an accuracy label
    pub scored_items: usize,
    /// Present when a frequency join ran
    pub join: Option<JoinMismatchWarning>,
}

/// Tables produced by a run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Merged long-form table
    pub merged: Vec<Observation>,
    /// Scored wide table
    pub items: Vec<Item>,
    /// Frequency-joined wide table, when a frequency file was configured
    pub joined: Option<Vec<WithFrequency<Item>>>,
    pub report: PipelineReport,
}

impl PipelineOutput {
    pub fn summary(&self) -> Summary {
        summarize(&self.items)
    }
}

/// Single-pass analysis pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage in memory
    pub fn run(&self) -> Result<PipelineOutput> {
        self.run_with_progress(|_| {})
    }

    /// Run every stage, calling `on_stage` as each one starts
    pub fn run_with_progress<F>(&self, mut on_stage: F) -> Result<PipelineOutput>
    where
        F: FnMut(Stage),
    {
        let inputs = &self.config.inputs;

        on_stage(Stage::Load);
        // Headers first, so a schema problem in any file surfaces before
        // the others are parsed.
        for path in [
            &inputs.single_token,
            &inputs.multitok_nonmorph,
            &inputs.multitok_morph,
        ] {
            check_schema(path, &Observation::REQUIRED_COLUMNS)?;
        }
        if let Some(frequency) = &self.config.frequency {
            check_schema(
                &frequency.path,
                &[frequency.columns.word.as_str(), frequency.columns.value.as_str()],
            )?;
        }

        let sets = SourceSets {
            single_token: load_observations(&inputs.single_token)?,
            multitok_nonmorph: load_observations(&inputs.multitok_nonmorph)?,
            multitok_morph: load_observations(&inputs.multitok_morph)?,
        };
        let frequencies = self
            .config
            .frequency
            .as_ref()
            .map(|f| load_frequencies(&f.path, &f.columns))
            .transpose()?;

        let mut report = PipelineReport {
            single_token_rows: sets.single_token.len(),
            multitok_nonmorph_rows: sets.multitok_nonmorph.len(),
            multitok_morph_rows: sets.multitok_morph.len(),
            ..Default::default()
        };

        on_stage(Stage::Merge);
        let merged = merge(sets);
        report.artificial_excluded = merged.artificial_excluded;
        report.merged_rows = merged.observations.len();

        on_stage(Stage::Reshape);
        let reshaped = pivot(&merged.observations, self.config.mode)?;
        report.reshape = reshaped.report;

        on_stage(Stage::Score);
        let items = score_items(reshaped.items);
        report.scored_items = items.iter().filter(|i| i.accuracy.is_some()).count();

        let joined = match frequencies {
            Some(table) => {
                on_stage(Stage::Join);
                let outcome = join_frequencies(&items, &table);
                report.join = Some(outcome.warning);
                Some(outcome.rows)
            }
            None => None,
        };

        Ok(PipelineOutput {
            merged: merged.observations,
            items,
            joined,
            report,
        })
    }

    /// Write the tables of a finished run to the configured destinations
    ///
    /// Every table is staged before any is committed, so a table that
    /// cannot be written leaves none of them behind.
    pub fn write(&self, output: &PipelineOutput) -> Result<()> {
        let mut staged = vec![match &output.joined {
            Some(rows) => stage_joined_items(&self.config.output, rows)?,
            None => stage_items(&self.config.output, &output.items)?,
        }];
        if let Some(path) = &self.config.merged_output {
            staged.push(stage_observations(path, &output.merged)?);
        }

        for table in staged {
            table.commit()?;
        }
        Ok(())
    }

    /// Run and write; nothing is written unless every stage succeeds
    pub fn execute(&self) -> Result<PipelineOutput> {
        let output = self.run()?;
        self.write(&output)?;
        Ok(output)
    }
}
