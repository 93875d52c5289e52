//! Configuration module

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Input files
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Frequency file column names
    #[serde(default)]
    pub frequency: FrequencyConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// Input file locations
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct InputsConfig {
    /// Single-token results
    pub single_token: Option<PathBuf>,
    /// Multi-token non-morphemic results
    pub multitok_nonmorph: Option<PathBuf>,
    /// Multi-token morphemic results
    pub multitok_morph: Option<PathBuf>,
    /// Word frequency table
    pub frequency: Option<PathBuf>,
}

/// Column names of the frequency table
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Column holding the word
    pub word_column: String,
    /// Column holding the log frequency
    pub value_column: String,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        let columns = agreement_core::FrequencyColumns::default();
        Self {
            word_column: columns.word,
            value_column: columns.value,
        }
    }
}

impl FrequencyConfig {
    pub fn columns(&self) -> agreement_core::FrequencyColumns {
        agreement_core::FrequencyColumns {
            word: self.word_column.clone(),
            value: self.value_column.clone(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Wide table destination
    pub path: Option<PathBuf>,
    /// Merged long-form table destination
    pub merged: Option<PathBuf>,
    /// Condition summary destination (default: stdout)
    pub summary: Option<PathBuf>,
    /// Summary format
    pub format: OutputFormat,
}

/// Processing-related configuration
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Fail on items without exactly one singular and one plural observation
    pub strict: bool,
}

impl CliConfig {
    /// Load a configuration file
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_relative_to(base);
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let paths = [
            &mut self.inputs.single_token,
            &mut self.inputs.multitok_nonmorph,
            &mut self.inputs.multitok_morph,
            &mut self.inputs.frequency,
            &mut self.output.path,
            &mut self.output.merged,
            &mut self.output.summary,
        ];
        for path in paths.into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
