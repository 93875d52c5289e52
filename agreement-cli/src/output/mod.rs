//! Summary output formatting module

use agreement_core::{ConditionSummary, Summary};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Trait for summary formatters
pub trait OutputFormatter {
    /// Format and output one condition row
    fn format_condition(&mut self, condition: &ConditionSummary) -> Result<()>;

    /// Output the pooled row and finalize (e.g., close JSON document)
    fn finish(&mut self, overall: &ConditionSummary) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported summary formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text table
    #[default]
    Text,
    /// JSON document with conditions and overall statistics
    Json,
    /// Markdown table
    Markdown,
}

/// Build the formatter for `format` writing to `writer`
pub fn formatter<'w, W: Write + 'w>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputFormatter + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
    }
}

/// Write a whole summary through a formatter
pub fn write_summary(formatter: &mut dyn OutputFormatter, summary: &Summary) -> Result<()> {
    for condition in &summary.conditions {
        formatter.format_condition(condition)?;
    }
    formatter.finish(&summary.overall)
}

/// Render an optional statistic with four decimals, `NA` when missing
pub(crate) fn format_stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "NA".to_string())
}
