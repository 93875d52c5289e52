//! Markdown summary formatter

use super::{format_stat, OutputFormatter};
use agreement_core::ConditionSummary;
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - outputs conditions as a markdown table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    condition_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            condition_count: 0,
        }
    }
}

impl<W: Write> OutputFormatter for MarkdownFormatter<W> {
    fn format_condition(&mut self, condition: &ConditionSummary) -> Result<()> {
        if self.condition_count == 0 {
            writeln!(
                self.writer,
                "| source | tokenization | word number | items | scored | accuracy | mean log-odds | mean surprisal diff |"
            )?;
            writeln!(self.writer, "|---|---|---|---:|---:|---:|---:|---:|")?;
        }
        self.condition_count += 1;
        writeln!(
            self.writer,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            condition.source,
            condition.tokenization_type,
            condition.word_number,
            condition.items,
            condition.scored,
            format_stat(condition.accuracy),
            format_stat(condition.mean_log_odds),
            format_stat(condition.mean_surprisal_diff)
        )?;
        Ok(())
    }

    fn finish(&mut self, overall: &ConditionSummary) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(
            self.writer,
            "*Total items: {} across {} conditions, {} scored, accuracy {}*",
            overall.items,
            self.condition_count,
            overall.scored,
            format_stat(overall.accuracy)
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
