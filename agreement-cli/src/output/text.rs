//! Plain text summary formatter

use super::{format_stat, OutputFormatter};
use agreement_core::ConditionSummary;
use anyhow::Result;
use std::io::Write;

/// Plain text formatter - outputs an aligned table, one condition per line
pub struct TextFormatter<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(
                self.writer,
                "{:<20} {:<14} {:<22} {:>6} {:>6} {:>9} {:>9} {:>9}",
                "source",
                "tokenization",
                "word_number",
                "items",
                "scored",
                "accuracy",
                "log_odds",
                "surp_diff"
            )?;
            self.header_written = true;
        }
        Ok(())
    }

    fn write_row(&mut self, condition: &ConditionSummary) -> Result<()> {
        writeln!(
            self.writer,
            "{:<20} {:<14} {:<22} {:>6} {:>6} {:>9} {:>9} {:>9}",
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
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_condition(&mut self, condition: &ConditionSummary) -> Result<()> {
        self.write_header()?;
        self.write_row(condition)
    }

    fn finish(&mut self, overall: &ConditionSummary) -> Result<()> {
        self.write_header()?;
        self.write_row(overall)?;
        self.writer.flush()?;
        Ok(())
    }
}
