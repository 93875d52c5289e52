//! JSON summary formatter

use super::OutputFormatter;
use agreement_core::ConditionSummary;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// JSON formatter - collects conditions and writes one document on finish
pub struct JsonFormatter<W: Write> {
    writer: W,
    conditions: Vec<ConditionSummary>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    conditions: &'a [ConditionSummary],
    overall: &'a ConditionSummary,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            conditions: Vec::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_condition(&mut self, condition: &ConditionSummary) -> Result<()> {
        self.conditions.push(condition.clone());
        Ok(())
    }

    fn finish(&mut self, overall: &ConditionSummary) -> Result<()> {
        let document = SummaryDocument {
            conditions: &self.conditions,
            overall,
        };
        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
