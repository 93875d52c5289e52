//! CSV output of long and wide tables
//!
//! Files are written to a temporary file beside the destination and
//! persisted only once every row has been written, so a failed run leaves
//! no partial table behind. Callers producing several tables stage all of
//! them first and commit only when every stage succeeded.

use csv::Writer;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::domain::{Item, Observation};
use crate::error::{CoreError, Result};
use crate::frequency::WithFrequency;

/// Header of the wide item table
pub const ITEM_HEADER: [&str; 15] = [
    "lemma",
    "sentence",
    "word_form",
    "source",
    "tokenization_type",
    "word_number",
    "article_type",
    "affix",
    "article_probs_singular",
    "article_probs_plural",
    "surprisal_singular",
    "surprisal_plural",
    "log_odds",
    "surprisal_diff",
    "accuracy",
];

/// Columns appended when frequencies are joined
pub const FREQUENCY_HEADER: [&str; 2] = ["log_freq_lemma", "log_freq_wordform"];

/// Shortest representation that parses back to the same value
fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn item_fields(item: &Item) -> Vec<String> {
    let key = &item.key;
    vec![
        key.lemma.clone(),
        key.sentence.clone(),
        key.word_form.clone(),
        key.source.clone(),
        key.tokenization_type.clone(),
        key.word_number.clone(),
        key.article_type.clone(),
        key.affix.clone(),
        format_value(item.article_probs_singular),
        format_value(item.article_probs_plural),
        format_value(item.surprisal_singular),
        format_value(item.surprisal_plural),
        format_value(item.log_odds),
        format_value(item.surprisal_diff),
        item.accuracy.map(|a| a.to_string()).unwrap_or_default(),
    ]
}

/// A fully written table waiting in a temporary file beside its destination
///
/// Dropping it without [`StagedTable::commit`] removes the temporary file
/// and leaves the destination untouched.
#[derive(Debug)]
pub struct StagedTable {
    temp_file: NamedTempFile,
    path: PathBuf,
    rows: usize,
}

impl StagedTable {
    /// Destination the table will be moved onto
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the table onto its destination
    pub fn commit(self) -> Result<()> {
        self.temp_file
            .persist(&self.path)
            .map_err(|e| CoreError::io(&self.path, e.error))?;
        log::info!("Wrote {} rows to {}", self.rows, self.path.display());
        Ok(())
    }
}

/// Run `write` against a temporary file in the destination directory
fn stage<F>(path: &Path, rows: usize, write: F) -> Result<StagedTable>
where
    F: FnOnce(&mut Writer<&mut File>) -> csv::Result<()>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| CoreError::io(parent, e))?;
    {
        let mut writer = Writer::from_writer(temp_file.as_file_mut());
        write(&mut writer).map_err(|e| CoreError::csv(path, e))?;
        writer.flush().map_err(|e| CoreError::io(path, e))?;
    }

    Ok(StagedTable {
        temp_file,
        path: path.to_path_buf(),
        rows,
    })
}

/// Stage the wide item table
pub fn stage_items(path: &Path, items: &[Item]) -> Result<StagedTable> {
    stage(path, items.len(), |writer| {
        writer.write_record(ITEM_HEADER)?;
        for item in items {
            writer.write_record(item_fields(item))?;
        }
        Ok(())
    })
}

/// Stage the wide item table with both frequency columns appended
pub fn stage_joined_items(path: &Path, rows: &[WithFrequency<Item>]) -> Result<StagedTable> {
    stage(path, rows.len(), |writer| {
        writer.write_record(ITEM_HEADER.iter().chain(FREQUENCY_HEADER.iter()))?;
        for joined in rows {
            let mut fields = item_fields(&joined.row);
            fields.push(joined.log_freq_lemma.to_string());
            fields.push(joined.log_freq_wordform.to_string());
            writer.write_record(fields)?;
        }
        Ok(())
    })
}

/// Stage a long-form observation table
pub fn stage_observations(path: &Path, observations: &[Observation]) -> Result<StagedTable> {
    stage(path, observations.len(), |writer| {
        for observation in observations {
            writer.serialize(observation)?;
        }
        // serialize() only emits the header with the first row
        if observations.is_empty() {
            writer.write_record(Observation::REQUIRED_COLUMNS)?;
        }
        Ok(())
    })
}

/// Write the wide item table
pub fn write_items(path: &Path, items: &[Item]) -> Result<()> {
    stage_items(path, items)?.commit()
}

/// Write the wide item table with both frequency columns appended
pub fn write_joined_items(path: &Path, rows: &[WithFrequency<Item>]) -> Result<()> {
    stage_joined_items(path, rows)?.commit()
}

/// Write a long-form observation table
pub fn write_observations(path: &Path, observations: &[Observation]) -> Result<()> {
    stage_observations(path, observations)?.commit()
}
