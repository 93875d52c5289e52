//! Corpus frequency lookups and the inner join onto item tables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::{Item, Observation};

/// Header names of the frequency file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyColumns {
    /// Column holding the word string
    pub word: String,
    /// Column holding the log frequency
    pub value: String,
}

impl Default for FrequencyColumns {
    fn default() -> Self {
        Self {
            word: "Word".to_string(),
            value: "Log10(freq count+1)".to_string(),
        }
    }
}

/// Word to log-frequency map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    entries: HashMap<String, f64>,
}

impl FrequencyTable {
    /// Insert a word unless it is already present
    ///
    /// Returns `false` when the word was a duplicate and the existing value
    /// was kept.
    pub fn insert(&mut self, word: String, log_freq: f64) -> bool {
        match self.entries.entry(word) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(log_freq);
                true
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.entries.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (word, log_freq) in iter {
            table.insert(word, log_freq);
        }
        table
    }
}

/// Rows that can be joined against a frequency table
pub trait FrequencyKeys {
    fn lemma(&self) -> &str;
    fn word_form(&self) -> &str;
}

impl FrequencyKeys for Item {
    fn lemma(&self) -> &str {
        &self.key.lemma
    }

    fn word_form(&self) -> &str {
        &self.key.word_form
    }
}

impl FrequencyKeys for Observation {
    fn lemma(&self) -> &str {
        &self.lemma
    }

    fn word_form(&self) -> &str {
        &self.word_form
    }
}

/// A row with both frequency projections attached
#[derive(Debug, Clone, PartialEq)]
pub struct WithFrequency<T> {
    pub row: T,
    /// Log frequency of the row's lemma
    pub log_freq_lemma: f64,
    /// Log frequency of the row's word form
    pub log_freq_wordform: f64,
}

/// Rows dropped by the inner join
///
/// A row missing both lookups counts once in each field, so the fields may
/// sum to more than `dropped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinMismatchWarning {
    /// Rows offered to the join
    pub input_rows: usize,
    /// Rows removed
    pub dropped: usize,
    /// Rows whose lemma is not in the table
    pub missing_lemma: usize,
    /// Rows whose word form is not in the table
    pub missing_wordform: usize,
}

impl JoinMismatchWarning {
    pub fn is_empty(&self) -> bool {
        self.dropped == 0
    }
}

impl fmt::Display for JoinMismatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frequency join dropped {} of {} rows ({} without lemma frequency, {} without word form frequency)",
            self.dropped, self.input_rows, self.missing_lemma, self.missing_wordform
        )
    }
}

/// Result of a frequency join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome<T> {
    pub rows: Vec<WithFrequency<T>>,
    pub warning: JoinMismatchWarning,
}

/// Inner-join lemma and word-form frequencies onto `rows`
///
/// Matching is by exact string. Rows missing either lookup are dropped and
/// counted; row order is preserved otherwise.
pub fn join_frequencies<T>(rows: &[T], table: &FrequencyTable) -> JoinOutcome<T>
where
    T: FrequencyKeys + Clone,
{
    let mut warning = JoinMismatchWarning {
        input_rows: rows.len(),
        ..Default::default()
    };

    let joined: Vec<WithFrequency<T>> = rows
        .iter()
        .filter_map(|row| {
            let lemma = table.get(row.lemma());
            let wordform = table.get(row.word_form());
            if lemma.is_none() {
                warning.missing_lemma += 1;
            }
            if wordform.is_none() {
                warning.missing_wordform += 1;
            }
            match (lemma, wordform) {
                (Some(log_freq_lemma), Some(log_freq_wordform)) => Some(WithFrequency {
                    row: row.clone(),
                    log_freq_lemma,
                    log_freq_wordform,
                }),
                _ => None,
            }
        })
        .collect();

    warning.dropped = rows.len() - joined.len();
    if !warning.is_empty() {
        log::warn!("{warning}");
    }

    JoinOutcome {
        rows: joined,
        warning,
    }
}
