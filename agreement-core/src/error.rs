//! Error types for the analysis pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ItemKey;

/// Pipeline errors
///
/// Every variant is fatal for the run. Non-fatal conditions (items dropped
/// by the frequency join, lenient reshape anomalies) are reported as values
/// instead, see [`crate::frequency::JoinMismatchWarning`] and
/// [`crate::reshape::ReshapeReport`].
#[derive(Error, Debug)]
pub enum CoreError {
    /// Required columns are absent from an input file
    #[error("schema error in '{}': missing column(s) {}", .path.display(), .missing.join(", "))]
    Schema {
        /// File that was checked
        path: PathBuf,
        /// Every required column that was not found in the header
        missing: Vec<String>,
    },

    /// A pivot group did not hold exactly one singular and one plural row
    #[error(
        "malformed group {key}: expected one singular and one plural observation, \
         found {singular} singular and {plural} plural"
    )]
    MalformedGroup {
        /// Natural key of the offending item
        key: Box<ItemKey>,
        /// Number of singular observations in the group
        singular: usize,
        /// Number of plural observations in the group
        plural: usize,
    },

    /// An observation carries an article number outside {singular, plural}
    #[error("unknown article number '{value}' for item {key}")]
    UnknownArticleNumber {
        /// Raw value found in the `article_number` column
        value: String,
        /// Natural key of the item the observation belongs to
        key: Box<ItemKey>,
    },

    /// CSV decoding or encoding failed
    #[error("CSV error in '{}': {source}", .path.display())]
    Csv {
        /// File being read or written
        path: PathBuf,
        /// Underlying CSV error, including the line when known
        source: csv::Error,
    },

    /// A cell could not be parsed as the expected type
    #[error("invalid value '{value}' in column '{column}' of '{}' at line {line}", .path.display())]
    InvalidValue {
        /// File being read
        path: PathBuf,
        /// 1-based line number of the record
        line: u64,
        /// Column header
        column: String,
        /// Raw cell content
        value: String,
    },

    /// I/O error
    #[error("I/O error for '{}': {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Invalid pipeline configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoreError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_all_columns() {
        let error = CoreError::Schema {
            path: PathBuf::from("results.csv"),
            missing: vec!["surprisal".to_string(), "affix".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "schema error in 'results.csv': missing column(s) surprisal, affix"
        );
    }

    #[test]
    fn test_malformed_group_display() {
        let key = ItemKey {
            lemma: "casa".to_string(),
            sentence: "s1".to_string(),
            word_form: "casas".to_string(),
            source: "single-token".to_string(),
            tokenization_type: "default".to_string(),
            word_number: "plural".to_string(),
            article_type: "definite".to_string(),
            affix: "s".to_string(),
        };
        let error = CoreError::MalformedGroup {
            key: Box::new(key),
            singular: 1,
            plural: 0,
        };
        let message = error.to_string();
        assert!(message.contains("casas"));
        assert!(message.contains("found 1 singular and 0 plural"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let error = CoreError::io(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(error.to_string().starts_with("I/O error for 'missing.csv'"));
        assert!(error.source().is_some());
    }
}
