//! Reshaping and scoring of language-model article agreement results
//!
//! The input is model output about Spanish article/noun number agreement:
//! one row per (item, candidate article number) with the probability and
//! surprisal the model assigned to that article. The crate turns three such
//! result files (single-token, multi-token non-morphemic and multi-token
//! morphemic tokenizations) into one wide analysis table.
//!
//! # Stages
//!
//! - [`loader`]: read observation and frequency CSVs, checking their schema
//! - [`merger`]: concatenate the result sets, dropping the artificial rows
//!   of the morphemic file
//! - [`reshape`]: pivot to one row per item and derive `log_odds` and
//!   `surprisal_diff`
//! - [`scorer`]: label each item correct or incorrect from the sign of its
//!   log-odds
//! - [`frequency`]: inner-join lemma and word-form corpus frequencies
//!
//! [`pipeline::Pipeline`] chains them and [`writer`] persists the result.
//!
//! # Example
//!
//! ```rust
//! use agreement_core::domain::{ArticleNumber, ItemKey, Observation};
//! use agreement_core::reshape::{pivot, ReshapeMode};
//! use agreement_core::scorer::score_items;
//!
//! let key = ItemKey {
//!     lemma: "gato".into(),
//!     sentence: "1".into(),
//!     word_form: "gato".into(),
//!     source: "single-token".into(),
//!     tokenization_type: "default".into(),
//!     word_number: "singular".into(),
//!     article_type: "definite".into(),
//!     affix: String::new(),
//! };
//! let observations = vec![
//!     Observation::from_key(&key, ArticleNumber::Singular, 0.8, 0.32),
//!     Observation::from_key(&key, ArticleNumber::Plural, 0.2, 2.32),
//! ];
//!
//! let reshaped = pivot(&observations, ReshapeMode::Strict).unwrap();
//! let items = score_items(reshaped.items);
//! assert_eq!(items[0].accuracy, Some(1));
//! ```

pub mod domain;
pub mod error;
pub mod frequency;
pub mod loader;
pub mod merger;
pub mod pipeline;
pub mod reshape;
pub mod scorer;
pub mod summary;
pub mod writer;

// Re-export key types
pub use domain::{ArticleNumber, GrammaticalNumber, Item, ItemKey, Observation};
pub use error::{CoreError, Result};
pub use frequency::{FrequencyColumns, FrequencyTable, JoinMismatchWarning, WithFrequency};
pub use pipeline::{InputPaths, Pipeline, PipelineConfig, PipelineOutput, PipelineReport, Stage};
pub use reshape::{ReshapeMode, ReshapeReport};
pub use summary::{ConditionSummary, Summary};
