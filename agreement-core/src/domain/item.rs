//! Wide-form item records

use serde::{Deserialize, Serialize};
use std::fmt;

use super::number::GrammaticalNumber;

/// Natural key of an item: every observation column except the
/// article number and its two measurements
///
/// The derived ordering compares fields in declaration order and is the
/// row order of the wide table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub lemma: String,
    pub sentence: String,
    pub word_form: String,
    pub source: String,
    pub tokenization_type: String,
    pub word_number: String,
    pub article_type: String,
    pub affix: String,
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} / {} / sentence {} / {} / {} / {} / {} / affix '{}')",
            self.lemma,
            self.word_form,
            self.sentence,
            self.source,
            self.tokenization_type,
            self.word_number,
            self.article_type,
            self.affix
        )
    }
}

/// One row of the wide analysis table
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub key: ItemKey,
    pub article_probs_singular: Option<f64>,
    pub article_probs_plural: Option<f64>,
    pub surprisal_singular: Option<f64>,
    pub surprisal_plural: Option<f64>,
    /// `ln(article_probs_plural / article_probs_singular)`
    pub log_odds: Option<f64>,
    /// `surprisal_plural - surprisal_singular`
    pub surprisal_diff: Option<f64>,
    /// 1 when the sign of `log_odds` agrees with the noun's number
    pub accuracy: Option<u8>,
}

impl Item {
    /// Build an item from its measurements, deriving `log_odds` and
    /// `surprisal_diff`. Accuracy is left unscored.
    pub fn new(
        key: ItemKey,
        article_probs_singular: Option<f64>,
        article_probs_plural: Option<f64>,
        surprisal_singular: Option<f64>,
        surprisal_plural: Option<f64>,
    ) -> Self {
        let log_odds = match (article_probs_plural, article_probs_singular) {
            (Some(plural), Some(singular)) => Some((plural / singular).ln()),
            _ => None,
        };
        let surprisal_diff = match (surprisal_plural, surprisal_singular) {
            (Some(plural), Some(singular)) => Some(plural - singular),
            _ => None,
        };

        Self {
            key,
            article_probs_singular,
            article_probs_plural,
            surprisal_singular,
            surprisal_plural,
            log_odds,
            surprisal_diff,
            accuracy: None,
        }
    }

    /// Parsed true number of the noun
    pub fn grammatical_number(&self) -> Option<GrammaticalNumber> {
        GrammaticalNumber::parse(&self.key.word_number)
    }

    /// Whether both article sides were observed
    pub fn is_complete(&self) -> bool {
        self.article_probs_singular.is_some()
            && self.article_probs_plural.is_some()
            && self.surprisal_singular.is_some()
            && self.surprisal_plural.is_some()
    }
}
