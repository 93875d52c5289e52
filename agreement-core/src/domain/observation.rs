//! Long-form observation records

use serde::{Deserialize, Serialize};

use super::item::ItemKey;
use super::number::ArticleNumber;

/// One (item, candidate article number) row of model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Tokenization family (single-token, multitok-nonmorph, multitok-morph)
    pub source: String,
    /// Segmentation used for the noun (default, morphemic, artificial)
    pub tokenization_type: String,
    /// True grammatical number of the noun
    pub word_number: String,
    /// Definite or indefinite article
    pub article_type: String,
    pub lemma: String,
    /// Sentence identifier
    pub sentence: String,
    pub word_form: String,
    pub affix: String,
    /// Number of the candidate article this row scores
    pub article_number: String,
    /// Model probability of the candidate article
    pub article_probs: f64,
    /// Negative log probability of the candidate article
    pub surprisal: f64,
}

impl Observation {
    /// Columns every observation file must carry
    pub const REQUIRED_COLUMNS: [&'static str; 11] = [
        "source",
        "tokenization_type",
        "word_number",
        "article_type",
        "lemma",
        "sentence",
        "word_form",
        "affix",
        "article_number",
        "article_probs",
        "surprisal",
    ];

    /// Natural key of the item this observation belongs to
    pub fn key(&self) -> ItemKey {
        ItemKey {
            lemma: self.lemma.clone(),
            sentence: self.sentence.clone(),
            word_form: self.word_form.clone(),
            source: self.source.clone(),
            tokenization_type: self.tokenization_type.clone(),
            word_number: self.word_number.clone(),
            article_type: self.article_type.clone(),
            affix: self.affix.clone(),
        }
    }

    /// Parsed candidate article number, if recognized
    pub fn article(&self) -> Option<ArticleNumber> {
        ArticleNumber::parse(&self.article_number)
    }

    /// Build an observation from an item key and one article side
    pub fn from_key(key: &ItemKey, article: ArticleNumber, probs: f64, surprisal: f64) -> Self {
        Self {
            source: key.source.clone(),
            tokenization_type: key.tokenization_type.clone(),
            word_number: key.word_number.clone(),
            article_type: key.article_type.clone(),
            lemma: key.lemma.clone(),
            sentence: key.sentence.clone(),
            word_form: key.word_form.clone(),
            affix: key.affix.clone(),
            article_number: article.as_str().to_string(),
            article_probs: probs,
            surprisal,
        }
    }
}
