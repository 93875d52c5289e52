//! Grammatical number categories

use std::fmt;

/// Normalize a raw label: trim, lowercase, `-` and spaces become `_`
fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// True grammatical number of the noun in an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammaticalNumber {
    /// Singular noun
    Singular,
    /// Plural noun
    Plural,
    /// Plural analyzed as a singular base plus an explicit plural affix token
    CompositionalPlural,
}

impl GrammaticalNumber {
    /// Parse a `word_number` label
    ///
    /// Returns `None` for labels outside the covered set; such items are
    /// never scored.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "singular" | "sg" => Some(Self::Singular),
            "plural" | "pl" => Some(Self::Plural),
            "compositional_plural" | "plural_compositional" | "compositional" => {
                Some(Self::CompositionalPlural)
            }
            _ => None,
        }
    }

    /// Whether the model should favor the plural article for this noun
    pub fn expects_plural(self) -> bool {
        !matches!(self, Self::Singular)
    }
}

/// Number of a candidate article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArticleNumber {
    /// Singular article (el, la, un, una)
    Singular,
    /// Plural article (los, las, unos, unas)
    Plural,
}

impl ArticleNumber {
    /// Parse an `article_number` label
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "singular" | "sg" => Some(Self::Singular),
            "plural" | "pl" => Some(Self::Plural),
            _ => None,
        }
    }

    /// Canonical label written to output files
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Singular => "singular",
            Self::Plural => "plural",
        }
    }
}

impl fmt::Display for ArticleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
