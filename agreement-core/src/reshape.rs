//! Long-to-wide pivot of observations and its inverse
//!
//! Each item is expected to carry exactly one singular and one plural
//! observation. How departures from that invariant are handled depends on
//! the [`ReshapeMode`]:
//!
//! - **Lenient**: absent sides become missing values (and so do the fields
//!   derived from them), duplicated sides keep their first observation and
//!   observations with an unrecognized article number are left out. Every
//!   anomaly is counted in the [`ReshapeReport`].
//! - **Strict**: the first anomaly aborts the pivot with an error.

use std::collections::BTreeMap;

use crate::domain::{ArticleNumber, Item, ItemKey, Observation};
use crate::error::{CoreError, Result};

/// How the pivot treats groups that break the two-observation invariant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReshapeMode {
    /// Propagate anomalies as missing values
    #[default]
    Lenient,
    /// Fail on the first anomaly
    Strict,
}

impl ReshapeMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Anomalies met while pivoting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReshapeReport {
    /// Items produced
    pub items: usize,
    /// Items lacking the singular or the plural side
    pub incomplete_items: usize,
    /// Observations dropped because their side was already filled
    pub duplicate_observations: usize,
    /// Observations dropped for an unrecognized article number
    pub unknown_article_numbers: usize,
}

impl ReshapeReport {
    /// Whether every item had exactly one observation per side
    pub fn is_clean(&self) -> bool {
        self.incomplete_items == 0
            && self.duplicate_observations == 0
            && self.unknown_article_numbers == 0
    }
}

/// Wide table produced by [`pivot`]
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    /// Items sorted by key
    pub items: Vec<Item>,
    pub report: ReshapeReport,
}

/// First (probability, surprisal) seen for each side plus side counts
#[derive(Debug, Default)]
struct Group {
    singular: Option<(f64, f64)>,
    plural: Option<(f64, f64)>,
    singular_count: usize,
    plural_count: usize,
}

impl Group {
    fn record(&mut self, article: ArticleNumber, value: (f64, f64)) -> bool {
        let (slot, count) = match article {
            ArticleNumber::Singular => (&mut self.singular, &mut self.singular_count),
            ArticleNumber::Plural => (&mut self.plural, &mut self.plural_count),
        };
        *count += 1;
        if slot.is_none() {
            *slot = Some(value);
            true
        } else {
            false
        }
    }
}

/// Pivot long-form observations into one wide item per natural key
///
/// Items come out sorted by [`ItemKey`]. Accuracy is left unscored.
pub fn pivot(observations: &[Observation], mode: ReshapeMode) -> Result<Reshaped> {
    let mut groups: BTreeMap<ItemKey, Group> = BTreeMap::new();
    let mut report = ReshapeReport::default();

    for observation in observations {
        let key = observation.key();
        let Some(article) = observation.article() else {
            if mode == ReshapeMode::Strict {
                return Err(CoreError::UnknownArticleNumber {
                    value: observation.article_number.clone(),
                    key: Box::new(key),
                });
            }
            log::debug!(
                "Skipping observation with article number '{}' for {}",
                observation.article_number,
                key
            );
            report.unknown_article_numbers += 1;
            groups.entry(key).or_default();
            continue;
        };

        let group = groups.entry(key).or_default();
        if !group.record(article, (observation.article_probs, observation.surprisal)) {
            report.duplicate_observations += 1;
        }
    }

    let mut items = Vec::with_capacity(groups.len());
    for (key, group) in groups {
        if group.singular_count != 1 || group.plural_count != 1 {
            if mode == ReshapeMode::Strict {
                return Err(CoreError::MalformedGroup {
                    key: Box::new(key),
                    singular: group.singular_count,
                    plural: group.plural_count,
                });
            }
            log::debug!(
                "Malformed group {}: {} singular, {} plural",
                key,
                group.singular_count,
                group.plural_count
            );
        }
        if group.singular.is_none() || group.plural.is_none() {
            report.incomplete_items += 1;
        }

        items.push(Item::new(
            key,
            group.singular.map(|(probs, _)| probs),
            group.plural.map(|(probs, _)| probs),
            group.singular.map(|(_, surprisal)| surprisal),
            group.plural.map(|(_, surprisal)| surprisal),
        ));
    }
    report.items = items.len();

    if !report.is_clean() {
        log::warn!(
            "Pivot anomalies: {} incomplete item(s), {} duplicate observation(s), \
             {} observation(s) with unknown article number",
            report.incomplete_items,
            report.duplicate_observations,
            report.unknown_article_numbers
        );
    }
    log::info!(
        "Pivoted {} observations into {} items",
        observations.len(),
        report.items
    );

    Ok(Reshaped { items, report })
}

/// Melt wide items back into long-form observations
///
/// Each item yields its singular then its plural observation; a side whose
/// probability or surprisal is missing is skipped.
pub fn melt(items: &[Item]) -> Vec<Observation> {
    let mut observations = Vec::with_capacity(items.len() * 2);
    for item in items {
        let sides = [
            (
                ArticleNumber::Singular,
                item.article_probs_singular,
                item.surprisal_singular,
            ),
            (
                ArticleNumber::Plural,
                item.article_probs_plural,
                item.surprisal_plural,
            ),
        ];
        for (article, probs, surprisal) in sides {
            if let (Some(probs), Some(surprisal)) = (probs, surprisal) {
                observations.push(Observation::from_key(&item.key, article, probs, surprisal));
            }
        }
    }
    observations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(word_form: &str, article_number: &str, probs: f64, surprisal: f64) -> Observation {
        Observation {
            source: "single-token".to_string(),
            tokenization_type: "default".to_string(),
            word_number: "singular".to_string(),
            article_type: "definite".to_string(),
            lemma: word_form.to_string(),
            sentence: "1".to_string(),
            word_form: word_form.to_string(),
            affix: String::new(),
            article_number: article_number.to_string(),
            article_probs: probs,
            surprisal,
        }
    }

    #[test]
    fn test_pivot_pairs_sides_and_derives_fields() {
        let observations = vec![
            observation("mesa", "plural", 0.2, 2.32),
            observation("mesa", "singular", 0.8, 0.32),
        ];

        let reshaped = pivot(&observations, ReshapeMode::Lenient).unwrap();
        assert_eq!(reshaped.items.len(), 1);
        assert!(reshaped.report.is_clean());

        let item = &reshaped.items[0];
        assert_eq!(item.article_probs_singular, Some(0.8));
        assert_eq!(item.article_probs_plural, Some(0.2));
        assert_eq!(item.surprisal_diff, Some(2.32 - 0.32));
        assert!((item.log_odds.unwrap() - (0.2f64 / 0.8).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_pivot_sorts_items_by_key() {
        let observations = vec![
            observation("zapato", "singular", 0.6, 0.5),
            observation("zapato", "plural", 0.4, 0.9),
            observation("arbol", "singular", 0.7, 0.4),
            observation("arbol", "plural", 0.3, 1.2),
        ];

        let reshaped = pivot(&observations, ReshapeMode::Lenient).unwrap();
        let forms: Vec<&str> = reshaped
            .items
            .iter()
            .map(|i| i.key.word_form.as_str())
            .collect();
        assert_eq!(forms, vec!["arbol", "zapato"]);
    }

    #[test]
    fn test_lenient_missing_side_yields_missing_values() {
        let observations = vec![observation("luz", "singular", 0.9, 0.1)];

        let reshaped = pivot(&observations, ReshapeMode::Lenient).unwrap();
        let item = &reshaped.items[0];
        assert_eq!(item.article_probs_plural, None);
        assert_eq!(item.log_odds, None);
        assert_eq!(item.surprisal_diff, None);
        assert_eq!(reshaped.report.incomplete_items, 1);
    }

    #[test]
    fn test_lenient_duplicate_keeps_first() {
        let observations = vec![
            observation("pez", "singular", 0.6, 0.5),
            observation("pez", "plural", 0.4, 0.9),
            observation("pez", "plural", 0.1, 3.3),
        ];

        let reshaped = pivot(&observations, ReshapeMode::Lenient).unwrap();
        assert_eq!(reshaped.items[0].article_probs_plural, Some(0.4));
        assert_eq!(reshaped.report.duplicate_observations, 1);
    }

    #[test]
    fn test_lenient_unknown_article_number_is_counted() {
        let observations = vec![
            observation("voz", "singular", 0.6, 0.5),
            observation("voz", "dual", 0.4, 0.9),
        ];

        let reshaped = pivot(&observations, ReshapeMode::Lenient).unwrap();
        assert_eq!(reshaped.items.len(), 1);
        assert_eq!(reshaped.report.unknown_article_numbers, 1);
        assert_eq!(reshaped.report.incomplete_items, 1);
    }

    #[test]
    fn test_strict_rejects_single_member_group() {
        let observations = vec![observation("luz", "singular", 0.9, 0.1)];

        match pivot(&observations, ReshapeMode::Strict) {
            Err(CoreError::MalformedGroup {
                singular, plural, ..
            }) => {
                assert_eq!(singular, 1);
                assert_eq!(plural, 0);
            }
            other => panic!("expected malformed group, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_rejects_three_member_group() {
        let observations = vec![
            observation("pez", "singular", 0.6, 0.5),
            observation("pez", "plural", 0.4, 0.9),
            observation("pez", "singular", 0.5, 0.7),
        ];

        assert!(matches!(
            pivot(&observations, ReshapeMode::Strict),
            Err(CoreError::MalformedGroup { singular: 2, plural: 1, .. })
        ));
    }

    #[test]
    fn test_strict_rejects_unknown_article_number() {
        let observations = vec![observation("voz", "both", 0.6, 0.5)];
        assert!(matches!(
            pivot(&observations, ReshapeMode::Strict),
            Err(CoreError::UnknownArticleNumber { .. })
        ));
    }

    #[test]
    fn test_melt_restores_observations() {
        let observations = vec![
            observation("mesa", "singular", 0.8, 0.32),
            observation("mesa", "plural", 0.2, 2.32),
        ];

        let reshaped = pivot(&observations, ReshapeMode::Strict).unwrap();
        assert_eq!(melt(&reshaped.items), observations);
    }

    #[test]
    fn test_melt_skips_missing_sides() {
        let observations = vec![observation("luz", "plural", 0.9, 0.1)];
        let reshaped = pivot(&observations, ReshapeMode::Lenient).unwrap();

        let melted = melt(&reshaped.items);
        assert_eq!(melted.len(), 1);
        assert_eq!(melted[0].article_number, "plural");
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(ReshapeMode::from_strict(true), ReshapeMode::Strict);
        assert_eq!(ReshapeMode::from_strict(false), ReshapeMode::Lenient);
        assert_eq!(ReshapeMode::default(), ReshapeMode::Lenient);
    }
}
