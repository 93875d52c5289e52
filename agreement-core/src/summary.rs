//! Per-condition descriptive statistics over a scored table

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::Item;

/// Running sums for one condition
#[derive(Debug, Default)]
struct Accumulator {
    items: usize,
    correct: usize,
    scored: usize,
    log_odds_sum: f64,
    log_odds_n: usize,
    surprisal_diff_sum: f64,
    surprisal_diff_n: usize,
}

impl Accumulator {
    fn add(&mut self, item: &Item) {
        self.items += 1;
        if let Some(accuracy) = item.accuracy {
            self.scored += 1;
            self.correct += usize::from(accuracy);
        }
        if let Some(log_odds) = item.log_odds.filter(|v| v.is_finite()) {
            self.log_odds_sum += log_odds;
            self.log_odds_n += 1;
        }
        if let Some(diff) = item.surprisal_diff.filter(|v| v.is_finite()) {
            self.surprisal_diff_sum += diff;
            self.surprisal_diff_n += 1;
        }
    }

    fn finish(self, source: &str, tokenization_type: &str, word_number: &str) -> ConditionSummary {
        let mean = |sum: f64, n: usize| (n > 0).then(|| sum / n as f64);
        ConditionSummary {
            source: source.to_string(),
            tokenization_type: tokenization_type.to_string(),
            word_number: word_number.to_string(),
            items: self.items,
            scored: self.scored,
            accuracy: mean(self.correct as f64, self.scored),
            mean_log_odds: mean(self.log_odds_sum, self.log_odds_n),
            mean_surprisal_diff: mean(self.surprisal_diff_sum, self.surprisal_diff_n),
        }
    }
}

/// Statistics for one (source, tokenization type, word number) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionSummary {
    pub source: String,
    pub tokenization_type: String,
    pub word_number: String,
    /// Items in the condition
    pub items: usize,
    /// Items with an accuracy label
    pub scored: usize,
    /// Mean accuracy over scored items
    pub accuracy: Option<f64>,
    /// Mean over finite log-odds
    pub mean_log_odds: Option<f64>,
    /// Mean over finite surprisal differences
    pub mean_surprisal_diff: Option<f64>,
}

/// Condition table plus an overall row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Conditions sorted by key
    pub conditions: Vec<ConditionSummary>,
    pub overall: ConditionSummary,
}

/// Label used for the pooled row's key columns
pub const ALL_CONDITIONS: &str = "all";

/// Group scored items by condition and summarize each group
pub fn summarize(items: &[Item]) -> Summary {
    let mut groups: BTreeMap<(&str, &str, &str), Accumulator> = BTreeMap::new();
    let mut overall = Accumulator::default();

    for item in items {
        let key = (
            item.key.source.as_str(),
            item.key.tokenization_type.as_str(),
            item.key.word_number.as_str(),
        );
        groups.entry(key).or_default().add(item);
        overall.add(item);
    }

    let conditions = groups
        .into_iter()
        .map(|((source, tokenization_type, word_number), acc)| {
            acc.finish(source, tokenization_type, word_number)
        })
        .collect();

    Summary {
        conditions,
        overall: overall.finish(ALL_CONDITIONS, ALL_CONDITIONS, ALL_CONDITIONS),
    }
}
