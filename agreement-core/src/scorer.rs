//! Accuracy labels from the sign of the log-odds

use crate::domain::{GrammaticalNumber, Item};

/// Score one prediction
///
/// Returns 1 when the model favors the article matching the noun's number
/// (negative log-odds for singular nouns, positive for plural and
/// compositional plural ones) and 0 when it favors the other article. Ties,
/// NaN, a missing log-odds and uncovered numbers are left unscored.
pub fn accuracy(word_number: Option<GrammaticalNumber>, log_odds: Option<f64>) -> Option<u8> {
    let number = word_number?;
    let log_odds = log_odds?;

    let favors_plural = if log_odds > 0.0 {
        true
    } else if log_odds < 0.0 {
        false
    } else {
        // zero or NaN
        return None;
    };

    Some(u8::from(favors_plural == number.expects_plural()))
}

/// Score every item of a wide table
pub fn score_items(items: Vec<Item>) -> Vec<Item> {
    let scored: Vec<Item> = items
        .into_iter()
        .map(|mut item| {
            item.accuracy = accuracy(item.grammatical_number(), item.log_odds);
            item
        })
        .collect();

    let unscored = scored.iter().filter(|i| i.accuracy.is_none()).count();
    if unscored > 0 {
        log::info!("{unscored} of {} items left unscored", scored.len());
    }
    scored
}
