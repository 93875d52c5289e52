//! Concatenation of the three tokenization result sets

use crate::domain::{Observation, ARTIFICIAL_TOKENIZATION};

/// The three observation sequences, one per result file
#[derive(Debug, Clone, Default)]
pub struct SourceSets {
    pub single_token: Vec<Observation>,
    pub multitok_nonmorph: Vec<Observation>,
    pub multitok_morph: Vec<Observation>,
}

/// Merged long-form table
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub observations: Vec<Observation>,
    /// Artificial rows excluded from the morphemic file
    pub artificial_excluded: usize,
}

/// Merge the result sets into one long-form table
///
/// Artificial rows in the morphemic file duplicate a condition already
/// present elsewhere and are excluded; artificial rows from the other two
/// files are kept. Order is single-token, nonmorph, morph, each in file
/// order.
pub fn merge(sets: SourceSets) -> MergeOutcome {
    let SourceSets {
        single_token,
        multitok_nonmorph,
        multitok_morph,
    } = sets;

    let morph_rows = multitok_morph.len();
    let kept_morph: Vec<Observation> = multitok_morph
        .into_iter()
        .filter(|o| o.tokenization_type != ARTIFICIAL_TOKENIZATION)
        .collect();
    let artificial_excluded = morph_rows - kept_morph.len();

    if artificial_excluded == 0 {
        log::warn!(
            "No artificial rows found in the morphemic results; \
             check the tokenization_type labels for schema drift"
        );
    } else {
        log::info!("Excluded {artificial_excluded} artificial rows from the morphemic results");
    }

    let mut observations =
        Vec::with_capacity(single_token.len() + multitok_nonmorph.len() + kept_morph.len());
    observations.extend(single_token);
    observations.extend(multitok_nonmorph);
    observations.extend(kept_morph);

    MergeOutcome {
        observations,
        artificial_excluded,
    }
}
