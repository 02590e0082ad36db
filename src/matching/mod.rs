//! Approximate matching over scripted keys.

pub mod scorers;
pub mod similarity;

pub use scorers::KeyScorer;
pub use similarity::{
    jaccard_token_set, levenshtein_ratio, person_name_similarity, phone_similarity,
    plate_similarity, text_similarity, timeframe_score,
};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::dataset::ArgSpec;

/// Candidates kept after thresholding.
pub const TOP_K: usize = 3;
/// Two candidates closer than this margin are indistinguishable.
pub const MIN_MARGIN: f32 = 0.05;

/// Outcome of an approximate lookup over the scripted keys of one action.
#[derive(Debug, Clone, PartialEq)]
pub enum FuzzyOutcome {
    /// A single candidate cleared the threshold by a safe margin.
    Match { response: String, score: f32 },
    /// Two or more candidates scored within [`MIN_MARGIN`] of each other.
    Ambiguous,
    NoMatch,
}

/// Score every candidate key and return the best unambiguous match.
/// Candidate keys are never leaked through the outcome.
pub fn select_best(
    scorer: KeyScorer,
    specs: &[ArgSpec],
    input: &[String],
    candidates: &BTreeMap<Vec<String>, String>,
) -> FuzzyOutcome {
    let mut scored: Vec<(f32, &String)> = candidates
        .iter()
        .map(|(key, response)| (scorer.score(specs, input, key), response))
        .collect();
    // Descending score; BTreeMap iteration keeps equal scores in stable
    // key order, so the outcome is deterministic.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let threshold = scorer.threshold();
    let top: Vec<&(f32, &String)> = scored
        .iter()
        .filter(|(score, _)| *score >= threshold)
        .take(TOP_K)
        .collect();

    match top.as_slice() {
        [] => FuzzyOutcome::NoMatch,
        [only] => FuzzyOutcome::Match {
            response: only.1.clone(),
            score: only.0,
        },
        [first, second, ..] => {
            if first.0 - second.0 < MIN_MARGIN {
                FuzzyOutcome::Ambiguous
            } else {
                FuzzyOutcome::Match {
                    response: first.1.clone(),
                    score: first.0,
                }
            }
        }
    }
}
