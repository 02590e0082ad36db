//! Similarity primitives used by the fuzzy lookup fallback.

use std::collections::BTreeSet;

use crate::canonical::text::{normalize_phone, normalize_plate, normalize_text, normalize_token_set};
use crate::canonical::timeframe::{overlap_minutes, parse_timeframe, DAY_MINUTES};

pub fn jaccard_token_set(a: &str, b: &str) -> f32 {
    let a: BTreeSet<String> = normalize_token_set(a, false).into_iter().collect();
    let b: BTreeSet<String> = normalize_token_set(b, false).into_iter().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f32 / union as f32
}

/// 1.0 minus the normalized edit distance. Classic single-row DP; inputs
/// here are short strings.
pub fn levenshtein_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = normalize_text(a).chars().collect();
    let b: Vec<char> = normalize_text(b).chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut prev = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let cur = (row[j] + 1)
                .min(row[j - 1] + 1)
                .min(prev + usize::from(a[i - 1] != b[j - 1]));
            prev = row[j];
            row[j] = cur;
        }
    }
    1.0 - row[b.len()] as f32 / a.len().max(b.len()) as f32
}

/// Blend token-set and edit-distance similarity for robustness against
/// both word reordering and small typos.
pub fn text_similarity(a: &str, b: &str) -> f32 {
    0.6 * jaccard_token_set(a, b) + 0.4 * levenshtein_ratio(a, b)
}

/// Plates vary mostly in spacing and dashes, so a matching suffix is
/// rewarded strongly alongside raw edit distance.
pub fn plate_similarity(a: &str, b: &str) -> f32 {
    let na = normalize_plate(a);
    let nb = normalize_plate(b);
    if na.is_empty() && nb.is_empty() {
        return 1.0;
    }
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    let suffix_len = 6.min(na.len()).min(nb.len());
    let suffix_match = if na[na.len() - suffix_len..] == nb[nb.len() - suffix_len..] {
        1.0
    } else {
        0.0
    };
    0.5 * levenshtein_ratio(&na, &nb) + 0.5 * suffix_match
}

/// Match by trailing digits to tolerate country codes and separators.
pub fn phone_similarity(a: &str, b: &str) -> f32 {
    let na = normalize_phone(a);
    let nb = normalize_phone(b);
    if na.is_empty() && nb.is_empty() {
        return 1.0;
    }
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    for (k, score) in [(8, 0.9), (6, 0.8), (4, 0.6)] {
        if na.len() >= k && nb.len() >= k && na[na.len() - k..] == nb[nb.len() - k..] {
            return score;
        }
    }
    0.0
}

/// Overlap-based timeframe similarity with a start-time grace window.
/// Falls back to fuzzy text when either side does not parse.
pub fn timeframe_score(input_tf: &str, candidate_tf: &str, grace_min: u32) -> f32 {
    let (a, b) = match (parse_timeframe(input_tf), parse_timeframe(candidate_tf)) {
        (Some(a), Some(b)) => (a, b),
        _ => return text_similarity(input_tf, candidate_tf),
    };

    let overlap = overlap_minutes(a, b);
    let len_a = (a.1 - a.0).max(1);
    let len_b = (b.1 - b.0).max(1);
    if overlap > 0 {
        return (0.5 + 0.5 * overlap as f32 / len_a.max(len_b) as f32).min(1.0);
    }

    let a0 = a.0 as i64;
    let b0 = b.0 as i64;
    let day = DAY_MINUTES as i64;
    let start_delta = (a0 - b0)
        .abs()
        .min((a0 + day - b0).abs())
        .min((a0 - (b0 + day)).abs());
    if start_delta <= grace_min as i64 {
        return 0.7;
    }
    0.0
}

/// Strict person-name similarity: 1.0 only when some input token of four
/// or more letters matches a canonical-name token exactly. No prefixes, no
/// typos, so "Niraj" never matches "Neeraj".
pub fn person_name_similarity(a: &str, b: &str) -> f32 {
    let a = normalize_token_set(a, true);
    let b = normalize_token_set(b, true);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.iter().any(|t| t.chars().count() >= 4 && b.contains(t)) {
        1.0
    } else {
        0.0
    }
}
