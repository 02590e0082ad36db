//! The minimal autograder.
//!
//! Scores a predictions file against the dataset's hidden solutions and
//! surfaces nothing but the final 0–100 number: no per-case breakdown, no
//! ground-truth leaks. Malformed prediction entries score zero for their
//! case instead of aborting the run.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::canonical::text::{normalize_text, normalize_token_set};
use crate::canonical::ArgKind;
use crate::dataset::{CaseDb, DatasetError, ToolsCatalog};

/// Points for naming the right culprit.
const BASE_CORRECT: f64 = 2.0;
// Step-count bonuses, currently disabled.
const BONUS_EQUAL: f64 = 0.0;
const BONUS_FEWER: f64 = 0.0;
const BONUS_MORE: f64 = 0.0;
const PER_CASE_MAX: f64 = BASE_CORRECT + BONUS_FEWER;

#[derive(Debug, Error)]
pub enum GradeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Predictions are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// case id -> predicted value, in any tolerated shape.
pub type Predictions = BTreeMap<String, Value>;
/// case id -> reference step count, overriding the dataset.
pub type RefSteps = BTreeMap<String, u32>;

pub fn load_predictions(path: impl AsRef<Path>) -> Result<Predictions, GradeError> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

pub fn load_ref_steps(path: impl AsRef<Path>) -> Result<RefSteps, GradeError> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

/// Count only entries naming a cataloged action; malformed items are
/// ignored. Args are accepted but not validated.
fn count_steps(catalog: &ToolsCatalog, steps: &[Value]) -> usize {
    steps
        .iter()
        .filter(|step| {
            let action = match step {
                Value::String(s) => Some(s.as_str()),
                Value::Object(map) => map.get("action").and_then(Value::as_str),
                _ => None,
            };
            action.is_some_and(|a| catalog.contains(a.trim().to_ascii_lowercase().as_str()))
        })
        .count()
}

/// Accepts `{"culprit": …, "steps": […]}`, `["Name", […]]`, or a bare
/// `"Name"` (the latter earns no step bonus).
fn parse_prediction(catalog: &ToolsCatalog, value: &Value) -> Option<(String, Option<usize>)> {
    match value {
        Value::Object(map) => {
            let culprit = map.get("culprit")?.as_str()?.to_string();
            let steps = map
                .get("steps")
                .and_then(Value::as_array)
                .map(|s| count_steps(catalog, s));
            Some((culprit, steps))
        }
        Value::Array(items) => {
            let culprit = items.first()?.as_str()?.to_string();
            let steps = items
                .get(1)
                .and_then(Value::as_array)
                .map(|s| count_steps(catalog, s));
            Some((culprit, steps))
        }
        Value::String(s) => Some((s.clone(), None)),
        _ => None,
    }
}

/// Exact normalized equality, or a shared exact token of four or more
/// letters after stopword removal. No prefixes, no typos.
fn names_match_strict(predicted: &str, truth: &str) -> bool {
    if normalize_text(predicted) == normalize_text(truth) {
        return true;
    }
    let a = normalize_token_set(predicted, true);
    let b = normalize_token_set(truth, true);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.iter().any(|t| t.chars().count() >= 4 && b.contains(t))
}

/// Aggregate score over every scorable case (those with a non-empty
/// solution), rounded to two decimals. Missing or wrong predictions earn
/// zero for their case; no scorable cases at all scores zero.
pub fn compute_score(db: &CaseDb, preds: &Predictions, ref_steps: Option<&RefSteps>) -> f64 {
    let mut scorable = 0usize;
    let mut total = 0.0;

    for case in db.cases() {
        let Some(solution) = case
            .solution
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };
        scorable += 1;

        let Some(value) = preds.get(&case.case_id) else {
            continue;
        };
        let Some((predicted, predicted_steps)) = parse_prediction(db.catalog(), value) else {
            continue;
        };
        if predicted.trim().is_empty() {
            continue;
        }

        let predicted_canon = db.resolve_alias(ArgKind::Name, &predicted);
        let truth_canon = db.resolve_alias(ArgKind::Name, solution);
        if !names_match_strict(&predicted_canon, &truth_canon) {
            continue;
        }

        let mut points = BASE_CORRECT;
        let k_ref = ref_steps
            .and_then(|map| map.get(&case.case_id).copied())
            .or(case.optimal_steps);
        if let (Some(k_pred), Some(k_ref)) = (predicted_steps, k_ref) {
            points += match (k_pred as u32).cmp(&k_ref) {
                Ordering::Less => BONUS_FEWER,
                Ordering::Equal => BONUS_EQUAL,
                Ordering::Greater => BONUS_MORE,
            };
        }
        total += points;
    }

    let max = PER_CASE_MAX * scorable as f64;
    if max <= 0.0 {
        return 0.0;
    }
    debug!(scorable, total, "grading complete");
    (100.0 * total / max * 100.0).round() / 100.0
}
