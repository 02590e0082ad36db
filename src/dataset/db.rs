//! The decoded case database and its canonical exact-match index.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::canonical::{self, ArgKind, CanonicalError};
use crate::codec::{self, CodecError};
use crate::matching::{self, FuzzyOutcome, KeyScorer};

use super::catalog::{ArgSpec, ToolsCatalog};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Dataset failed to decode: {0}")]
    Codec(#[from] CodecError),
    #[error("Dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate case id: {0}")]
    DuplicateCaseId(String),
    #[error("Case {case_id} references unknown action {action}")]
    UnknownAction { case_id: String, action: String },
    #[error("Case {case_id} action {action} maps one canonical key to two responses")]
    DuplicateResponseKey { case_id: String, action: String },
}

/// Raw decoded dataset layout. Cases are bucketed by difficulty in the
/// file; buckets are flattened on load.
#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    schema_version: String,
    actions_catalog: ToolsCatalog,
    #[serde(default)]
    aliases: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    cases: BTreeMap<String, Vec<Case>>,
}

/// A self-contained puzzle scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub case_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub initial_clue: String,
    #[serde(default)]
    pub suspects: Vec<String>,
    /// Ground truth; consumed by the grader, never surfaced through lookups.
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default, alias = "min_steps")]
    pub optimal_steps: Option<u32>,
    #[serde(default)]
    pub actions: BTreeMap<String, ActionScript>,
}

/// Scripted responses for one action within one case. Keys are
/// JSON-encoded argument arrays; a bare string is a one-argument key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionScript {
    #[serde(default)]
    pub responses: BTreeMap<String, String>,
}

type ActionIndex = BTreeMap<String, BTreeMap<Vec<String>, String>>;

/// Read-only after construction. One instance per process invocation.
#[derive(Debug)]
pub struct CaseDb {
    schema_version: String,
    catalog: ToolsCatalog,
    /// category -> normalized alias -> canonical entity string.
    alias_reverse: BTreeMap<String, BTreeMap<String, String>>,
    cases: BTreeMap<String, Case>,
    /// case id -> action -> canonical argument tuple -> response text.
    index: BTreeMap<String, ActionIndex>,
}

impl CaseDb {
    /// Load from disk. The encoded container is preferred when the magic
    /// or a `.cdb` extension is present; plain JSON is accepted otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = fs::read(path)?;
        let encoded = raw.starts_with(codec::MAGIC)
            || path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("cdb"));
        let plain = if encoded { codec::decode_bytes(&raw)? } else { raw };
        Self::from_slice(&plain)
    }

    /// Build from already-decoded JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_slice(bytes)?;
        Self::build(raw)
    }

    fn build(raw: RawDataset) -> Result<Self, DatasetError> {
        let mut alias_reverse: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (category, mapping) in &raw.aliases {
            let reverse = alias_reverse.entry(category.clone()).or_default();
            for (canon, aliases) in mapping {
                reverse.insert(canonical::normalize_text(canon), canon.clone());
                for alias in aliases {
                    reverse.insert(canonical::normalize_text(alias), canon.clone());
                }
            }
        }

        let mut cases: BTreeMap<String, Case> = BTreeMap::new();
        for bucket in raw.cases.into_values() {
            for case in bucket {
                let case_id = case.case_id.clone();
                if cases.insert(case_id.clone(), case).is_some() {
                    return Err(DatasetError::DuplicateCaseId(case_id));
                }
            }
        }

        let mut db = CaseDb {
            schema_version: raw.schema_version,
            catalog: raw.actions_catalog,
            alias_reverse,
            cases,
            index: BTreeMap::new(),
        };
        db.build_index()?;

        debug!(
            schema_version = %db.schema_version,
            cases = db.cases.len(),
            actions = db.catalog.len(),
            "dataset loaded"
        );
        Ok(db)
    }

    /// Index every scripted response under its canonical key tuple so
    /// runtime lookups are a single map probe.
    fn build_index(&mut self) -> Result<(), DatasetError> {
        let mut index: BTreeMap<String, ActionIndex> = BTreeMap::new();
        for (case_id, case) in &self.cases {
            let mut per_action: ActionIndex = BTreeMap::new();
            for (action, script) in &case.actions {
                let specs = self.catalog.input_args(action).ok_or_else(|| {
                    DatasetError::UnknownAction {
                        case_id: case_id.clone(),
                        action: action.clone(),
                    }
                })?;

                let mut tuple_map: BTreeMap<Vec<String>, String> = BTreeMap::new();
                for (key_str, response) in &script.responses {
                    let values = parse_response_key(key_str);
                    let canon: Vec<String> = specs
                        .iter()
                        .zip(&values)
                        .map(|(spec, value)| self.canonical_dataset_value(spec.kind, value))
                        .collect();
                    if tuple_map.insert(canon, response.clone()).is_some() {
                        return Err(DatasetError::DuplicateResponseKey {
                            case_id: case_id.clone(),
                            action: action.clone(),
                        });
                    }
                }
                per_action.insert(action.clone(), tuple_map);
            }
            index.insert(case_id.clone(), per_action);
        }
        self.index = index;
        Ok(())
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn catalog(&self) -> &ToolsCatalog {
        &self.catalog
    }

    pub fn case_exists(&self, case_id: &str) -> bool {
        self.cases.contains_key(case_id)
    }

    pub fn case(&self, case_id: &str) -> Option<&Case> {
        self.cases.get(case_id)
    }

    pub fn cases(&self) -> impl Iterator<Item = &Case> {
        self.cases.values()
    }

    pub fn action_enabled(&self, case_id: &str, action: &str) -> bool {
        self.cases
            .get(case_id)
            .is_some_and(|case| case.actions.contains_key(action))
    }

    pub fn actions_for_case(&self, case_id: &str) -> Vec<&str> {
        self.cases
            .get(case_id)
            .map(|case| case.actions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Map a canonicalized value onto its canonical entity via the alias
    /// table for the kind's category. Unknown values pass through.
    pub fn resolve_alias(&self, kind: ArgKind, value: &str) -> String {
        let Some(category) = kind.alias_category() else {
            return value.to_string();
        };
        match self
            .alias_reverse
            .get(category)
            .and_then(|reverse| reverse.get(&canonical::normalize_text(value)))
        {
            Some(canon) => canon.clone(),
            None => value.to_string(),
        }
    }

    /// Strict canonicalization for caller-supplied input: kind
    /// normalization, then alias resolution.
    pub fn canonical_input(&self, spec: &ArgSpec, raw: &str) -> Result<String, CanonicalError> {
        let value = canonical::canonicalize(spec.kind, raw)?;
        Ok(self.resolve_alias(spec.kind, &value))
    }

    fn canonical_dataset_value(&self, kind: ArgKind, raw: &str) -> String {
        let value = canonical::canonicalize_lenient(kind, raw);
        self.resolve_alias(kind, &value)
    }

    pub fn lookup_exact(&self, case_id: &str, action: &str, args: &[String]) -> Option<&str> {
        self.index
            .get(case_id)?
            .get(action)?
            .get(args)
            .map(String::as_str)
    }

    /// Approximate lookup over the scripted keys of one action. Returns
    /// the best unambiguous candidate at or above the action's threshold.
    pub fn lookup_fuzzy(&self, case_id: &str, action: &str, args: &[String]) -> FuzzyOutcome {
        let Some(specs) = self.catalog.input_args(action) else {
            return FuzzyOutcome::NoMatch;
        };
        let Some(candidates) = self.index.get(case_id).and_then(|per| per.get(action)) else {
            return FuzzyOutcome::NoMatch;
        };
        if candidates.is_empty() {
            return FuzzyOutcome::NoMatch;
        }

        let scorer = KeyScorer::for_action(action);
        let outcome = matching::select_best(scorer, specs, args, candidates);
        if let FuzzyOutcome::Match { score, .. } = &outcome {
            debug!(case_id, action, score = *score, "fuzzy lookup matched");
        }
        outcome
    }
}

/// Response keys are JSON-encoded argument arrays. Anything unparsable is
/// treated as a single-argument key, matching how datasets were authored.
fn parse_response_key(key: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<serde_json::Value>>(key) {
        Ok(values) => values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Err(_) => vec![key.to_string()],
    }
}
