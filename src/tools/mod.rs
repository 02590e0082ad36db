//! The student-facing dispatch facade.
//!
//! [`DetectiveTools`] owns the decoded database and answers tool calls
//! with scripted text. It never reveals which actions a case enables, the
//! scripted key tuples, or the ground-truth solution.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::canonical::CanonicalError;
use crate::dataset::{CaseDb, DatasetError};
use crate::matching::FuzzyOutcome;

/// Scripted reply when an action exists in the catalog but is not part of
/// the current case. Indistinguishable from a valid-but-useless call.
pub const DECOY_RESPONSE: &str = "No useful information found. Time wasted.";

pub const NO_MATCH_EXACT: &str = "[no-match] Inputs not recognized. Check spelling, use full names, and standard time ranges (e.g., '20:10-20:20').";

pub const NO_MATCH_FUZZY: &str = "[no-match] Could not confidently match your inputs. Try exact location names and full person names.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Canonical keys must match exactly.
    Exact,
    /// Exact first, then the per-action fuzzy fallback.
    #[default]
    Smart,
}

#[derive(Debug, Error)]
#[error("unknown match mode {0:?}; expected \"exact\" or \"smart\"")]
pub struct UnknownMatchMode(String);

impl FromStr for MatchMode {
    type Err = UnknownMatchMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "smart" => Ok(MatchMode::Smart),
            other => Err(UnknownMatchMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown case id {0:?}")]
    UnknownCase(String),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    // Argument names are not ground truth, so listing them is safe.
    #[error("missing required argument {name:?} for {action}; required args: {required:?}")]
    MissingArgument {
        action: String,
        name: String,
        required: Vec<String>,
    },
    #[error("invalid argument {name:?}: {source}")]
    InvalidArgument {
        name: String,
        #[source]
        source: CanonicalError,
    },
}

pub struct DetectiveTools {
    db: CaseDb,
    case_id: String,
    match_mode: MatchMode,
}

impl DetectiveTools {
    pub fn open(
        dataset: impl AsRef<Path>,
        case_id: impl Into<String>,
        match_mode: MatchMode,
    ) -> Result<Self, DatasetError> {
        Ok(Self::with_db(CaseDb::from_file(dataset)?, case_id, match_mode))
    }

    pub fn with_db(db: CaseDb, case_id: impl Into<String>, match_mode: MatchMode) -> Self {
        Self {
            db,
            case_id: case_id.into(),
            match_mode,
        }
    }

    pub fn set_case(&mut self, case_id: impl Into<String>) {
        self.case_id = case_id.into();
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn db(&self) -> &CaseDb {
        &self.db
    }

    /// Resolve one tool call to its scripted response.
    ///
    /// Unknown cases and actions and malformed arguments are errors; a
    /// recognized call with no scripted answer is a normal `Ok` response
    /// so callers cannot distinguish "nothing scripted" from "useless".
    pub fn call(&self, action: &str, args: &BTreeMap<String, String>) -> Result<String, ToolError> {
        if !self.db.case_exists(&self.case_id) {
            return Err(ToolError::UnknownCase(self.case_id.clone()));
        }
        let specs = self
            .db
            .catalog()
            .input_args(action)
            .ok_or_else(|| ToolError::UnknownAction(action.to_string()))?;

        // Enabled actions are never enumerated back to the caller.
        if !self.db.action_enabled(&self.case_id, action) {
            return Ok(DECOY_RESPONSE.to_string());
        }

        let mut canon = Vec::with_capacity(specs.len());
        for spec in specs {
            let raw = args.get(&spec.name).ok_or_else(|| ToolError::MissingArgument {
                action: action.to_string(),
                name: spec.name.clone(),
                required: specs.iter().map(|s| s.name.clone()).collect(),
            })?;
            let value = self
                .db
                .canonical_input(spec, raw)
                .map_err(|source| ToolError::InvalidArgument {
                    name: spec.name.clone(),
                    source,
                })?;
            canon.push(value);
        }

        if let Some(response) = self.db.lookup_exact(&self.case_id, action, &canon) {
            return Ok(response.to_string());
        }
        if self.match_mode == MatchMode::Exact {
            return Ok(NO_MATCH_EXACT.to_string());
        }

        match self.db.lookup_fuzzy(&self.case_id, action, &canon) {
            FuzzyOutcome::Match { response, .. } => Ok(response),
            // No candidate hints in either failure: they would leak keys.
            FuzzyOutcome::Ambiguous | FuzzyOutcome::NoMatch => Ok(NO_MATCH_FUZZY.to_string()),
        }
    }

    fn call_with(&self, action: &str, args: &[(&str, &str)]) -> Result<String, ToolError> {
        let map = args
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.call(action, &map)
    }

    // Typed wrappers for the scripted tool surface.

    pub fn interview_witness(&self, witness_name: &str) -> Result<String, ToolError> {
        self.call_with("interview_witness", &[("witness_name", witness_name)])
    }

    pub fn review_traffic_cctv(&self, location: &str, timeframe: &str) -> Result<String, ToolError> {
        self.call_with(
            "review_traffic_cctv",
            &[("location", location), ("timeframe", timeframe)],
        )
    }

    pub fn check_vehicle_registration(&self, vehicle_number: &str) -> Result<String, ToolError> {
        self.call_with(
            "check_vehicle_registration",
            &[("vehicle_number", vehicle_number)],
        )
    }

    pub fn collect_evidence(&self, location: &str, evidence_type: &str) -> Result<String, ToolError> {
        self.call_with(
            "collect_evidence",
            &[("location", location), ("evidence_type", evidence_type)],
        )
    }

    pub fn analyze_fingerprints(&self, sample_id: &str) -> Result<String, ToolError> {
        self.call_with("analyze_fingerprints", &[("sample_id", sample_id)])
    }

    pub fn trace_mobile_number(&self, mobile_number: &str) -> Result<String, ToolError> {
        self.call_with("trace_mobile_number", &[("mobile_number", mobile_number)])
    }

    pub fn review_access_logs(
        &self,
        facility_or_room: &str,
        timeframe: &str,
    ) -> Result<String, ToolError> {
        self.call_with(
            "review_access_logs",
            &[("facility_or_room", facility_or_room), ("timeframe", timeframe)],
        )
    }

    pub fn review_wifi_logs(&self, area: &str, timeframe: &str) -> Result<String, ToolError> {
        self.call_with(
            "review_wifi_logs",
            &[("area", area), ("timeframe", timeframe)],
        )
    }

    pub fn check_upi_transactions(
        &self,
        party_name: &str,
        timeframe: &str,
    ) -> Result<String, ToolError> {
        self.call_with(
            "check_upi_transactions",
            &[("party_name", party_name), ("timeframe", timeframe)],
        )
    }

    pub fn interrogate_suspect(&self, suspect_name: &str) -> Result<String, ToolError> {
        self.call_with("interrogate_suspect", &[("suspect_name", suspect_name)])
    }

    pub fn interrogate_suspect_final(&self, suspect_name: &str) -> Result<String, ToolError> {
        self.call_with("interrogate_suspect_final", &[("suspect_name", suspect_name)])
    }

    pub fn interrogate_suspect_3rd_degree(&self, suspect_name: &str) -> Result<String, ToolError> {
        self.call_with(
            "interrogate_suspect_3rd_degree",
            &[("suspect_name", suspect_name)],
        )
    }
}
