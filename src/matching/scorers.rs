//! Per-action key scorers and acceptance thresholds.

use crate::canonical::ArgKind;
use crate::dataset::ArgSpec;

use super::similarity::{
    person_name_similarity, phone_similarity, plate_similarity, text_similarity, timeframe_score,
};

/// How a candidate scripted key is compared against canonicalized input
/// for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScorer {
    /// Weighted location + timeframe (CCTV, access logs).
    LocationTime { grace_min: u32 },
    /// Even area + timeframe split (wifi logs).
    AreaTime,
    Plate,
    Phone,
    /// Party name + timeframe; ledgers are queried with looser windows.
    PartyTime,
    /// Strict person-name matching for interviews and interrogations.
    Person,
    /// Mean of per-argument text similarity.
    Argwise,
}

impl KeyScorer {
    pub fn for_action(action: &str) -> Self {
        match action {
            "review_traffic_cctv" | "review_access_logs" => KeyScorer::LocationTime { grace_min: 10 },
            "review_wifi_logs" => KeyScorer::AreaTime,
            "check_vehicle_registration" => KeyScorer::Plate,
            "trace_mobile_number" => KeyScorer::Phone,
            "check_upi_transactions" => KeyScorer::PartyTime,
            "interview_witness"
            | "interrogate_suspect"
            | "interrogate_suspect_final"
            | "interrogate_suspect_3rd_degree"
            | "verify_alibi" => KeyScorer::Person,
            _ => KeyScorer::Argwise,
        }
    }

    /// Minimum score a candidate must clear before fuzzy lookup considers
    /// it. Identifier-like arguments demand more confidence.
    pub fn threshold(self) -> f32 {
        match self {
            KeyScorer::Plate | KeyScorer::Phone | KeyScorer::Person => 0.85,
            _ => 0.75,
        }
    }

    pub fn score(self, specs: &[ArgSpec], input: &[String], key: &[String]) -> f32 {
        if input.is_empty() || input.len() != key.len() {
            return 0.0;
        }
        let last = input.len() - 1;
        match self {
            KeyScorer::LocationTime { grace_min } => {
                let tf = position_of(specs, ArgKind::Timeframe).unwrap_or(last).min(last);
                let loc = position_of(specs, ArgKind::Location).unwrap_or(0).min(last);
                0.55 * text_similarity(&input[loc], &key[loc])
                    + 0.45 * timeframe_score(&input[tf], &key[tf], grace_min)
            }
            KeyScorer::AreaTime if input.len() >= 2 => {
                0.5 * text_similarity(&input[0], &key[0])
                    + 0.5 * timeframe_score(&input[1], &key[1], 10)
            }
            KeyScorer::PartyTime if input.len() >= 2 => {
                0.6 * text_similarity(&input[0], &key[0])
                    + 0.4 * timeframe_score(&input[1], &key[1], 60)
            }
            KeyScorer::Plate => plate_similarity(&input[0], &key[0]),
            KeyScorer::Phone => phone_similarity(&input[0], &key[0]),
            KeyScorer::Person => person_name_similarity(&input[0], &key[0]),
            _ => argwise(input, key),
        }
    }
}

fn position_of(specs: &[ArgSpec], kind: ArgKind) -> Option<usize> {
    specs.iter().position(|s| s.kind == kind)
}

fn argwise(input: &[String], key: &[String]) -> f32 {
    let total: f32 = input
        .iter()
        .zip(key)
        .map(|(a, b)| text_similarity(a, b))
        .sum();
    total / input.len().max(1) as f32
}
