use case_core::dataset::CaseDb;
use case_core::grader::{compute_score, Predictions, RefSteps};
use serde_json::json;

fn dataset_json() -> serde_json::Value {
    json!({
        "schema_version": "wk-2025.1",
        "actions_catalog": {
            "interview_witness": { "input_args": [ {"name": "witness_name", "kind": "name"} ] },
            "interrogate_suspect": { "input_args": [ {"name": "suspect_name", "kind": "name"} ] },
            "review_traffic_cctv": { "input_args": [
                {"name": "location", "kind": "location"},
                {"name": "timeframe", "kind": "timeframe"} ] },
            "check_vehicle_registration": { "input_args": [ {"name": "vehicle_number", "kind": "plate"} ] }
        },
        "aliases": {
            "people": {
                "Imran the Vendor": ["imran", "the vendor"],
                "Nisha Rao": ["nisha"]
            }
        },
        "cases": {
            "easy": [
                {
                    "case_id": "case_001",
                    "suspects": ["Imran the Vendor", "Nisha Rao"],
                    "solution": "Imran the Vendor",
                    "optimal_steps": 3,
                    "actions": {}
                },
                {
                    "case_id": "case_002",
                    "suspects": ["Nisha Rao"],
                    "solution": "Nisha Rao",
                    "optimal_steps": 2,
                    "actions": {}
                },
                {
                    // Unscorable: no solution recorded.
                    "case_id": "case_003",
                    "suspects": [],
                    "actions": {}
                }
            ]
        }
    })
}

fn load_db() -> CaseDb {
    let bytes = serde_json::to_vec(&dataset_json()).unwrap();
    CaseDb::from_slice(&bytes).unwrap()
}

fn preds(value: serde_json::Value) -> Predictions {
    serde_json::from_value(value).unwrap()
}

#[test]
fn perfect_predictions_score_the_maximum() {
    let db = load_db();
    let preds = preds(json!({
        "case_001": { "culprit": "Imran the Vendor", "steps": [
            { "action": "interview_witness", "args": { "witness_name": "Nisha" } },
            { "action": "review_traffic_cctv", "args": {} },
            { "action": "check_vehicle_registration", "args": {} }
        ]},
        "case_002": { "culprit": "Nisha Rao", "steps": [
            { "action": "interview_witness", "args": {} },
            { "action": "interrogate_suspect", "args": {} }
        ]}
    }));
    assert_eq!(compute_score(&db, &preds, None), 100.0);
}

#[test]
fn empty_predictions_score_zero() {
    let db = load_db();
    assert_eq!(compute_score(&db, &Predictions::new(), None), 0.0);
}

#[test]
fn wrong_culprits_earn_nothing() {
    let db = load_db();
    let preds = preds(json!({
        "case_001": { "culprit": "Nisha Rao", "steps": [] },
        "case_002": { "culprit": "Imran", "steps": [] }
    }));
    assert_eq!(compute_score(&db, &preds, None), 0.0);
}

#[test]
fn aliases_and_partial_names_are_accepted() {
    let db = load_db();
    // "imran" resolves via the people aliases; "Rao Nisha" shares the
    // exact token "nisha" with the truth.
    let preds = preds(json!({
        "case_001": "imran",
        "case_002": "Rao Nisha"
    }));
    assert_eq!(compute_score(&db, &preds, None), 100.0);
}

#[test]
fn tolerated_prediction_shapes() {
    let db = load_db();
    let preds = preds(json!({
        "case_001": ["Imran the Vendor", [
            { "action": "interview_witness", "args": {} },
            "check_vehicle_registration"
        ]],
        "case_002": { "culprit": "Nisha Rao" }
    }));
    assert_eq!(compute_score(&db, &preds, None), 100.0);
}

#[test]
fn malformed_entries_score_zero_without_aborting() {
    let db = load_db();
    let preds = preds(json!({
        "case_001": 42,
        "case_002": { "culprit": "Nisha Rao", "steps": [] }
    }));
    assert_eq!(compute_score(&db, &preds, None), 50.0);
}

#[test]
fn half_right_is_half_the_score() {
    let db = load_db();
    let preds = preds(json!({
        "case_001": { "culprit": "Imran the Vendor", "steps": [] },
        "case_002": { "culprit": "Imran the Vendor", "steps": [] }
    }));
    assert_eq!(compute_score(&db, &preds, None), 50.0);
}

#[test]
fn unscorable_cases_never_count_against_the_total() {
    let db = load_db();
    // Nothing predicted for case_003; it has no solution, so the two
    // scorable cases alone define the maximum.
    let preds = preds(json!({
        "case_001": { "culprit": "imran" },
        "case_002": { "culprit": "nisha" }
    }));
    assert_eq!(compute_score(&db, &preds, None), 100.0);
}

#[test]
fn reference_step_overrides_are_accepted() {
    let db = load_db();
    let preds = preds(json!({
        "case_001": { "culprit": "imran", "steps": [
            "interview_witness", "interrogate_suspect"
        ]}
    }));
    let mut ref_steps = RefSteps::new();
    ref_steps.insert("case_001".to_string(), 5);
    // Step bonuses are currently weighted at zero, so the override must
    // not change the culprit-driven score.
    let with_override = compute_score(&db, &preds, Some(&ref_steps));
    let without = compute_score(&db, &preds, None);
    assert_eq!(with_override, without);
    assert_eq!(with_override, 50.0);
}
