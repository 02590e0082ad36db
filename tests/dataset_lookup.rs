use case_core::codec;
use case_core::dataset::{CaseDb, DatasetError};
use case_core::matching::FuzzyOutcome;
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
            "check_vehicle_registration": { "input_args": [ {"name": "vehicle_number", "kind": "plate"} ] },
            "trace_mobile_number": { "input_args": [ {"name": "mobile_number", "kind": "phone"} ] }
        },
        "aliases": {
            "people": {
                "Imran the Vendor": ["imran", "the vendor"],
                "Nisha Rao": ["nisha"]
            },
            "locations": {
                "MG Road Junction": ["mg road", "mg rd junction"]
            }
        },
        "cases": {
            "easy": [{
                "case_id": "case_001",
                "title": "The Missing Cashbox",
                "description": "A cashbox vanished from the market office.",
                "initial_clue": "A grey hatchback idled outside after close.",
                "suspects": ["Imran the Vendor", "Nisha Rao"],
                "solution": "Imran the Vendor",
                "optimal_steps": 3,
                "actions": {
                    "interview_witness": { "responses": {
                        "[\"Nisha Rao\"]": "Nisha saw a grey hatchback leave at 20:15."
                    }},
                    "review_traffic_cctv": { "responses": {
                        "[\"MG Road Junction\", \"20:10-20:20\"]": "Grey hatchback KA05AB1234 passes at 20:14."
                    }},
                    "check_vehicle_registration": { "responses": {
                        "[\"KA05AB1234\"]": "Registered to Imran the Vendor."
                    }},
                    "interrogate_suspect": { "responses": {
                        "[\"Imran the Vendor\"]": "Imran denies leaving his stall.",
                        "[\"Nisha Rao\"]": "Nisha was closing her shop."
                    }}
                }
            }]
        }
    })
}

fn load_db() -> CaseDb {
    let bytes = serde_json::to_vec(&dataset_json()).unwrap();
    CaseDb::from_slice(&bytes).unwrap()
}

fn canon(db: &CaseDb, action: &str, raw: &[&str]) -> Vec<String> {
    let specs = db.catalog().input_args(action).unwrap();
    specs
        .iter()
        .zip(raw)
        .map(|(spec, value)| db.canonical_input(spec, value).unwrap())
        .collect()
}

#[test]
fn exact_lookup_hits_canonical_keys() {
    let db = load_db();
    let args = canon(&db, "review_traffic_cctv", &["MG Road Junction", "20:10-20:20"]);
    let response = db.lookup_exact("case_001", "review_traffic_cctv", &args);
    assert_eq!(response, Some("Grey hatchback KA05AB1234 passes at 20:14."));
}

#[test]
fn invariant_exact_lookup_is_stable_across_calls() {
    let db = load_db();
    let args = canon(&db, "check_vehicle_registration", &["ka-05 ab 1234"]);
    let first = db.lookup_exact("case_001", "check_vehicle_registration", &args);
    for _ in 0..5 {
        assert_eq!(db.lookup_exact("case_001", "check_vehicle_registration", &args), first);
    }
    assert_eq!(first, Some("Registered to Imran the Vendor."));
}

#[test]
fn aliases_resolve_before_lookup() {
    let db = load_db();
    // "nisha" is an alias for "Nisha Rao"; "mg road" for "MG Road Junction".
    let witness = canon(&db, "interview_witness", &["nisha"]);
    assert!(db.lookup_exact("case_001", "interview_witness", &witness).is_some());

    let cctv = canon(&db, "review_traffic_cctv", &["mg road", "8:10pm-8:20pm"]);
    assert!(db.lookup_exact("case_001", "review_traffic_cctv", &cctv).is_some());
}

#[test]
fn fuzzy_lookup_tolerates_shifted_timeframes() {
    let db = load_db();
    let args = canon(&db, "review_traffic_cctv", &["MG Road Junction", "20:05-20:15"]);
    assert!(db.lookup_exact("case_001", "review_traffic_cctv", &args).is_none());
    match db.lookup_fuzzy("case_001", "review_traffic_cctv", &args) {
        FuzzyOutcome::Match { response, score } => {
            assert_eq!(response, "Grey hatchback KA05AB1234 passes at 20:14.");
            assert!(score >= 0.75);
        }
        other => panic!("expected a fuzzy match, got {other:?}"),
    }
}

#[test]
fn fuzzy_lookup_accepts_reordered_name_tokens() {
    let db = load_db();
    let args = canon(&db, "interview_witness", &["Rao Nisha"]);
    assert!(matches!(
        db.lookup_fuzzy("case_001", "interview_witness", &args),
        FuzzyOutcome::Match { .. }
    ));
}

#[test]
fn fuzzy_lookup_reports_ambiguity() {
    let db = load_db();
    // Tokens from both suspects; each candidate scores 1.0.
    let args = canon(&db, "interrogate_suspect", &["imran nisha rao"]);
    assert_eq!(
        db.lookup_fuzzy("case_001", "interrogate_suspect", &args),
        FuzzyOutcome::Ambiguous
    );
}

#[test]
fn fuzzy_lookup_rejects_unknown_people() {
    let db = load_db();
    let args = canon(&db, "interview_witness", &["Suresh Patel"]);
    assert_eq!(
        db.lookup_fuzzy("case_001", "interview_witness", &args),
        FuzzyOutcome::NoMatch
    );
}

#[test]
fn duplicate_case_ids_fail_the_load() {
    let mut data = dataset_json();
    let case = data["cases"]["easy"][0].clone();
    data["cases"]["hard"] = json!([case]);
    let bytes = serde_json::to_vec(&data).unwrap();
    assert!(matches!(
        CaseDb::from_slice(&bytes),
        Err(DatasetError::DuplicateCaseId(id)) if id == "case_001"
    ));
}

#[test]
fn colliding_canonical_response_keys_fail_the_load() {
    let mut data = dataset_json();
    // "nisha" aliases to "Nisha Rao", so these keys collide after
    // canonicalization.
    data["cases"]["easy"][0]["actions"]["interview_witness"]["responses"]["[\"nisha\"]"] =
        json!("A second scripted answer.");
    let bytes = serde_json::to_vec(&data).unwrap();
    assert!(matches!(
        CaseDb::from_slice(&bytes),
        Err(DatasetError::DuplicateResponseKey { .. })
    ));
}

#[test]
fn case_actions_must_exist_in_the_catalog() {
    let mut data = dataset_json();
    data["cases"]["easy"][0]["actions"]["summon_ghost"] = json!({ "responses": {} });
    let bytes = serde_json::to_vec(&data).unwrap();
    assert!(matches!(
        CaseDb::from_slice(&bytes),
        Err(DatasetError::UnknownAction { action, .. }) if action == "summon_ghost"
    ));
}

#[test]
fn encoded_dataset_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.cdb");
    let plain = serde_json::to_vec(&dataset_json()).unwrap();
    std::fs::write(&path, codec::encode_bytes(&plain).unwrap()).unwrap();

    let db = CaseDb::from_file(&path).unwrap();
    assert!(db.case_exists("case_001"));
    assert_eq!(db.schema_version(), "wk-2025.1");
}

#[test]
fn missing_dataset_file_is_fatal() {
    assert!(matches!(
        CaseDb::from_file("no/such/dataset.cdb"),
        Err(DatasetError::Io(_))
    ));
}
