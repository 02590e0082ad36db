use case_core::canonical::timeframe::{
    canonical_timeframe, overlap_minutes, parse_clock, parse_timeframe,
};
use case_core::canonical::{canonicalize, ArgKind};
use case_core::matching::timeframe_score;

#[test]
fn clock_tokens_parse_to_minutes() {
    assert_eq!(parse_clock("20:10"), Some(20 * 60 + 10));
    assert_eq!(parse_clock("8pm"), Some(20 * 60));
    assert_eq!(parse_clock("8:10 pm"), Some(20 * 60 + 10));
    assert_eq!(parse_clock("12am"), Some(0));
    assert_eq!(parse_clock("12pm"), Some(12 * 60));
    assert_eq!(parse_clock("8"), Some(8 * 60));
}

#[test]
fn malformed_clock_tokens_are_rejected() {
    assert_eq!(parse_clock("25:00"), None);
    assert_eq!(parse_clock("8:5pm"), None);
    assert_eq!(parse_clock("20:75"), None);
    assert_eq!(parse_clock("noon"), None);
    assert_eq!(parse_clock(""), None);
}

#[test]
fn both_syntaxes_canonicalize_identically() {
    let twelve_hour = canonical_timeframe("8:10pm-8:20pm").unwrap();
    let twenty_four_hour = canonical_timeframe("20:10-20:20").unwrap();
    assert_eq!(twelve_hour, twenty_four_hour);
    assert_eq!(twelve_hour, "20:10-20:20");
}

#[test]
fn separator_variants_are_accepted() {
    assert_eq!(canonical_timeframe("8pm to 9pm").as_deref(), Some("20:00-21:00"));
    assert_eq!(canonical_timeframe("20:00\u{2013}21:00").as_deref(), Some("20:00-21:00"));
    assert_eq!(canonical_timeframe("12:00am-1:00am").as_deref(), Some("00:00-01:00"));
}

#[test]
fn wraparound_ranges_are_preserved() {
    assert_eq!(parse_timeframe("23:50-00:10"), Some((1430, 1450)));
    assert_eq!(canonical_timeframe("23:50-00:10").as_deref(), Some("23:50-00:10"));
}

#[test]
fn invalid_ranges_are_rejected() {
    assert_eq!(canonical_timeframe("whenever"), None);
    assert_eq!(canonical_timeframe("20:10"), None);
    assert_eq!(canonical_timeframe("25:00-26:00"), None);
    assert!(canonicalize(ArgKind::Timeframe, "whenever").is_err());
}

#[test]
fn invariant_canonical_form_is_a_fixed_point() {
    let canon = canonical_timeframe("8:10pm-8:20pm").unwrap();
    assert_eq!(canonical_timeframe(&canon).as_deref(), Some(canon.as_str()));
}

#[test]
fn overlap_handles_wraparound() {
    assert_eq!(overlap_minutes((1210, 1220), (1205, 1215)), 5);
    assert_eq!(overlap_minutes((1430, 1450), (1430, 1450)), 20);
    assert_eq!(overlap_minutes((600, 660), (700, 720)), 0);
}

#[test]
fn score_rewards_overlap_and_grace() {
    // Half-overlapping windows land above the 0.5 floor.
    assert!(timeframe_score("20:05-20:15", "20:10-20:20", 10) > 0.5);
    // Disjoint but within the grace window.
    let graced = timeframe_score("20:00-20:05", "20:08-20:12", 10);
    assert!((graced - 0.7).abs() < f32::EPSILON);
    // Far apart.
    assert_eq!(timeframe_score("09:00-09:30", "21:00-21:30", 10), 0.0);
    // Unparsable input degrades to text similarity.
    assert!(timeframe_score("evening", "evening", 10) > 0.99);
}
