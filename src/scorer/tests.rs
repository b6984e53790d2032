use serde_json::{Value, json};

use super::*;
use crate::ScoreError;
use crate::record::MAX_RECORD_DEPTH;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn exact_match_on_single_field_scores_ninety() {
    let record = json!({"year": 2023});
    let report = compare(&record, &record).expect("reference is well formed");

    assert_eq!(report.breakdown.parsing_correctness, 60.0);
    assert_eq!(report.breakdown.coverage, 20.0);
    assert_eq!(report.breakdown.robustness, 0.0);
    assert_eq!(report.breakdown.output_hygiene, 10.0);
    assert_eq!(report.total_score, 90.0);
    assert!(report.details.schema_valid);
    assert_eq!(report.details.schema_errors, "");
    assert_eq!(report.details.correct_fields.len(), 1);
    assert_eq!(report.details.correct_fields[0].field, "year");
    assert!(!report.has_issues());
}

#[test]
fn out_of_tolerance_number_is_covered_but_incorrect() {
    let reference = json!({"ghg": {"scope1_tco2e": 1000}});
    let candidate = json!({"ghg": {"scope1_tco2e": 1200}});
    let report = compare(&candidate, &reference).expect("reference is well formed");

    assert_eq!(report.breakdown.parsing_correctness, 0.0);
    assert_eq!(report.breakdown.coverage, 20.0);
    assert_eq!(report.total_score, 20.0 + report.breakdown.output_hygiene);
    assert_eq!(report.total_score, 30.0);

    let issue = &report.details.incorrect_fields[0];
    assert_eq!(issue.field, "ghg.scope1_tco2e");
    assert_eq!(issue.expected, json!(1000));
    assert_eq!(issue.predicted, json!(1200));
    assert_eq!(issue.kind, MismatchKind::Numeric);
    assert_eq!(issue.error, "Numeric mismatch: expected 1000, got 1200");
    assert!(report.details.missing_fields.is_empty());
}

#[test]
fn reference_without_populated_fields_gives_no_parsing_credit() {
    let reference = json!({"year": null, "ghg": {"scope1_tco2e": null}, "board": {"members": []}});
    let report = compare(&json!({"year": 2023}), &reference).expect("reference is well formed");

    assert_eq!(report.breakdown.parsing_correctness, 0.0);
    assert_eq!(report.breakdown.coverage, 20.0);
    assert!(report.details.correct_fields.is_empty());
}

#[test]
fn policy_flags_feed_robustness() {
    let candidate = json!({"policies": {"whistleblowing": true, "anti_corruption": true}});
    let report = compare(&candidate, &json!({})).expect("reference is well formed");
    assert_eq!(report.breakdown.robustness, 5.0);

    let every_flag = json!({"policies": {
        "whistleblowing": true,
        "anti_corruption": true,
        "human_rights": true,
        "dei_policy": true
    }});
    let report = compare(&every_flag, &json!({})).expect("reference is well formed");
    assert_eq!(report.breakdown.robustness, 10.0);
}

#[test]
fn missing_fields_are_split_from_wrong_ones() {
    let reference = json!({
        "company": "Acme Holdings",
        "year": 2023,
        "board": {"members": [{"name": "Ada Lovelace", "role": "Chair"}]},
        "policies": {"whistleblowing": true}
    });
    let candidate = json!({
        "company": "acme holdings",
        "year": 1900,
        "board": {"members": [{"name": "Ada Lovelace", "role": null}]}
    });

    let report = compare(&candidate, &reference).expect("reference is well formed");
    let correct: Vec<&str> = report
        .details
        .correct_fields
        .iter()
        .map(|entry| entry.field.as_str())
        .collect();
    let incorrect: Vec<&str> = report
        .details
        .incorrect_fields
        .iter()
        .map(|entry| entry.field.as_str())
        .collect();
    let missing: Vec<&str> = report
        .details
        .missing_fields
        .iter()
        .map(|entry| entry.field.as_str())
        .collect();

    assert_eq!(correct, vec!["board.members[0].name", "company"]);
    assert_eq!(incorrect, vec!["year"]);
    assert_eq!(missing, vec!["board.members[0].role", "policies.whistleblowing"]);
    assert_eq!(
        report.details.missing_fields[1].error,
        "Missing required field: policies.whistleblowing"
    );
    assert_eq!(report.issues().count(), 3);

    assert_close(report.breakdown.parsing_correctness, 2.0 / 5.0 * 60.0);
    assert_close(report.breakdown.coverage, 3.0 / 5.0 * 20.0);
    // `role: null` breaks the BoardMember schema.
    assert!(!report.details.schema_valid);
    assert_eq!(report.breakdown.output_hygiene, 0.0);
    assert!(
        report
            .details
            .schema_errors
            .contains("board.members[0].role: value must not be null")
    );
}

#[test]
fn fuzzy_string_match_records_its_similarity() {
    let reference = json!({"company": "Acme Holdings plc"});
    let candidate = json!({"company": "Acme Holdings plc."});
    let report = compare(&candidate, &reference).expect("reference is well formed");

    let entry = &report.details.correct_fields[0];
    assert_eq!(entry.value, json!("Acme Holdings plc."));
    assert!(entry.similarity < 1.0);
    assert_eq!(report.breakdown.parsing_correctness, 60.0);
}

#[test]
fn schema_failure_zeroes_hygiene_without_aborting() {
    let reference = json!({"year": 2023});
    let candidate = json!({"year": 2023, "company": 7});
    let report = compare(&candidate, &reference).expect("reference is well formed");

    assert_eq!(report.breakdown.output_hygiene, 0.0);
    assert_eq!(report.breakdown.parsing_correctness, 60.0);
    assert_eq!(report.breakdown.coverage, 20.0);
    assert_eq!(report.total_score, 80.0);
    assert!(
        report
            .details
            .schema_errors
            .starts_with("1 validation error for DocESG")
    );
}

#[test]
fn candidate_only_fields_are_not_penalized() {
    let reference = json!({"year": 2023});
    let candidate = json!({"year": 2023, "company": "Acme", "ghg": {"scope1_tco2e": 5}});
    let report = compare(&candidate, &reference).expect("reference is well formed");
    assert_eq!(report.total_score, 90.0);
}

#[test]
fn non_object_candidate_is_scored_as_empty() {
    let reference = json!({"year": 2023});
    let report = compare(&json!([2023]), &reference).expect("reference is well formed");

    assert_eq!(report.total_score, 0.0);
    assert!(!report.details.schema_valid);
    assert_eq!(report.details.missing_fields.len(), 1);
}

#[test]
fn deeply_nested_candidate_is_scored_not_escalated() {
    let mut deep = json!(1);
    for _ in 0..(MAX_RECORD_DEPTH + 6) {
        deep = json!({ "x": deep });
    }
    let candidate = json!({"year": 2023, "governance": {"x": deep}});
    let reference = json!({"year": 2023});

    let report = compare(&candidate, &reference).expect("candidate depth is not a failure");
    assert_eq!(report.details.correct_fields.len(), 1);
    assert_eq!(report.breakdown.parsing_correctness, 60.0);
    assert_eq!(report.breakdown.coverage, 20.0);
    assert!(report.details.schema_valid, "{}", report.details.schema_errors);
}

#[test]
fn malformed_reference_is_escalated() {
    let error = compare(&json!({}), &json!("not a record")).unwrap_err();
    assert!(matches!(error, ScoreError::MalformedReference(_)));
    assert!(error.to_string().contains("got string"));

    let mut deep = json!(1);
    for _ in 0..=MAX_RECORD_DEPTH {
        deep = json!({ "x": deep });
    }
    let error = compare(&json!({}), &deep).unwrap_err();
    assert!(matches!(error, ScoreError::MalformedReference(_)));
}

#[test]
fn total_stays_within_bounds_and_equals_breakdown_sum() {
    let reference = json!({
        "company": "Acme",
        "year": 2023,
        "ghg": {"scope1_tco2e": 0, "scope2_market_tco2e": 10.5},
        "policies": {"whistleblowing": true, "dei_policy": false}
    });
    let candidates = [
        json!({}),
        reference.clone(),
        json!({"company": "Globex", "ghg": {"scope1_tco2e": 0.5}}),
        json!({"policies": {
            "whistleblowing": true, "anti_corruption": true,
            "human_rights": true, "dei_policy": true
        }}),
        json!({"company": 1, "year": "x", "ghg": "none", "policies": false}),
        Value::Null,
    ];

    for candidate in &candidates {
        let report = compare(candidate, &reference).expect("reference is well formed");
        let breakdown = report.breakdown;
        assert_eq!(report.total_score, breakdown.total());
        assert!((0.0..=100.0).contains(&report.total_score));
        assert!((0.0..=60.0).contains(&breakdown.parsing_correctness));
        assert!((0.0..=20.0).contains(&breakdown.coverage));
        assert!((0.0..=10.0).contains(&breakdown.robustness));
        assert!((0.0..=10.0).contains(&breakdown.output_hygiene));
    }
}

#[test]
fn custom_policy_and_schema_flow_through_scorer() {
    let schema = SchemaDescriptor::new(
        "Minimal",
        vec![crate::FieldSpec::required("id", crate::FieldType::String)],
    );
    let strict = ScoringPolicy {
        numeric_relative_tolerance: 0.0,
        ..ScoringPolicy::default()
    };
    let scorer = Scorer::new(schema, strict);

    let reference = json!({"id": "A", "amount": 100});
    let report = scorer
        .compare(&json!({"id": "A", "amount": 101}), &reference)
        .expect("reference is well formed");
    assert_eq!(report.breakdown.output_hygiene, 10.0);
    assert_close(report.breakdown.parsing_correctness, 30.0);

    let validation = scorer.validate_schema(&json!({}));
    assert_eq!(
        validation.error_text(),
        "1 validation error for Minimal\nid: field required"
    );
    assert!(validate_schema(&json!({})).is_valid());
}

#[test]
fn scoring_does_not_mutate_inputs() {
    let reference = json!({"year": 2023, "board": {"members": [{"name": "Ada", "role": "Chair"}]}});
    let candidate = json!({"year": 2020});
    let (reference_before, candidate_before) = (reference.clone(), candidate.clone());

    let first = compare(&candidate, &reference).expect("reference is well formed");
    let second = compare(&candidate, &reference).expect("reference is well formed");
    assert_eq!(first, second);
    assert_eq!(reference, reference_before);
    assert_eq!(candidate, candidate_before);
}
