//! Per-field comparison between a reference leaf and a candidate leaf.

use rapidfuzz::fuzz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::FieldValue;

pub const DEFAULT_NUMERIC_RELATIVE_TOLERANCE: f64 = 0.05;
pub const DEFAULT_NUMERIC_ZERO_TOLERANCE: f64 = 0.01;
pub const DEFAULT_STRING_SIMILARITY_THRESHOLD: f64 = 0.90;

/// Tolerances applied when deciding whether two leaves agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Fraction of `|expected|` a numeric prediction may drift.
    pub numeric_relative_tolerance: f64,
    /// Absolute tolerance used when the expected number is exactly zero.
    pub numeric_zero_tolerance: f64,
    /// Minimum case-insensitive fuzzy ratio for two strings to match.
    pub string_similarity_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            numeric_relative_tolerance: DEFAULT_NUMERIC_RELATIVE_TOLERANCE,
            numeric_zero_tolerance: DEFAULT_NUMERIC_ZERO_TOLERANCE,
            string_similarity_threshold: DEFAULT_STRING_SIMILARITY_THRESHOLD,
        }
    }
}

impl ScoringPolicy {
    pub fn numeric_tolerance(&self, expected: f64) -> f64 {
        if expected == 0.0 {
            self.numeric_zero_tolerance
        } else {
            expected.abs() * self.numeric_relative_tolerance
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    MissingField,
    Boolean,
    Numeric,
    Text,
    TypeMismatch,
}

/// Outcome of comparing one path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldVerdict {
    pub correct: bool,
    pub similarity: f64,
    pub error: Option<String>,
    pub kind: Option<MismatchKind>,
}

impl FieldVerdict {
    fn pass(similarity: f64) -> Self {
        Self {
            correct: true,
            similarity,
            error: None,
            kind: None,
        }
    }

    fn fail(kind: MismatchKind, similarity: f64, error: String) -> Self {
        Self {
            correct: false,
            similarity,
            error: Some(error),
            kind: Some(kind),
        }
    }
}

/// Case-insensitive normalized Indel similarity in `[0, 1]`.
pub fn string_similarity(expected: &str, predicted: &str) -> f64 {
    let expected = expected.to_lowercase();
    let predicted = predicted.to_lowercase();
    if expected == predicted {
        return 1.0;
    }
    fuzz::ratio(expected.chars(), predicted.chars())
}

/// Compares one reference leaf against the candidate leaf at the same path.
///
/// Rules are applied in order: nulls, booleans, numbers, strings, then exact
/// equality for anything else. Booleans are checked before numbers so `true`
/// never falls into numeric tolerance.
pub fn compare_field(
    expected: Option<&Value>,
    predicted: Option<&Value>,
    path: &str,
    policy: &ScoringPolicy,
) -> FieldVerdict {
    let expected_value = FieldValue::classify(expected);
    let predicted_value = FieldValue::classify(predicted);

    match (expected_value, predicted_value) {
        (FieldValue::Null, _) => FieldVerdict::pass(1.0),
        (_, FieldValue::Null) => FieldVerdict::fail(
            MismatchKind::MissingField,
            0.0,
            format!("Missing required field: {path}"),
        ),
        (FieldValue::Bool(left), FieldValue::Bool(right)) => {
            if left == right {
                FieldVerdict::pass(1.0)
            } else {
                FieldVerdict::fail(
                    MismatchKind::Boolean,
                    0.0,
                    format!("Boolean mismatch: expected {left}, got {right}"),
                )
            }
        }
        (FieldValue::Number(left), FieldValue::Number(right)) => {
            if (left - right).abs() <= policy.numeric_tolerance(left) {
                FieldVerdict::pass(1.0)
            } else {
                FieldVerdict::fail(
                    MismatchKind::Numeric,
                    0.0,
                    format!(
                        "Numeric mismatch: expected {}, got {}",
                        display(expected),
                        display(predicted)
                    ),
                )
            }
        }
        (FieldValue::Text(left), FieldValue::Text(right)) => {
            let ratio = string_similarity(left, right);
            if ratio >= policy.string_similarity_threshold {
                FieldVerdict::pass(ratio)
            } else {
                FieldVerdict::fail(
                    MismatchKind::Text,
                    ratio,
                    format!("String mismatch: expected '{left}', got '{right}'"),
                )
            }
        }
        (left, right) => {
            if expected == predicted {
                FieldVerdict::pass(1.0)
            } else {
                FieldVerdict::fail(
                    MismatchKind::TypeMismatch,
                    0.0,
                    format!(
                        "Type/value mismatch: expected {} ({}), got {} ({})",
                        display(expected),
                        left.type_name(),
                        display(predicted),
                        right.type_name()
                    ),
                )
            }
        }
    }
}

fn display(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), Value::to_string)
}
