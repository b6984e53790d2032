use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compare::MismatchKind;

pub const PARSING_CORRECTNESS_MAX: f64 = 60.0;
pub const OUTPUT_HYGIENE_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub parsing_correctness: f64,
    pub coverage: f64,
    pub robustness: f64,
    pub output_hygiene: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.parsing_correctness + self.coverage + self.robustness + self.output_hygiene
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectField {
    pub field: String,
    pub value: Value,
    pub similarity: f64,
}

/// A reference field the candidate got wrong or left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub expected: Value,
    pub predicted: Value,
    pub error: String,
    pub similarity: f64,
    pub kind: MismatchKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDetails {
    pub correct_fields: Vec<CorrectField>,
    pub incorrect_fields: Vec<FieldIssue>,
    pub missing_fields: Vec<FieldIssue>,
    pub schema_valid: bool,
    pub schema_errors: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub details: ReportDetails,
}

impl ComparisonReport {
    pub fn has_issues(&self) -> bool {
        !self.details.schema_valid
            || !self.details.incorrect_fields.is_empty()
            || !self.details.missing_fields.is_empty()
    }

    /// Incorrect fields followed by missing ones, in path order within each.
    pub fn issues(&self) -> impl Iterator<Item = &FieldIssue> {
        self.details
            .incorrect_fields
            .iter()
            .chain(self.details.missing_fields.iter())
    }
}
