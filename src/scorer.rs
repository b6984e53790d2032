//! Composite scoring: schema hygiene, field-level correctness, coverage and
//! policy-flag robustness combined into one [`ComparisonReport`].

use serde_json::Value;

use crate::compare::{MismatchKind, ScoringPolicy, compare_field};
use crate::coverage::coverage_from_flat;
use crate::error::Result;
use crate::record::{FlatRecord, flatten_candidate, flatten_reference};
use crate::report::{
    ComparisonReport, CorrectField, FieldIssue, OUTPUT_HYGIENE_MAX, PARSING_CORRECTNESS_MAX,
    ReportDetails, ScoreBreakdown,
};
use crate::robustness::robustness_score;
use crate::schema::{SchemaDescriptor, SchemaValidation, esg_document_schema};

/// Scores candidates against references under one schema and policy.
///
/// Holds no mutable state; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Scorer {
    schema: SchemaDescriptor,
    policy: ScoringPolicy,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(esg_document_schema(), ScoringPolicy::default())
    }
}

impl Scorer {
    pub fn new(schema: SchemaDescriptor, policy: ScoringPolicy) -> Self {
        Self { schema, policy }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn validate_schema(&self, candidate: &Value) -> SchemaValidation {
        self.schema.validate(candidate)
    }

    /// Scores `candidate` against `reference`.
    ///
    /// Fails only for a reference that is not an object or exceeds
    /// [`MAX_RECORD_DEPTH`](crate::record::MAX_RECORD_DEPTH). Every
    /// candidate problem is recorded in the report.
    pub fn compare(&self, candidate: &Value, reference: &Value) -> Result<ComparisonReport> {
        let reference_flat = flatten_reference(reference)?;
        let candidate_flat = flatten_candidate(candidate);

        let validation = self.validate_schema(candidate);
        let output_hygiene = if validation.is_valid() {
            OUTPUT_HYGIENE_MAX
        } else {
            0.0
        };

        let mut details = self.compare_fields(&candidate_flat, &reference_flat);
        let checked = reference_flat.values().filter(|value| !value.is_null()).count();
        let parsing_correctness = if checked == 0 {
            0.0
        } else {
            details.correct_fields.len() as f64 / checked as f64 * PARSING_CORRECTNESS_MAX
        };

        let breakdown = ScoreBreakdown {
            parsing_correctness,
            coverage: coverage_from_flat(&candidate_flat, &reference_flat),
            robustness: robustness_score(candidate),
            output_hygiene,
        };

        let (schema_valid, schema_errors) = validation.into_parts();
        details.schema_valid = schema_valid;
        details.schema_errors = schema_errors;

        Ok(ComparisonReport {
            total_score: breakdown.total(),
            breakdown,
            details,
        })
    }

    fn compare_fields(&self, candidate: &FlatRecord, reference: &FlatRecord) -> ReportDetails {
        let mut details = ReportDetails::default();

        for (path, expected) in reference.iter().filter(|(_, value)| !value.is_null()) {
            let predicted = candidate.get(path);
            let verdict = compare_field(Some(expected), predicted, path, &self.policy);
            let predicted = predicted.cloned().unwrap_or(Value::Null);

            if verdict.correct {
                details.correct_fields.push(CorrectField {
                    field: path.clone(),
                    value: predicted,
                    similarity: verdict.similarity,
                });
                continue;
            }

            let kind = verdict.kind.unwrap_or(MismatchKind::TypeMismatch);
            let issue = FieldIssue {
                field: path.clone(),
                expected: expected.clone(),
                predicted,
                error: verdict.error.unwrap_or_default(),
                similarity: verdict.similarity,
                kind,
            };
            if kind == MismatchKind::MissingField {
                details.missing_fields.push(issue);
            } else {
                details.incorrect_fields.push(issue);
            }
        }

        details
    }
}

/// Scores `candidate` against `reference` with the built-in ESG schema and
/// default tolerances.
pub fn compare(candidate: &Value, reference: &Value) -> Result<ComparisonReport> {
    Scorer::default().compare(candidate, reference)
}

/// Checks `candidate` against the built-in ESG schema.
pub fn validate_schema(candidate: &Value) -> SchemaValidation {
    esg_document_schema().validate(candidate)
}

#[cfg(test)]
mod tests;
