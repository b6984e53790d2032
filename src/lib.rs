//! Scoring engine for structured ESG extractions.
//!
//! A candidate record (what an extractor produced from a report) is graded
//! against a curated reference record on four capped dimensions:
//!
//! | dimension           | max |
//! |---------------------|-----|
//! | parsing correctness |  60 |
//! | coverage            |  20 |
//! | robustness          |  10 |
//! | output hygiene      |  10 |
//!
//! The library is pure: it reads no files and does no logging.

pub mod compare;
pub mod coverage;
pub mod error;
pub mod record;
pub mod report;
pub mod robustness;
pub mod schema;
pub mod scorer;

pub use compare::{FieldVerdict, MismatchKind, ScoringPolicy, compare_field, string_similarity};
pub use coverage::{COVERAGE_MAX, coverage_score};
pub use error::ScoreError;
pub use record::{FieldValue, FlatRecord, flatten, flatten_truncated, value_at};
pub use report::{ComparisonReport, CorrectField, FieldIssue, ReportDetails, ScoreBreakdown};
pub use robustness::{POLICY_SYNONYMS, ROBUSTNESS_MAX, robustness_score, synonyms_for};
pub use schema::{
    FieldSpec, FieldType, SchemaDescriptor, SchemaValidation, SchemaViolation,
    esg_document_schema,
};
pub use scorer::{Scorer, compare, validate_schema};
