use thiserror::Error;

/// Failures the scoring core escalates to its caller.
///
/// Per-field and per-dimension problems never show up here; they are recorded
/// in the [`ComparisonReport`](crate::ComparisonReport) instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("malformed reference record: {0}")]
    MalformedReference(String),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
