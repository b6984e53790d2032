use esg_score::{ComparisonReport, ScoringPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub filename: String,
    pub bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub candidate_count: usize,
    pub candidates: Vec<CandidateEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Processed,
    NoExpectedResults,
    UnreadableCandidate,
    MalformedReference,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::NoExpectedResults => "no_expected_results",
            Self::UnreadableCandidate => "unreadable_candidate",
            Self::MalformedReference => "malformed_reference",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Processed => "Processed",
            Self::NoExpectedResults => "No expected results",
            Self::UnreadableCandidate => "Unreadable candidate",
            Self::MalformedReference => "Malformed reference",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub file: String,
    pub doc_id: Option<String>,
    pub status: DocumentStatus,
    pub message: Option<String>,
    pub comparison: Option<ComparisonReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScorePaths {
    pub data_dir: String,
    pub expected_path: String,
    pub candidates_dir: String,
    pub report_path: String,
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub schema_name: String,
    pub policy: ScoringPolicy,
    pub paths: ScorePaths,
    pub candidate_count: usize,
    pub processed_count: usize,
    pub average_score: Option<f64>,
    pub interpretation: String,
    pub documents: Vec<DocumentOutcome>,
}
