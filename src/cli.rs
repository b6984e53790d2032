use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use esg_score::ScoringPolicy;
use esg_score::compare::{
    DEFAULT_NUMERIC_RELATIVE_TOLERANCE, DEFAULT_NUMERIC_ZERO_TOLERANCE,
    DEFAULT_STRING_SIMILARITY_THRESHOLD,
};

#[derive(Parser, Debug)]
#[command(
    name = "esg-score",
    version,
    about = "Score ESG report extractions against curated reference records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Score(ScoreArgs),
    Validate(ValidateArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long)]
    pub candidates_dir: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long)]
    pub expected_path: Option<PathBuf>,

    #[arg(long)]
    pub candidates_dir: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_history: bool,

    #[arg(long)]
    pub schema_path: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PolicyArgs {
    #[arg(long, default_value_t = DEFAULT_NUMERIC_RELATIVE_TOLERANCE)]
    pub numeric_tolerance: f64,

    #[arg(long, default_value_t = DEFAULT_NUMERIC_ZERO_TOLERANCE)]
    pub zero_tolerance: f64,

    #[arg(long, default_value_t = DEFAULT_STRING_SIMILARITY_THRESHOLD)]
    pub string_threshold: f64,
}

impl PolicyArgs {
    pub fn to_policy(self) -> ScoringPolicy {
        ScoringPolicy {
            numeric_relative_tolerance: self.numeric_tolerance,
            numeric_zero_tolerance: self.zero_tolerance,
            string_similarity_threshold: self.string_threshold,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long)]
    pub candidate_path: PathBuf,

    #[arg(long)]
    pub schema_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
