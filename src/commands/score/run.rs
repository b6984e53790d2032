use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use esg_score::Scorer;
use serde_json::Value;
use tracing::{info, warn};

use super::load::{
    ExpectedResults, ensure_data_layout, load_expected_results, load_schema, resolve_document_id,
};
use super::output::{
    ScoreSummary, interpret_score, write_detailed_issues, write_header, write_outcome_row,
    write_summary,
};
use super::store::{open_history, record_run};
use crate::cli::ScoreArgs;
use crate::commands::inventory::{discover_candidates, file_name};
use crate::model::{DocumentOutcome, DocumentStatus, ScorePaths, ScoreRunManifest};
use crate::util::{now_utc_string, read_json, score_run_id, write_json_pretty};

pub fn run(args: ScoreArgs) -> Result<()> {
    let expected_path = args
        .expected_path
        .clone()
        .unwrap_or_else(|| args.data_dir.join("expected_results.json"));
    let candidates_dir = args
        .candidates_dir
        .clone()
        .unwrap_or_else(|| args.data_dir.join("candidates"));
    let report_path = args
        .report_path
        .clone()
        .unwrap_or_else(|| args.data_dir.join("manifests").join("score_report.json"));
    let db_path = if args.no_history {
        None
    } else {
        Some(
            args.db_path
                .clone()
                .unwrap_or_else(|| args.data_dir.join("score_history.sqlite")),
        )
    };

    ensure_data_layout(&args.data_dir, &expected_path)?;
    let expected = load_expected_results(&expected_path)?;
    let schema = load_schema(args.schema_path.as_deref())?;
    let scorer = Scorer::new(schema, args.policy.to_policy());
    info!(
        references = expected.len(),
        schema = %scorer.schema().name,
        "loaded expected results"
    );

    let candidate_paths = discover_candidates(&candidates_dir)?;
    if candidate_paths.is_empty() {
        warn!(dir = %candidates_dir.display(), "no candidate files found");
        return Ok(());
    }
    info!(candidate_count = candidate_paths.len(), "scoring candidates");

    let documents = score_candidates(&scorer, &expected, &candidate_paths)?;

    let summary = ScoreSummary::from_outcomes(&documents);
    let mut output = io::BufWriter::new(io::stdout().lock());
    write_header(&mut output)?;
    for document in &documents {
        write_outcome_row(&mut output, document)?;
    }
    write_summary(&mut output, &summary)?;
    write_detailed_issues(&mut output, &documents)?;
    output.flush()?;

    let average_score = summary.average();
    let manifest = ScoreRunManifest {
        manifest_version: 1,
        run_id: score_run_id(Utc::now()),
        generated_at: now_utc_string(),
        schema_name: scorer.schema().name.clone(),
        policy: *scorer.policy(),
        paths: ScorePaths {
            data_dir: args.data_dir.display().to_string(),
            expected_path: expected_path.display().to_string(),
            candidates_dir: candidates_dir.display().to_string(),
            report_path: report_path.display().to_string(),
            db_path: db_path.as_ref().map(|path| path.display().to_string()),
        },
        candidate_count: summary.total,
        processed_count: summary.processed,
        average_score,
        interpretation: average_score
            .map(interpret_score)
            .unwrap_or("No files were successfully processed")
            .to_string(),
        documents,
    };

    write_json_pretty(&report_path, &manifest)?;
    info!(path = %report_path.display(), "wrote score report");

    if let Some(db_path) = db_path {
        let mut connection = open_history(&db_path)?;
        record_run(&mut connection, &manifest)?;
        info!(path = %db_path.display(), run_id = %manifest.run_id, "recorded run history");
    }

    info!(
        processed = manifest.processed_count,
        total = manifest.candidate_count,
        average_score = average_score.unwrap_or_default(),
        "scoring completed"
    );

    Ok(())
}

pub(super) fn score_candidates(
    scorer: &Scorer,
    expected: &ExpectedResults,
    candidate_paths: &[PathBuf],
) -> Result<Vec<DocumentOutcome>> {
    let mut documents = Vec::with_capacity(candidate_paths.len());
    for path in candidate_paths {
        documents.push(score_candidate(scorer, expected, path)?);
    }
    Ok(documents)
}

fn score_candidate(
    scorer: &Scorer,
    expected: &ExpectedResults,
    path: &Path,
) -> Result<DocumentOutcome> {
    let file = file_name(path)?;
    let mut outcome = DocumentOutcome {
        file: file.clone(),
        doc_id: None,
        status: DocumentStatus::NoExpectedResults,
        message: None,
        comparison: None,
    };

    let Some((doc_id, reference)) = resolve_document_id(&file, expected) else {
        warn!(file = %file, "no expected results for candidate");
        return Ok(outcome);
    };
    outcome.doc_id = Some(doc_id.clone());

    let candidate = match read_json::<Value>(path) {
        Ok(candidate) => candidate,
        Err(err) => {
            warn!(file = %file, error = %err, "candidate could not be read");
            outcome.status = DocumentStatus::UnreadableCandidate;
            outcome.message = Some(format!("{err:#}"));
            return Ok(outcome);
        }
    };

    match scorer.compare(&candidate, reference) {
        Ok(report) => {
            outcome.status = DocumentStatus::Processed;
            outcome.comparison = Some(report);
        }
        Err(err) => {
            warn!(doc_id = %doc_id, error = %err, "reference record is malformed");
            outcome.status = DocumentStatus::MalformedReference;
            outcome.message = Some(err.to_string());
        }
    }

    Ok(outcome)
}
