use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::ScoreRunManifest;
use crate::util::ensure_parent_directory;

pub fn open_history(db_path: &Path) -> Result<Connection> {
    ensure_parent_directory(db_path)?;
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open score history: {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub(crate) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS runs (
              run_id TEXT PRIMARY KEY,
              generated_at TEXT NOT NULL,
              schema_name TEXT NOT NULL,
              candidate_count INTEGER NOT NULL,
              processed_count INTEGER NOT NULL,
              average_score REAL,
              report_path TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS run_documents (
              run_id TEXT NOT NULL,
              file TEXT NOT NULL,
              doc_id TEXT,
              status TEXT NOT NULL,
              total_score REAL,
              parsing_correctness REAL,
              coverage REAL,
              robustness REAL,
              output_hygiene REAL,
              schema_valid INTEGER,
              incorrect_count INTEGER,
              missing_count INTEGER,
              PRIMARY KEY(run_id, file),
              FOREIGN KEY(run_id) REFERENCES runs(run_id)
            );

            CREATE INDEX IF NOT EXISTS idx_run_documents_doc_id ON run_documents(doc_id);
            ",
        )
        .context("failed to create score history schema")
}

pub fn record_run(connection: &mut Connection, manifest: &ScoreRunManifest) -> Result<()> {
    let tx = connection.transaction()?;

    tx.execute(
        "
        INSERT INTO runs (
          run_id, generated_at, schema_name, candidate_count,
          processed_count, average_score, report_path
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ",
        params![
            manifest.run_id,
            manifest.generated_at,
            manifest.schema_name,
            manifest.candidate_count as i64,
            manifest.processed_count as i64,
            manifest.average_score,
            manifest.paths.report_path,
        ],
    )
    .with_context(|| format!("failed to record run {}", manifest.run_id))?;

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO run_documents (
              run_id, file, doc_id, status, total_score, parsing_correctness,
              coverage, robustness, output_hygiene, schema_valid,
              incorrect_count, missing_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ",
        )?;

        for document in &manifest.documents {
            let comparison = document.comparison.as_ref();
            let breakdown = comparison.map(|report| report.breakdown);
            statement
                .execute(params![
                    manifest.run_id,
                    document.file,
                    document.doc_id,
                    document.status.as_str(),
                    comparison.map(|report| report.total_score),
                    breakdown.map(|scores| scores.parsing_correctness),
                    breakdown.map(|scores| scores.coverage),
                    breakdown.map(|scores| scores.robustness),
                    breakdown.map(|scores| scores.output_hygiene),
                    comparison.map(|report| report.details.schema_valid),
                    comparison.map(|report| report.details.incorrect_fields.len() as i64),
                    comparison.map(|report| report.details.missing_fields.len() as i64),
                ])
                .with_context(|| format!("failed to record document {}", document.file))?;
        }
    }

    tx.commit()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummaryRow {
    pub run_id: String,
    pub generated_at: String,
    pub schema_name: String,
    pub candidate_count: i64,
    pub processed_count: i64,
    pub average_score: Option<f64>,
}

pub fn latest_run(connection: &Connection) -> Result<Option<RunSummaryRow>> {
    let row = connection
        .query_row(
            "
            SELECT run_id, generated_at, schema_name, candidate_count,
                   processed_count, average_score
            FROM runs
            ORDER BY generated_at DESC, run_id DESC
            LIMIT 1
            ",
            [],
            |row| {
                Ok(RunSummaryRow {
                    run_id: row.get(0)?,
                    generated_at: row.get(1)?,
                    schema_name: row.get(2)?,
                    candidate_count: row.get(3)?,
                    processed_count: row.get(4)?,
                    average_score: row.get(5)?,
                })
            },
        )
        .optional()
        .context("failed to query latest run")?;
    Ok(row)
}

pub fn run_count(connection: &Connection) -> Result<i64> {
    let count = connection.query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
    Ok(count)
}
