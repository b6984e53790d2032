use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::inventory::inventory_manifest_path;
use crate::commands::score::{RunSummaryRow, latest_run, open_history, run_count};
use crate::model::CandidateInventoryManifest;
use crate::util::read_json;

pub fn run(args: StatusArgs) -> Result<()> {
    let inventory_path = inventory_manifest_path(&args.data_dir);
    let expected_path = args.data_dir.join("expected_results.json");
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_dir.join("score_history.sqlite"));

    info!(data_dir = %args.data_dir.display(), "status requested");

    if expected_path.exists() {
        info!(path = %expected_path.display(), "expected results present");
    } else {
        warn!(path = %expected_path.display(), "expected results missing");
    }

    if inventory_path.exists() {
        let inventory: CandidateInventoryManifest = read_json(&inventory_path)?;
        info!(
            generated_at = %inventory.generated_at,
            candidate_count = inventory.candidate_count,
            source = %inventory.source_directory,
            "loaded inventory manifest"
        );
    } else {
        warn!(path = %inventory_path.display(), "inventory manifest missing");
    }

    if db_path.exists() {
        let connection = open_history(&db_path)?;
        let (runs, latest) = history_summary(&connection)?;
        match latest {
            Some(latest) => info!(
                path = %db_path.display(),
                runs,
                latest_run_id = %latest.run_id,
                latest_generated_at = %latest.generated_at,
                latest_schema = %latest.schema_name,
                latest_processed = latest.processed_count,
                latest_candidates = latest.candidate_count,
                latest_average_score = latest.average_score.unwrap_or_default(),
                "score history status"
            ),
            None => info!(path = %db_path.display(), runs, "score history is empty"),
        }
    } else {
        warn!(path = %db_path.display(), "score history missing");
    }

    Ok(())
}

fn history_summary(connection: &Connection) -> Result<(i64, Option<RunSummaryRow>)> {
    Ok((run_count(connection)?, latest_run(connection)?))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::history_summary;

    #[test]
    fn history_summary_reports_an_empty_history() {
        let connection = Connection::open_in_memory().unwrap();
        crate::commands::score::ensure_history_schema(&connection).unwrap();

        let (runs, latest) = history_summary(&connection).unwrap();
        assert_eq!(runs, 0);
        assert!(latest.is_none());
    }

    #[test]
    fn history_summary_propagates_query_errors() {
        let connection = Connection::open_in_memory().unwrap();

        let error = history_summary(&connection).expect_err("runs table is missing");
        assert!(format!("{error:#}").contains("no such table"));
    }
}
