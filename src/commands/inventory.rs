use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{CandidateEntry, CandidateInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let candidates_dir = args
        .candidates_dir
        .clone()
        .unwrap_or_else(|| args.data_dir.join("candidates"));
    let manifest = build_manifest(&candidates_dir)?;

    if args.dry_run {
        info!(
            candidate_count = manifest.candidate_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| inventory_manifest_path(&args.data_dir));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(candidate_count = manifest.candidate_count, "inventory completed");

    Ok(())
}

pub fn inventory_manifest_path(data_dir: &Path) -> PathBuf {
    data_dir.join("manifests").join("candidate_inventory.json")
}

pub fn build_manifest(candidates_dir: &Path) -> Result<CandidateInventoryManifest> {
    let candidate_paths = discover_candidates(candidates_dir)?;
    if candidate_paths.is_empty() {
        bail!("no candidate JSON files found in {}", candidates_dir.display());
    }

    let mut candidates = Vec::with_capacity(candidate_paths.len());
    for path in candidate_paths {
        let filename = file_name(&path)?;
        let bytes = fs::metadata(&path)
            .with_context(|| format!("failed to inspect {}", path.display()))?
            .len();
        let sha256 = sha256_file(&path)?;

        candidates.push(CandidateEntry {
            filename,
            bytes,
            sha256,
        });
    }

    Ok(CandidateInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: candidates_dir.display().to_string(),
        candidate_count: candidates.len(),
        candidates,
    })
}

/// Candidate `*.json` files directly under `dir`, sorted by path.
pub fn discover_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            candidates.push(path);
        }
    }

    candidates.sort();
    Ok(candidates)
}

pub fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("esg-score-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("scratch dir should be creatable");
        dir
    }

    #[test]
    fn discover_candidates_keeps_sorted_json_files_only() {
        let dir = scratch_dir("discover");
        fs::write(dir.join("b_2023.json"), "{}").unwrap();
        fs::write(dir.join("a_2022.JSON"), "{}").unwrap();
        fs::write(dir.join("notes.txt"), "skip").unwrap();
        fs::create_dir_all(dir.join("nested.json")).unwrap();

        let found = discover_candidates(&dir).expect("dir is readable");
        let names: Vec<String> = found.iter().map(|path| file_name(path).unwrap()).collect();
        assert_eq!(names, vec!["a_2022.JSON", "b_2023.json"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn build_manifest_hashes_each_candidate() {
        let dir = scratch_dir("manifest");
        fs::write(dir.join("acme.json"), "{}").unwrap();

        let manifest = build_manifest(&dir).expect("one candidate present");
        assert_eq!(manifest.candidate_count, 1);
        assert_eq!(manifest.candidates[0].bytes, 2);
        assert_eq!(
            manifest.candidates[0].sha256,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn build_manifest_rejects_empty_directory() {
        let dir = scratch_dir("empty");
        let error = build_manifest(&dir).expect_err("no candidates present");
        assert!(error.to_string().contains("no candidate JSON files"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
