use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use esg_score::{SchemaDescriptor, esg_document_schema};
use serde_json::Value;

use crate::util::read_json;

/// Reference records keyed by document id, e.g. `acme_2023.pdf`.
pub type ExpectedResults = BTreeMap<String, Value>;

pub fn ensure_data_layout(data_dir: &Path, expected_path: &Path) -> Result<()> {
    if !data_dir.is_dir() {
        bail!("data directory does not exist: {}", data_dir.display());
    }
    if !expected_path.is_file() {
        bail!(
            "expected results file not found at {}",
            expected_path.display()
        );
    }
    Ok(())
}

pub fn load_expected_results(path: &Path) -> Result<ExpectedResults> {
    read_json(path).with_context(|| format!("failed to load expected results: {}", path.display()))
}

pub fn load_schema(path: Option<&Path>) -> Result<SchemaDescriptor> {
    match path {
        Some(path) => read_json(path)
            .with_context(|| format!("failed to load schema descriptor: {}", path.display())),
        None => Ok(esg_document_schema()),
    }
}

/// Finds the reference key for a candidate file.
///
/// Tries the file name itself, then its stem, then any key sharing that stem
/// (so `acme_2023.json` scores against `acme_2023.pdf`). Keys are scanned in
/// sorted order, so the first stem match wins. Returns the key together with
/// its reference record.
pub fn resolve_document_id<'a>(
    file_name: &str,
    expected: &'a ExpectedResults,
) -> Option<(String, &'a Value)> {
    let stem = stem_of(file_name);
    expected
        .get_key_value(file_name)
        .or_else(|| expected.get_key_value(stem))
        .or_else(|| expected.iter().find(|(key, _)| stem_of(key) == stem))
        .map(|(key, reference)| (key.clone(), reference))
}

fn stem_of(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}
