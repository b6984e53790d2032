use serde_json::Value;

use crate::error::Result;
use crate::record::{FlatRecord, flatten_candidate, flatten_reference};

pub const COVERAGE_MAX: f64 = 20.0;

/// Share of populated reference fields the candidate also populated, scaled
/// to [`COVERAGE_MAX`]. Correctness of the values plays no part.
pub fn coverage_score(candidate: &Value, reference: &Value) -> Result<f64> {
    let reference_flat = flatten_reference(reference)?;
    let candidate_flat = flatten_candidate(candidate);
    Ok(coverage_from_flat(&candidate_flat, &reference_flat))
}

pub(crate) fn coverage_from_flat(candidate: &FlatRecord, reference: &FlatRecord) -> f64 {
    let populated = reference
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(path, _)| path)
        .collect::<Vec<_>>();
    if populated.is_empty() {
        return COVERAGE_MAX;
    }

    let covered = populated
        .iter()
        .filter(|path| candidate.get(path.as_str()).is_some_and(|value| !value.is_null()))
        .count();
    covered as f64 / populated.len() as f64 * COVERAGE_MAX
}
