//! Column checks shared by the residual and correlation entry points.

use crate::data::Dataset;
use crate::error::{CorrmatError, Result};

/// Names from `names` that are not columns of `dataset`, deduplicated, in order.
pub fn missing_columns<S: AsRef<str>>(dataset: &Dataset, names: &[S]) -> Vec<String> {
    unique(names)
        .into_iter()
        .filter(|n| !dataset.has_column(n))
        .collect()
}

/// Names from `names` whose columns exist but are not numeric, deduplicated, in order.
pub fn non_numeric_columns<S: AsRef<str>>(dataset: &Dataset, names: &[S]) -> Vec<String> {
    unique(names)
        .into_iter()
        .filter(|n| dataset.get(n).is_some_and(|c| !c.is_numeric()))
        .collect()
}

/// Require every named column to exist and be numeric.
///
/// Absent columns are reported before non-numeric ones.
pub fn require_numeric<S: AsRef<str>>(dataset: &Dataset, names: &[S]) -> Result<()> {
    let missing = missing_columns(dataset, names);
    if !missing.is_empty() {
        return Err(CorrmatError::MissingColumns(missing));
    }

    let non_numeric = non_numeric_columns(dataset, names);
    if !non_numeric.is_empty() {
        return Err(CorrmatError::NonNumeric(non_numeric));
    }

    Ok(())
}

fn unique<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}
