//! Region and covariate name lists.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Number of subcortical regions leading an NSPN 308 parcellation names file.
pub const NSPN_308_SUBCORTICAL: usize = 41;

/// Read a names file: one name per line, blank lines skipped.
pub fn read_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_names(&content))
}

/// Parse names from text, one per line.
pub fn parse_names(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Drop the leading subcortical regions of an NSPN 308 style names list.
pub fn apply_308_style(names: Vec<String>) -> Vec<String> {
    names.into_iter().skip(NSPN_308_SUBCORTICAL).collect()
}
