//! Partitioning participants into groups by a categorical variable.
//!
//! The shuffled variant supports null models: group labels are permuted across
//! participants (same multiset of labels) before splitting, so any structure
//! that differs between the resulting groups arises by chance.
//!
//! # Example
//!
//! ```ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use regional_corrmat::group::{split_groups, split_groups_shuffled};
//!
//! let groups = split_groups(&dataset, "diagnosis")?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let null_groups = split_groups_shuffled(&dataset, "diagnosis", &mut rng)?;
//! ```

use crate::data::Dataset;
use crate::error::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Subsets of a dataset keyed by `"{group_variable}_{value}"`, sorted by key.
pub type GroupedDataset = BTreeMap<String, Dataset>;

/// Name of the auxiliary column holding permuted labels of `group_variable`.
pub fn shuffled_column_name(group_variable: &str) -> String {
    format!("{}_rand", group_variable)
}

/// Split `dataset` into one subset per distinct value of `group_variable`.
///
/// Each subset keeps every column and the original row order. Rows with a
/// missing group value belong to no subset.
pub fn split_groups(dataset: &Dataset, group_variable: &str) -> Result<GroupedDataset> {
    partition(dataset, group_variable)
}

/// Split `dataset` after randomly permuting the values of `group_variable`.
///
/// The permuted labels are stored in an auxiliary `"{group_variable}_rand"`
/// column of a working copy, and the split uses that column, so keys read
/// `"{group_variable}_rand_{value}"`. Every subset carries the auxiliary
/// column; `dataset` itself is left unchanged.
pub fn split_groups_shuffled<R: Rng + ?Sized>(
    dataset: &Dataset,
    group_variable: &str,
    rng: &mut R,
) -> Result<GroupedDataset> {
    let column = dataset.column(group_variable)?;
    let shuffled_name = shuffled_column_name(group_variable);

    let mut order: Vec<usize> = (0..dataset.n_rows()).collect();
    order.shuffle(rng);

    let working = dataset
        .clone()
        .with_column(shuffled_name.as_str(), column.select_rows(&order))?;
    log::trace!("Shuffled '{}' into '{}'", group_variable, shuffled_name);

    partition(&working, &shuffled_name)
}

fn partition(dataset: &Dataset, group_variable: &str) -> Result<GroupedDataset> {
    let column = dataset.column(group_variable)?;

    let mut rows_by_label: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for row in 0..dataset.n_rows() {
        if let Some(label) = column.label(row) {
            rows_by_label.entry(label).or_default().push(row);
        }
    }

    log::debug!(
        "Split {} rows on '{}' into {} groups",
        dataset.n_rows(),
        group_variable,
        rows_by_label.len()
    );

    Ok(rows_by_label
        .into_iter()
        .map(|(label, rows)| {
            (
                format!("{}_{}", group_variable, label),
                dataset.select_rows(&rows),
            )
        })
        .collect())
}
