//! Correlation matrices over dataset columns.

use super::coefficient::correlation;
use super::CorrMethod;
use crate::data::{require_numeric, Dataset};
use crate::error::Result;
use crate::output::save_matrix;
use nalgebra::DMatrix;
use std::path::Path;

/// A square, symmetric correlation matrix with named axes.
///
/// Row and column `i` both correspond to `names()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: DMatrix<f64>,
    method: CorrMethod,
}

impl CorrelationMatrix {
    /// Axis names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The underlying matrix.
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Method used to compute the coefficients.
    pub fn method(&self) -> CorrMethod {
        self.method
    }

    /// Number of regions on each axis.
    pub fn n_regions(&self) -> usize {
        self.names.len()
    }

    /// Coefficient at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// Coefficient between two named regions.
    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        self.get(i, j)
    }

    /// Names of regions whose row is entirely undefined.
    pub fn degenerate_regions(&self) -> Vec<&str> {
        (0..self.n_regions())
            .filter(|&i| self.values.row(i).iter().all(|v| v.is_nan()))
            .map(|i| self.names[i].as_str())
            .collect()
    }

    /// Write the values as a tab-delimited text matrix (names are not written).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_matrix(&self.values, path)
    }
}

/// Correlate the columns of `dataset` over its rows.
///
/// `region_names` selects and orders the columns; `None` uses every column in
/// dataset order. Each pair uses its pairwise-complete rows.
///
/// A column with zero variance (or fewer than two finite values) has an
/// undefined correlation with everything, itself included: its whole row and
/// column are NaN. Every other diagonal entry is exactly 1.0.
///
/// # Errors
/// - `MissingColumns` if a requested name is not a column
/// - `NonNumeric` if a selected column is not numeric
pub fn build_corrmat(
    dataset: &Dataset,
    region_names: Option<&[String]>,
    method: CorrMethod,
) -> Result<CorrelationMatrix> {
    let names: Vec<String> = match region_names {
        Some(names) => names.to_vec(),
        None => dataset.column_names().to_vec(),
    };
    require_numeric(dataset, &names)?;

    let columns: Vec<&[f64]> = names
        .iter()
        .map(|n| dataset.numeric(n))
        .collect::<Result<_>>()?;

    let k = names.len();
    let degenerate: Vec<bool> = columns.iter().map(|c| is_degenerate(c)).collect();
    for (name, _) in names.iter().zip(&degenerate).filter(|(_, d)| **d) {
        log::warn!("Region '{}' has zero variance; its correlations are undefined", name);
    }

    let mut values = DMatrix::from_element(k, k, f64::NAN);
    for i in 0..k {
        if degenerate[i] {
            continue;
        }
        values[(i, i)] = 1.0;
        for j in (i + 1)..k {
            if degenerate[j] {
                continue;
            }
            let r = correlation(columns[i], columns[j], method);
            values[(i, j)] = r;
            values[(j, i)] = r;
        }
    }

    log::debug!("Built {} x {} {} correlation matrix", k, k, method);

    Ok(CorrelationMatrix {
        names,
        values,
        method,
    })
}

/// True when a column has fewer than two finite values or they are all equal.
fn is_degenerate(column: &[f64]) -> bool {
    let mut finite = column.iter().filter(|v| v.is_finite());
    match finite.next() {
        None => true,
        Some(first) => {
            let mut count = 1;
            let mut varies = false;
            for v in finite {
                count += 1;
                varies |= v != first;
            }
            count < 2 || !varies
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use approx::assert_relative_eq;

    fn create_test_dataset() -> Dataset {
        Dataset::from_columns(vec![
            ("lh_frontal", Column::Numeric(vec![2.1, 2.4, 2.2, 2.8, 2.6, 2.3])),
            ("rh_frontal", Column::Numeric(vec![2.0, 2.5, 2.1, 2.7, 2.7, 2.2])),
            ("lh_occipital", Column::Numeric(vec![1.9, 1.7, 2.0, 1.6, 1.8, 2.1])),
            ("flat", Column::Numeric(vec![1.0; 6])),
            ("diagnosis", Column::categorical(&["HC", "SZ", "HC", "SZ", "HC", "SZ"])),
        ])
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let ds = create_test_dataset();
        let regions = names(&["lh_frontal", "rh_frontal", "lh_occipital"]);

        for method in [CorrMethod::Pearson, CorrMethod::Spearman, CorrMethod::Kendall] {
            let m = build_corrmat(&ds, Some(regions.as_slice()), method).unwrap();
            assert_eq!(m.n_regions(), 3);
            assert_eq!(m.method(), method);
            for i in 0..3 {
                assert_eq!(m.get(i, i), Some(1.0));
                for j in 0..3 {
                    let v = m.get(i, j).unwrap();
                    assert_eq!(v, m.get(j, i).unwrap());
                    assert!((-1.0..=1.0).contains(&v));
                }
            }
        }
    }

    #[test]
    fn test_axis_order_follows_request() {
        let ds = create_test_dataset();
        let forward = names(&["lh_frontal", "lh_occipital"]);
        let reverse = names(&["lh_occipital", "lh_frontal"]);

        let a = build_corrmat(&ds, Some(forward.as_slice()), CorrMethod::Pearson).unwrap();
        let b = build_corrmat(&ds, Some(reverse.as_slice()), CorrMethod::Pearson).unwrap();

        assert_eq!(b.names(), &["lh_occipital", "lh_frontal"]);
        assert_relative_eq!(a.get(0, 1).unwrap(), b.get(1, 0).unwrap());
        assert_relative_eq!(
            a.get_by_name("lh_frontal", "lh_occipital").unwrap(),
            b.get(0, 1).unwrap()
        );
    }

    #[test]
    fn test_frontal_pair_positive() {
        let ds = create_test_dataset();
        let regions = names(&["lh_frontal", "rh_frontal", "lh_occipital"]);
        let m = build_corrmat(&ds, Some(regions.as_slice()), CorrMethod::Pearson).unwrap();

        assert!(m.get_by_name("lh_frontal", "rh_frontal").unwrap() > 0.8);
        assert!(m.get_by_name("lh_frontal", "lh_occipital").unwrap() < 0.0);
    }

    #[test]
    fn test_zero_variance_row_is_nan() {
        let ds = create_test_dataset();
        let regions = names(&["lh_frontal", "flat", "rh_frontal"]);
        let m = build_corrmat(&ds, Some(regions.as_slice()), CorrMethod::Pearson).unwrap();

        for k in 0..3 {
            assert!(m.get(1, k).unwrap().is_nan());
            assert!(m.get(k, 1).unwrap().is_nan());
        }
        assert_eq!(m.get(0, 0), Some(1.0));
        assert!(m.get(0, 2).unwrap().is_finite());
        assert_eq!(m.degenerate_regions(), vec!["flat"]);
    }

    #[test]
    fn test_all_columns_when_unnamed() {
        let ds = create_test_dataset().without_column("diagnosis");
        let m = build_corrmat(&ds, None, CorrMethod::Spearman).unwrap();
        assert_eq!(m.names(), ds.column_names());
        assert_eq!(m.values().shape(), (4, 4));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let ds = create_test_dataset();
        let err = build_corrmat(&ds, None, CorrMethod::Pearson).unwrap_err();
        assert_eq!(err.to_string(), "DataFrame columns diagnosis are non numeric");

        let regions = names(&["lh_frontal", "diagnosis"]);
        assert!(build_corrmat(&ds, Some(regions.as_slice()), CorrMethod::Pearson).is_err());
    }

    #[test]
    fn test_missing_region_rejected() {
        let ds = create_test_dataset();
        let regions = names(&["lh_frontal", "lh_temporal"]);
        let err = build_corrmat(&ds, Some(regions.as_slice()), CorrMethod::Pearson).unwrap_err();
        assert_eq!(err.to_string(), "Columns lh_temporal not found in dataset");
    }

    #[test]
    fn test_is_degenerate() {
        assert!(is_degenerate(&[]));
        assert!(is_degenerate(&[1.0]));
        assert!(is_degenerate(&[3.0, 3.0, f64::NAN]));
        assert!(!is_degenerate(&[3.0, f64::NAN, 4.0]));
    }
}
