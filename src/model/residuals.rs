//! Covariate correction via ordinary least squares residuals.
//!
//! Each region column `y` is regressed on a design matrix `X` built from the
//! covariate columns and replaced by `y - X (X⁺ y)`, where `X⁺` is the
//! Moore-Penrose pseudo-inverse. The pseudo-inverse is taken from an SVD with
//! a relative singular value cutoff, so rank-deficient designs (collinear
//! covariates, duplicated intercepts) still yield the least-squares projection.
//!
//! # Design matrix
//!
//! - no covariates: a single column of ones (the residuals are mean-centred)
//! - one covariate: that column
//! - several covariates: the columns side by side, in list order
//!
//! No intercept is added unless [`ResidualOptions::append_intercept`] is set.

use crate::data::{require_numeric, Column, Dataset};
use crate::error::{CorrmatError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Options for residual correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualOptions {
    /// Append a column of ones to a non-empty covariate design.
    pub append_intercept: bool,
}

/// Replace each region column by its residuals after regressing out the covariates.
///
/// Returns a dataset holding only the region columns, in `region_names` order,
/// with the same rows as `dataset`.
///
/// # Errors
/// - `EmptyData` if `region_names` is empty or the dataset has no rows
/// - `MissingColumns` if a region or covariate is not a column
/// - `NonNumeric` if a region or covariate column is not numeric
pub fn residuals<R: AsRef<str>, C: AsRef<str>>(
    dataset: &Dataset,
    region_names: &[R],
    covariate_names: &[C],
) -> Result<Dataset> {
    residuals_with(dataset, region_names, covariate_names, &ResidualOptions::default())
}

/// [`residuals`] with explicit options.
pub fn residuals_with<R: AsRef<str>, C: AsRef<str>>(
    dataset: &Dataset,
    region_names: &[R],
    covariate_names: &[C],
    options: &ResidualOptions,
) -> Result<Dataset> {
    if region_names.is_empty() {
        return Err(CorrmatError::EmptyData("No region names given".to_string()));
    }

    let requested: Vec<&str> = region_names
        .iter()
        .map(AsRef::<str>::as_ref)
        .chain(covariate_names.iter().map(AsRef::<str>::as_ref))
        .collect();
    require_numeric(dataset, &requested)?;

    if dataset.n_rows() == 0 {
        return Err(CorrmatError::EmptyData("Dataset has no rows".to_string()));
    }

    let design = design_matrix(dataset, covariate_names, options.append_intercept)?;
    log::debug!(
        "Correcting {} regions for {} covariates ({} x {} design)",
        region_names.len(),
        covariate_names.len(),
        design.nrows(),
        design.ncols()
    );

    let projection = LeastSquares::new(design)?;

    let mut corrected = Dataset::new();
    for name in region_names {
        let name = name.as_ref();
        let y = DVector::from_column_slice(dataset.numeric(name)?);
        let res = projection.residuals(&y);
        corrected = corrected.with_column(name, Column::Numeric(res.iter().copied().collect()))?;
    }

    Ok(corrected)
}

/// Build the covariate design matrix (rows = participants).
pub fn design_matrix<S: AsRef<str>>(
    dataset: &Dataset,
    covariate_names: &[S],
    append_intercept: bool,
) -> Result<DMatrix<f64>> {
    let n = dataset.n_rows();
    let ones = vec![1.0; n];
    let mut columns: Vec<&[f64]> = Vec::with_capacity(covariate_names.len() + 1);
    for name in covariate_names {
        columns.push(dataset.numeric(name.as_ref())?);
    }

    if columns.is_empty() || append_intercept {
        columns.push(&ones);
    }

    let data: Vec<f64> = columns.iter().flat_map(|c| c.iter().copied()).collect();
    Ok(DMatrix::from_column_slice(n, columns.len(), &data))
}

/// Least-squares projection onto the column space of a design matrix.
#[derive(Debug, Clone)]
struct LeastSquares {
    design: DMatrix<f64>,
    /// Pseudo-inverse; `None` when the design holds non-finite values.
    pinv: Option<DMatrix<f64>>,
}

impl LeastSquares {
    fn new(design: DMatrix<f64>) -> Result<Self> {
        if design.iter().any(|v| !v.is_finite()) {
            log::warn!("Covariate design contains missing or non-finite values; residuals will be NaN");
            return Ok(Self { design, pinv: None });
        }

        let (n, p) = design.shape();
        let svd = design.clone().svd(true, true);
        let max_sv = svd.singular_values.max();
        let tol = n.max(p) as f64 * f64::EPSILON * max_sv;
        let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
        if rank < p {
            log::debug!("Design matrix is rank deficient (rank {} < {} columns)", rank, p);
        }

        let pinv = svd
            .pseudo_inverse(tol)
            .map_err(|e| CorrmatError::Numerical(e.to_string()))?;

        Ok(Self {
            design,
            pinv: Some(pinv),
        })
    }

    fn residuals(&self, y: &DVector<f64>) -> DVector<f64> {
        match &self.pinv {
            Some(pinv) => {
                let beta = pinv * y;
                y - &self.design * beta
            }
            None => DVector::from_element(y.len(), f64::NAN),
        }
    }
}
