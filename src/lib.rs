//! Structural correlation matrices from regional brain measures.
//!
//! Given a table with one row per participant and columns for regional
//! measures (e.g. cortical thickness per parcel) and covariates (age, sex,
//! scanner site), this library removes the linear effect of the covariates
//! from every region and correlates the corrected regions with each other.
//! The resulting matrix is the input for structural covariance network
//! construction.
//!
//! # Overview
//!
//! - **data**: the participant table (`Dataset`), name-list files, column checks
//! - **model**: covariate correction by least-squares residuals
//! - **corr**: Pearson, Spearman and Kendall correlation matrices
//! - **group**: splitting participants by a group variable, optionally shuffled
//! - **output**: tab-delimited matrix files
//! - **pipeline**: one-shot runs and YAML run configurations
//!
//! # Example
//!
//! ```no_run
//! use regional_corrmat::prelude::*;
//!
//! let dataset = Dataset::from_csv("regional_measures.csv").unwrap();
//! let names = read_names("names.txt").unwrap();
//! let covars = vec!["age".to_string(), "male".to_string()];
//!
//! let matrix = corrmat_from_regional_measures(&dataset, &names, &covars, CorrMethod::Pearson).unwrap();
//! matrix.save("results/corrmat.txt").unwrap();
//! ```

pub mod corr;
pub mod data;
pub mod error;
pub mod group;
pub mod model;
pub mod output;
pub mod pipeline;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::corr::{build_corrmat, correlation, CorrMethod, CorrelationMatrix};
    pub use crate::data::{
        apply_308_style, non_numeric_columns, read_names, require_numeric, Column, ColumnType,
        Dataset,
    };
    pub use crate::error::{CorrmatError, Result};
    pub use crate::group::{split_groups, split_groups_shuffled, GroupedDataset};
    pub use crate::model::{residuals, residuals_with, ResidualOptions};
    pub use crate::output::save_matrix;
    pub use crate::pipeline::{
        corrmat_from_regional_measures, group_corrmats, GroupConfig, GroupMatrix, RunConfig,
        RunSummary,
    };
}
