//! Linear models for covariate correction.

pub mod residuals;

pub use residuals::{design_matrix, residuals, residuals_with, ResidualOptions};
