//! Correlation matrix construction.

pub mod coefficient;
mod matrix;
mod method;

pub use coefficient::correlation;
pub use matrix::{build_corrmat, CorrelationMatrix};
pub use method::CorrMethod;
