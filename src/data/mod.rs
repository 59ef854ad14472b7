//! Data structures and loaders for regional measures.

mod dataset;
pub mod names;
pub mod validate;

pub use dataset::{Column, ColumnType, Dataset};
pub use names::{apply_308_style, read_names};
pub use validate::{missing_columns, non_numeric_columns, require_numeric};
