//! Error types for the regional-corrmat library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum CorrmatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more requested columns hold non-numeric values.
    #[error("DataFrame columns {} are non numeric", .0.join(", "))]
    NonNumeric(Vec<String>),

    /// One or more requested columns are absent from the dataset.
    #[error("Columns {} not found in dataset", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Dimension mismatch for column '{column}': expected {expected} rows, got {actual}")]
    DimensionMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, CorrmatError>;
