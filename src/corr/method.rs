//! Correlation method selection.

use crate::error::CorrmatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pairwise correlation coefficient to compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrMethod {
    /// Pearson product-moment correlation.
    #[default]
    Pearson,
    /// Spearman rank correlation (average ranks for ties).
    Spearman,
    /// Kendall tau-b.
    Kendall,
}

impl CorrMethod {
    /// Identifier used in configuration and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            CorrMethod::Pearson => "pearson",
            CorrMethod::Spearman => "spearman",
            CorrMethod::Kendall => "kendall",
        }
    }
}

impl fmt::Display for CorrMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrMethod {
    type Err = CorrmatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(CorrMethod::Pearson),
            "spearman" => Ok(CorrMethod::Spearman),
            "kendall" => Ok(CorrMethod::Kendall),
            other => Err(CorrmatError::InvalidParameter(format!(
                "Unknown correlation method '{}'. Available: pearson, spearman, kendall",
                other
            ))),
        }
    }
}
