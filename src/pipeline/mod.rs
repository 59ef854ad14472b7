//! End-to-end runs: load, correct, correlate, write.

mod config;
mod runner;

pub use config::{group_output_path, GroupConfig, OutputRecord, RunConfig, RunInputs, RunSummary};
pub use runner::{corrmat_from_regional_measures, corrmat_with_options, group_corrmats, GroupMatrix};
