//! Run configuration (YAML) and run summaries (JSON).

use super::runner::{corrmat_with_options, group_corrmats};
use crate::corr::{CorrMethod, CorrelationMatrix};
use crate::data::{apply_308_style, read_names, Dataset};
use crate::error::{CorrmatError, Result};
use crate::model::residuals::ResidualOptions;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Column-name suffix removed from the regional measures table in NSPN 308 style.
const NSPN_308_MEASURE_SUFFIX: &str = "_thickness";

/// Optional per-group output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Categorical column to split participants on.
    pub variable: String,
    /// Permute the group labels before splitting (null model).
    #[serde(default)]
    pub shuffle: bool,
    /// Seed for the permutation; drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Everything needed for one correlation matrix run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// CSV of regional measures, one row per participant.
    pub regional_measures: PathBuf,
    /// Region names, one per line.
    pub names_file: PathBuf,
    /// Covariate names, one per line.
    #[serde(default)]
    pub covars_file: Option<PathBuf>,
    /// Output matrix path.
    pub output: PathBuf,
    #[serde(default)]
    pub method: CorrMethod,
    /// Names file follows the NSPN 308 parcellation layout.
    #[serde(default)]
    pub names_308_style: bool,
    #[serde(default)]
    pub append_intercept: bool,
    #[serde(default)]
    pub group: Option<GroupConfig>,
}

/// Loaded inputs of a run.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub dataset: Dataset,
    pub names: Vec<String>,
    pub covariates: Vec<String>,
}

/// One written matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Group key, or `None` for the whole sample.
    pub group: Option<String>,
    pub path: PathBuf,
    pub n_participants: usize,
    /// Regions whose correlations were undefined (zero variance).
    pub degenerate_regions: Vec<String>,
}

/// What a run produced. Matrix files carry no labels, so this records the
/// axis order alongside the written paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub method: CorrMethod,
    pub regions: Vec<String>,
    pub covariates: Vec<String>,
    pub outputs: Vec<OutputRecord>,
}

impl RunSummary {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(CorrmatError::from)
    }

    /// Write the JSON manifest to `path`, creating parent directories.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl RunConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(CorrmatError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(CorrmatError::from)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// A filled-in example configuration.
    pub fn example() -> Self {
        Self {
            regional_measures: PathBuf::from("data/PARC_500aparc_thickness_behavmerge.csv"),
            names_file: PathBuf::from("data/500.names.txt"),
            covars_file: Some(PathBuf::from("data/covars.txt")),
            output: PathBuf::from("results/corrmat_thickness.txt"),
            method: CorrMethod::Pearson,
            names_308_style: false,
            append_intercept: false,
            group: Some(GroupConfig {
                variable: "centre".to_string(),
                shuffle: false,
                seed: Some(42),
            }),
        }
    }

    /// Read the table and name lists this configuration points at.
    pub fn load_inputs(&self) -> Result<RunInputs> {
        let mut dataset = Dataset::from_csv(&self.regional_measures)?;
        let mut names = read_names(&self.names_file)?;
        let covariates = match &self.covars_file {
            Some(path) => read_names(path)?,
            None => Vec::new(),
        };

        if self.names_308_style {
            names = apply_308_style(names);
            dataset = dataset.strip_column_suffix(NSPN_308_MEASURE_SUFFIX)?;
        }

        if names.is_empty() {
            return Err(CorrmatError::EmptyData(format!(
                "No region names in {:?}",
                self.names_file
            )));
        }

        Ok(RunInputs {
            dataset,
            names,
            covariates,
        })
    }

    /// Load inputs, compute the matrix (or one per group) and write it.
    pub fn run(&self) -> Result<RunSummary> {
        let inputs = self.load_inputs()?;
        self.run_with(&inputs)
    }

    /// Compute and write matrices from already loaded inputs.
    pub fn run_with(&self, inputs: &RunInputs) -> Result<RunSummary> {
        let options = ResidualOptions {
            append_intercept: self.append_intercept,
        };
        let mut outputs = Vec::new();

        match &self.group {
            None => {
                let matrix = corrmat_with_options(
                    &inputs.dataset,
                    &inputs.names,
                    &inputs.covariates,
                    self.method,
                    &options,
                )?;
                matrix.save(&self.output)?;
                outputs.push(record(None, &self.output, inputs.dataset.n_rows(), &matrix));
            }
            Some(group) => {
                let mut rng = match group.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let shuffle: Option<&mut dyn RngCore> = if group.shuffle {
                    Some(&mut rng)
                } else {
                    None
                };

                let matrices = group_corrmats(
                    &inputs.dataset,
                    &inputs.names,
                    &inputs.covariates,
                    self.method,
                    &options,
                    &group.variable,
                    shuffle,
                )?;
                for (key, group_matrix) in matrices {
                    let path = group_output_path(&self.output, &key);
                    group_matrix.matrix.save(&path)?;
                    outputs.push(record(
                        Some(key),
                        &path,
                        group_matrix.n_participants,
                        &group_matrix.matrix,
                    ));
                }
            }
        }

        Ok(RunSummary {
            method: self.method,
            regions: inputs.names.clone(),
            covariates: inputs.covariates.clone(),
            outputs,
        })
    }
}

/// `results/corrmat.txt` + `centre_ucl` -> `results/corrmat_centre_ucl.txt`.
pub fn group_output_path(output: &Path, group_key: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match output.extension() {
        Some(ext) => format!("{}_{}.{}", stem, group_key, ext.to_string_lossy()),
        None => format!("{}_{}", stem, group_key),
    };
    output.with_file_name(file_name)
}

fn record(
    group: Option<String>,
    path: &Path,
    n_participants: usize,
    matrix: &CorrelationMatrix,
) -> OutputRecord {
    OutputRecord {
        group,
        path: path.to_path_buf(),
        n_participants,
        degenerate_regions: matrix
            .degenerate_regions()
            .into_iter()
            .map(String::from)
            .collect(),
    }
}
