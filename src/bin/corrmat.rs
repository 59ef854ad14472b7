//! corrmat - structural correlation matrix CLI
//!
//! Builds covariate-corrected correlation matrices from a CSV of regional
//! measures and writes them as tab-delimited text.

use clap::{Parser, Subcommand, ValueEnum};
use regional_corrmat::corr::CorrMethod;
use regional_corrmat::error::Result;
use regional_corrmat::pipeline::{GroupConfig, RunConfig, RunSummary};
use std::path::PathBuf;

/// CLI-friendly correlation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMethod {
    /// Pearson product-moment correlation
    Pearson,
    /// Spearman rank correlation
    Spearman,
    /// Kendall tau-b
    Kendall,
}

impl From<CliMethod> for CorrMethod {
    fn from(method: CliMethod) -> Self {
        match method {
            CliMethod::Pearson => CorrMethod::Pearson,
            CliMethod::Spearman => CorrMethod::Spearman,
            CliMethod::Kendall => CorrMethod::Kendall,
        }
    }
}

/// Structural correlation matrices from regional measures
#[derive(Parser)]
#[command(name = "corrmat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a correlation matrix from a regional measures CSV
    Build {
        /// CSV with one row per participant; column labels are region or covariate names
        regional_measures: PathBuf,

        /// Region names to include, one per line
        names_file: PathBuf,

        /// Output matrix file (missing directories are created)
        output: PathBuf,

        /// Covariates to regress out of each region, one per line
        #[arg(long)]
        covars_file: Option<PathBuf>,

        /// Correlation method
        #[arg(short, long, value_enum, default_value = "pearson")]
        method: CliMethod,

        /// Names are in NSPN 308 parcellation style (41 leading subcortical regions)
        #[arg(long)]
        names_308_style: bool,

        /// Add an intercept column to the covariate design
        #[arg(long)]
        append_intercept: bool,

        /// Write one matrix per value of this column
        #[arg(short, long)]
        group_var: Option<String>,

        /// Shuffle group labels across participants before splitting
        #[arg(long, requires = "group_var")]
        shuffle: bool,

        /// Random seed for --shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Write a JSON manifest (axis names, outputs) to this path
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Run from a YAML configuration file
    Run {
        /// Path to run configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Write a JSON manifest (axis names, outputs) to this path
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Write an example YAML configuration
    Example {
        /// Output path for the YAML file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            regional_measures,
            names_file,
            output,
            covars_file,
            method,
            names_308_style,
            append_intercept,
            group_var,
            shuffle,
            seed,
            manifest,
        } => {
            let config = RunConfig {
                regional_measures,
                names_file,
                covars_file,
                output,
                method: method.into(),
                names_308_style,
                append_intercept,
                group: group_var.map(|variable| GroupConfig {
                    variable,
                    shuffle,
                    seed,
                }),
            };
            cmd_run(&config, manifest.as_ref())
        }

        Commands::Run { config, manifest } => cmd_run_config(&config, manifest.as_ref()),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run from a configuration file
fn cmd_run_config(config_path: &PathBuf, manifest: Option<&PathBuf>) -> Result<()> {
    eprintln!("Loading run configuration from {:?}...", config_path);
    let config = RunConfig::from_file(config_path)?;
    cmd_run(&config, manifest)
}

/// Load inputs, build the matrices and write them
fn cmd_run(config: &RunConfig, manifest: Option<&PathBuf>) -> Result<()> {
    eprintln!("Loading data...");
    let inputs = config.load_inputs()?;

    eprintln!(
        "Loaded {} participants x {} columns",
        inputs.dataset.n_rows(),
        inputs.dataset.n_columns()
    );
    eprintln!("  Regions: {}", inputs.names.len());
    if inputs.covariates.is_empty() {
        eprintln!("  Covariates: none");
    } else {
        eprintln!("  Covariates: {}", inputs.covariates.join(", "));
    }
    eprintln!("  Method: {}", config.method);
    if let Some(group) = &config.group {
        eprintln!(
            "  Groups: {}{}",
            group.variable,
            if group.shuffle { " (shuffled)" } else { "" }
        );
    }

    let summary = config.run_with(&inputs)?;
    report(&summary);

    if let Some(path) = manifest {
        summary.write_json(path)?;
        eprintln!("Wrote manifest to {:?}", path);
    }

    Ok(())
}

fn report(summary: &RunSummary) {
    for output in &summary.outputs {
        let label = output.group.as_deref().unwrap_or("all participants");
        eprintln!(
            "Wrote {} ({} participants) to {:?}",
            label, output.n_participants, output.path
        );
        if !output.degenerate_regions.is_empty() {
            log::warn!(
                "{}: {} regions with zero variance: {}",
                label,
                output.degenerate_regions.len(),
                output.degenerate_regions.join(", ")
            );
        }
    }
    eprintln!("Done! {} matrices written", summary.outputs.len());
}

fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let yaml = RunConfig::example().to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example configuration to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}
