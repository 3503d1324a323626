//! CLI argument parsing using clap

use super::{Config, InputSource, OutputFormat, WorkerConfig};
use clap::Parser;
use std::path::PathBuf;

/// gridsum - partitioned parallel matrix reduction
#[derive(Parser, Debug)]
#[command(name = "gridsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Matrix file (JSON array of arrays)
    #[arg(value_name = "MATRIX", conflicts_with = "rows")]
    pub matrix: Option<PathBuf>,

    /// Number of worker threads (0 = one per CPU core)
    #[arg(short = 't', long, env = "GRIDSUM_WORKERS")]
    pub workers: Option<usize>,

    /// Generate a synthetic matrix with this many rows instead of reading a file
    #[arg(long, requires = "cols")]
    pub rows: Option<usize>,

    /// Columns for the synthetic matrix
    #[arg(long, requires = "rows")]
    pub cols: Option<usize>,

    /// RNG seed for the synthetic matrix
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show per-worker statistics in text output
    #[arg(long)]
    pub per_worker: bool,

    /// Load configuration from a TOML file (CLI flags override it)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Validate the configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse CLI arguments from the process environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build the effective configuration: config file first, flags on top.
    pub fn to_config(&self) -> crate::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_toml(path)?,
            None => Config {
                input: self.input_source()?,
                workers: WorkerConfig::default(),
                output: Default::default(),
            },
        };

        // Flags win over the config file.
        if self.matrix.is_some() || self.rows.is_some() {
            config.input = self.input_source()?;
        }
        if let Some(workers) = self.workers {
            config.workers.count = if workers == 0 {
                num_cpus::get()
            } else {
                workers
            };
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.per_worker {
            config.output.per_worker = true;
        }

        Ok(config)
    }

    fn input_source(&self) -> crate::Result<InputSource> {
        if let Some(path) = &self.matrix {
            return Ok(InputSource::File { path: path.clone() });
        }
        if let (Some(rows), Some(cols)) = (self.rows, self.cols) {
            return Ok(InputSource::Generate {
                rows,
                cols,
                seed: self.seed,
            });
        }
        anyhow::bail!("No input: provide a matrix file, --rows/--cols, or --config")
    }
}
