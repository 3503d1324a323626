//! Configuration for the gridsum binary
//!
//! A [`Config`] can come from CLI flags, a TOML file, or a TOML file with CLI
//! overrides on top (flags win). The library engine itself only needs a worker
//! count; everything else here is input/output wiring for the binary.

pub mod cli;
pub mod validator;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the matrix comes from.
    pub input: InputSource,

    /// Worker dispatch settings.
    #[serde(default)]
    pub workers: WorkerConfig,

    /// Output rendering settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load a configuration from a TOML file.
    pub fn load_toml(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config TOML in {}", path.display()))
    }
}

/// Where the input matrix comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// JSON array-of-arrays on disk.
    File { path: PathBuf },
    /// Deterministic synthetic matrix (uniform values, seeded RNG).
    Generate { rows: usize, cols: usize, seed: u64 },
}

/// Worker dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Worker threads to dispatch; one partition each.
    #[serde(default = "default_worker_count")]
    pub count: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: default_worker_count(),
        }
    }
}

/// One worker per logical CPU by default.
fn default_worker_count() -> usize {
    num_cpus::get()
}

/// Output rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the per-worker table in text output.
    #[serde(default)]
    pub per_worker: bool,
}

/// Report format for the binary.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Machine-readable JSON report.
    Json,
}
