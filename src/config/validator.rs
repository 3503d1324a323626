//! Configuration validation

use super::*;
use anyhow::Result;

/// Hard cap on worker threads. Thread-per-partition dispatch past this point
/// exhausts OS resources long before it buys any parallelism.
pub const MAX_WORKERS: usize = 4096;

/// Hard cap on synthetic matrix size (elements).
pub const MAX_GENERATED_ELEMENTS: usize = 500_000_000;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_workers(&config.workers)?;
    validate_input(&config.input)?;
    Ok(())
}

/// Validate worker configuration
pub fn validate_workers(workers: &WorkerConfig) -> Result<()> {
    if workers.count < 1 {
        anyhow::bail!("worker count must be at least 1, got {}", workers.count);
    }
    if workers.count > MAX_WORKERS {
        anyhow::bail!(
            "worker count must be at most {}, got {}",
            MAX_WORKERS,
            workers.count
        );
    }
    Ok(())
}

/// Validate input configuration
pub fn validate_input(input: &InputSource) -> Result<()> {
    match input {
        InputSource::File { path } => {
            if path.as_os_str().is_empty() {
                anyhow::bail!("matrix file path is empty");
            }
        }
        InputSource::Generate { rows, cols, .. } => {
            let elements = rows
                .checked_mul(*cols)
                .ok_or_else(|| anyhow::anyhow!("generated matrix size overflows"))?;
            if elements > MAX_GENERATED_ELEMENTS {
                anyhow::bail!(
                    "generated matrix has {} elements, maximum is {}",
                    elements,
                    MAX_GENERATED_ELEMENTS
                );
            }
        }
    }
    Ok(())
}
