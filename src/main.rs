//! gridsum CLI entry point

use anyhow::{Context, Result};
use gridsum::config::{cli::Cli, validator, InputSource};
use gridsum::coordinator::Coordinator;
use gridsum::matrix::Matrix;
use gridsum::output;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = cli.to_config()?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    if cli.dry_run {
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let matrix = load_matrix(&config.input)?;

    let coordinator = Coordinator::new(config.workers.count)?;
    let report = coordinator
        .run(Arc::new(matrix))
        .context("Reduction failed")?;

    let rendered = output::render(&report, config.output.format, config.output.per_worker)?;
    println!("{}", rendered.trim_end());

    Ok(())
}

fn load_matrix(input: &InputSource) -> Result<Matrix> {
    match input {
        InputSource::File { path } => Matrix::load_json(path),
        InputSource::Generate { rows, cols, seed } => Ok(Matrix::random(*rows, *cols, *seed)),
    }
}
