//! Report rendering
//!
//! Text for humans, JSON for pipelines. Both render the same
//! [`ReduceReport`]; the text form optionally appends the per-worker table.

use crate::config::OutputFormat;
use crate::stats::ReduceReport;
use anyhow::Context;
use std::fmt::Write;

/// Render a report in the requested format.
pub fn render(
    report: &ReduceReport,
    format: OutputFormat,
    per_worker: bool,
) -> crate::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, per_worker)),
        OutputFormat::Json => render_json(report),
    }
}

/// Human-readable summary with an optional per-worker table.
pub fn render_text(report: &ReduceReport, per_worker: bool) -> String {
    let mut out = String::new();

    writeln!(out, "Sum:        {}", report.sum).unwrap();
    writeln!(
        out,
        "Matrix:     {} rows x {} cols ({} elements)",
        report.rows,
        report.cols,
        report.rows * report.cols
    )
    .unwrap();
    writeln!(out, "Workers:    {}", report.worker_count).unwrap();
    writeln!(out, "Elapsed:    {} us", report.elapsed_us).unwrap();
    writeln!(
        out,
        "Throughput: {:.2} Melem/s",
        report.throughput_elements_per_sec() / 1_000_000.0
    )
    .unwrap();

    if per_worker && !report.workers.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "{:>8} {:>10} {:>10} {:>12} {:>10}", "worker", "start", "rows", "elements", "time_us").unwrap();
        for w in &report.workers {
            writeln!(
                out,
                "{:>8} {:>10} {:>10} {:>12} {:>10}",
                w.partition_index, w.start_row, w.row_count, w.elements, w.elapsed_us
            )
            .unwrap();
        }
    }

    out
}

/// Machine-readable JSON report.
pub fn render_json(report: &ReduceReport) -> crate::Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
}
