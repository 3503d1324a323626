//! Error taxonomy for the reduction engine
//!
//! Worker faults are captured per partition and carried to the join barrier;
//! the coordinator surfaces one top-level error to the caller instead of
//! leaking a partial sum. Application-level plumbing (file loading, config
//! handling) uses `anyhow` instead; these types cover the engine seams only.

use thiserror::Error;

/// Top-level error returned by the engine entry points.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// Rejected before any worker was dispatched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The reduction ran but could not complete cleanly.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Engine-level failure surfaced when the join barrier cannot produce a sum.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// At least one partition fault was recorded once all workers were observed.
    #[error("{}/{total} partition(s) failed: {}", .faults.len(), summarize(.faults))]
    PartitionsFailed {
        /// Faults in ascending partition-index order.
        faults: Vec<PartitionFault>,
        /// Number of partitions dispatched.
        total: usize,
    },

    /// The calling context was cancelled while waiting at the join barrier.
    ///
    /// Outstanding workers may still be running; their results are discarded.
    #[error("reduction interrupted while waiting for workers")]
    Interrupted,
}

/// A single worker's failure, recorded per partition.
///
/// Faults never escape the failing worker's own thread; they travel back to
/// the coordinator as values and fail the whole reduction there.
#[derive(Debug, Error)]
#[error("partition {partition_index}: {cause}")]
pub struct PartitionFault {
    /// Index of the partition whose worker failed.
    pub partition_index: usize,
    /// What went wrong inside the worker.
    #[source]
    pub cause: FaultCause,
}

/// Underlying cause of a partition fault.
#[derive(Debug, Error)]
pub enum FaultCause {
    /// The partition range does not fit the matrix it was run against.
    #[error("rows {start}..{end} out of range for matrix with {rows} rows")]
    RowsOutOfRange {
        start: usize,
        end: usize,
        rows: usize,
    },

    /// The worker's computation panicked; the panic was caught at the
    /// thread boundary and converted into a fault.
    #[error("worker panicked: {0}")]
    Panicked(String),

    /// The worker thread exited without reporting a result or a fault.
    #[error("worker exited without reporting")]
    NoReport,
}

fn summarize(faults: &[PartitionFault]) -> String {
    faults
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
