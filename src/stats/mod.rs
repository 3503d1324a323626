//! Per-worker metrics and aggregation
//!
//! Each worker records how much it summed and how long it took; the
//! coordinator merges those into a [`ReduceReport`] that keeps the per-worker
//! detail alongside the aggregate view.

use serde::Serialize;
use std::time::Duration;

/// Metrics recorded by one worker for its partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    /// Index of the partition this worker ran.
    pub partition_index: usize,
    /// First row of the partition.
    pub start_row: usize,
    /// Rows summed.
    pub row_count: usize,
    /// Elements summed (`row_count * cols`).
    pub elements: usize,
    /// Wall time spent summing, in microseconds.
    pub elapsed_us: u64,
}

/// Merges per-worker statistics into aggregate totals while preserving the
/// individual entries for per-worker output.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    workers: Vec<WorkerStats>,
}

impl StatsAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one worker's statistics.
    pub fn add_worker(&mut self, stats: WorkerStats) {
        self.workers.push(stats);
    }

    /// Number of workers recorded.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Total rows summed across all workers.
    pub fn total_rows(&self) -> usize {
        self.workers.iter().map(|w| w.row_count).sum()
    }

    /// Total elements summed across all workers.
    pub fn total_elements(&self) -> usize {
        self.workers.iter().map(|w| w.elements).sum()
    }

    /// Slowest worker time in microseconds, or 0 with no workers.
    pub fn max_elapsed_us(&self) -> u64 {
        self.workers.iter().map(|w| w.elapsed_us).max().unwrap_or(0)
    }

    /// Fastest worker time in microseconds, or 0 with no workers.
    pub fn min_elapsed_us(&self) -> u64 {
        self.workers.iter().map(|w| w.elapsed_us).min().unwrap_or(0)
    }

    /// Mean worker time in microseconds, or 0.0 with no workers.
    pub fn mean_elapsed_us(&self) -> f64 {
        if self.workers.is_empty() {
            return 0.0;
        }
        let total: u64 = self.workers.iter().map(|w| w.elapsed_us).sum();
        total as f64 / self.workers.len() as f64
    }

    /// Consume the aggregator, returning entries in ascending partition order.
    pub fn into_sorted(mut self) -> Vec<WorkerStats> {
        self.workers.sort_by_key(|w| w.partition_index);
        self.workers
    }
}

/// Final outcome of one reduction call.
#[derive(Debug, Clone, Serialize)]
pub struct ReduceReport {
    /// The reduced scalar.
    pub sum: f64,
    /// Input shape.
    pub rows: usize,
    pub cols: usize,
    /// Workers dispatched (equals partitions planned).
    pub worker_count: usize,
    /// End-to-end wall time including dispatch and join, in microseconds.
    pub elapsed_us: u64,
    /// Per-worker detail in ascending partition order.
    pub workers: Vec<WorkerStats>,
}

impl ReduceReport {
    /// Elements summed per second of wall time, or 0.0 for an instant run.
    pub fn throughput_elements_per_sec(&self) -> f64 {
        if self.elapsed_us == 0 {
            return 0.0;
        }
        let elements: usize = self.workers.iter().map(|w| w.elements).sum();
        elements as f64 / Duration::from_micros(self.elapsed_us).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(partition_index: usize, row_count: usize, elapsed_us: u64) -> WorkerStats {
        WorkerStats {
            partition_index,
            start_row: partition_index * row_count,
            row_count,
            elements: row_count * 4,
            elapsed_us,
        }
    }

    #[test]
    fn test_aggregator_empty() {
        let aggregator = StatsAggregator::new();
        assert_eq!(aggregator.num_workers(), 0);
        assert_eq!(aggregator.total_rows(), 0);
        assert_eq!(aggregator.max_elapsed_us(), 0);
        assert_eq!(aggregator.mean_elapsed_us(), 0.0);
    }

    #[test]
    fn test_aggregator_totals() {
        let mut aggregator = StatsAggregator::new();
        aggregator.add_worker(stats(0, 3, 100));
        aggregator.add_worker(stats(1, 3, 300));
        aggregator.add_worker(stats(2, 2, 200));

        assert_eq!(aggregator.num_workers(), 3);
        assert_eq!(aggregator.total_rows(), 8);
        assert_eq!(aggregator.total_elements(), 32);
        assert_eq!(aggregator.min_elapsed_us(), 100);
        assert_eq!(aggregator.max_elapsed_us(), 300);
        assert_eq!(aggregator.mean_elapsed_us(), 200.0);
    }

    #[test]
    fn test_into_sorted_orders_by_partition() {
        let mut aggregator = StatsAggregator::new();
        aggregator.add_worker(stats(2, 1, 10));
        aggregator.add_worker(stats(0, 1, 10));
        aggregator.add_worker(stats(1, 1, 10));

        let sorted = aggregator.into_sorted();
        let order: Vec<usize> = sorted.iter().map(|w| w.partition_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_report_throughput() {
        let report = ReduceReport {
            sum: 1.0,
            rows: 2,
            cols: 4,
            worker_count: 2,
            elapsed_us: 1_000_000,
            workers: vec![stats(0, 1, 10), stats(1, 1, 10)],
        };
        assert_eq!(report.throughput_elements_per_sec(), 8.0);

        let instant = ReduceReport {
            elapsed_us: 0,
            ..report
        };
        assert_eq!(instant.throughput_elements_per_sec(), 0.0);
    }
}
