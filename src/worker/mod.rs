//! Worker: stateless execution unit for one partition
//!
//! Each worker owns a reference-counted read view of the matrix and one
//! partition. It sums every element of its rows in row-major, left-to-right
//! order and reports exactly one [`PartialResult`] or one
//! [`PartitionFault`](crate::error::PartitionFault). Workers never mutate the
//! matrix and never talk to each other; all communication goes back to the
//! coordinator as the returned value.
//!
//! Floating-point note: different partitionings change accumulation order, so
//! results for different worker counts agree only within rounding tolerance.
//! Tests compare against a sequential sum with a relative epsilon, not bitwise.

use crate::error::{FaultCause, PartitionFault};
use crate::matrix::Matrix;
use crate::partition::Partition;
use crate::stats::WorkerStats;
use std::sync::Arc;
use std::time::Instant;

/// The scalar one worker produced for its partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialResult {
    /// Index of the partition this value covers.
    pub partition_index: usize,
    /// Sum of every element in the partition's rows.
    pub value: f64,
    /// Execution metrics for this worker.
    pub stats: WorkerStats,
}

/// One unit of execution, bound to a single partition at dispatch time.
#[derive(Debug)]
pub struct Worker {
    id: usize,
    matrix: Arc<Matrix>,
    partition: Partition,
}

impl Worker {
    /// Bind a worker to a partition of the shared matrix.
    ///
    /// `id` doubles as the partition index; the coordinator dispatches exactly
    /// one worker per partition.
    pub fn new(id: usize, matrix: Arc<Matrix>, partition: Partition) -> Self {
        Self {
            id,
            matrix,
            partition,
        }
    }

    /// Worker/partition index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Sum the partition and report the partial result.
    ///
    /// Bounds are verified up front: a partition that does not fit the matrix
    /// yields a fault carrying this worker's partition index rather than a
    /// silent partial value. An empty partition completes normally with 0.
    pub fn run(self) -> Result<PartialResult, PartitionFault> {
        let started = Instant::now();

        let start = self.partition.start_row;
        // checked_add: a wrapped range in a release build would pass the
        // bounds test and silently sum nothing instead of faulting.
        let end = match start.checked_add(self.partition.row_count) {
            Some(end) if end <= self.matrix.rows() => end,
            _ => {
                return Err(self.fault(FaultCause::RowsOutOfRange {
                    start,
                    end: start.saturating_add(self.partition.row_count),
                    rows: self.matrix.rows(),
                }))
            }
        };

        let mut value = 0.0;
        let mut elements = 0;
        for row_index in start..end {
            // Unreachable after the bounds check, but row access stays checked
            // so a bad index can never read another partition's data.
            let row = self
                .matrix
                .row(row_index)
                .ok_or_else(|| self.fault_at(row_index))?;
            for &cell in row {
                value += cell;
            }
            elements += row.len();
        }

        Ok(PartialResult {
            partition_index: self.id,
            value,
            stats: WorkerStats {
                partition_index: self.id,
                start_row: start,
                row_count: self.partition.row_count,
                elements,
                elapsed_us: started.elapsed().as_micros() as u64,
            },
        })
    }

    fn fault(&self, cause: FaultCause) -> PartitionFault {
        PartitionFault {
            partition_index: self.id,
            cause,
        }
    }

    fn fault_at(&self, row: usize) -> PartitionFault {
        self.fault(FaultCause::RowsOutOfRange {
            start: row,
            end: row + 1,
            rows: self.matrix.rows(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> Arc<Matrix> {
        Arc::new(
            Matrix::from_rows(vec![
                vec![1.0, 2.0],
                vec![3.0, 4.0],
                vec![5.0, 6.0],
                vec![7.0, 8.0],
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_worker_sums_its_partition() {
        let matrix = sample_matrix();
        let worker = Worker::new(
            1,
            matrix,
            Partition {
                start_row: 1,
                row_count: 2,
            },
        );

        let result = worker.run().unwrap();
        assert_eq!(result.partition_index, 1);
        assert_eq!(result.value, 18.0); // 3+4+5+6
        assert_eq!(result.stats.row_count, 2);
        assert_eq!(result.stats.elements, 4);
    }

    #[test]
    fn test_worker_whole_matrix() {
        let matrix = sample_matrix();
        let worker = Worker::new(
            0,
            matrix,
            Partition {
                start_row: 0,
                row_count: 4,
            },
        );
        assert_eq!(worker.run().unwrap().value, 36.0);
    }

    #[test]
    fn test_empty_partition_sums_to_zero() {
        let matrix = sample_matrix();
        let worker = Worker::new(
            3,
            matrix,
            Partition {
                start_row: 4,
                row_count: 0,
            },
        );

        let result = worker.run().unwrap();
        assert_eq!(result.value, 0.0);
        assert_eq!(result.stats.elements, 0);
    }

    #[test]
    fn test_out_of_range_partition_faults_with_index() {
        let matrix = sample_matrix();
        let worker = Worker::new(
            2,
            matrix,
            Partition {
                start_row: 2,
                row_count: 10,
            },
        );

        let fault = worker.run().unwrap_err();
        assert_eq!(fault.partition_index, 2);
        assert!(matches!(
            fault.cause,
            FaultCause::RowsOutOfRange {
                start: 2,
                end: 12,
                rows: 4
            }
        ));
    }

    #[test]
    fn test_overflowing_partition_faults_instead_of_wrapping() {
        // start_row + row_count wraps past usize::MAX; the worker must fault,
        // not pass the bounds test with a wrapped end and return Ok(0).
        let matrix = sample_matrix();
        let worker = Worker::new(
            1,
            matrix,
            Partition {
                start_row: usize::MAX,
                row_count: 2,
            },
        );

        let fault = worker.run().unwrap_err();
        assert_eq!(fault.partition_index, 1);
        assert!(matches!(
            fault.cause,
            FaultCause::RowsOutOfRange {
                start: usize::MAX,
                end: usize::MAX,
                rows: 4
            }
        ));
    }

    #[test]
    fn test_worker_does_not_touch_other_rows() {
        // Negative values outside the partition must not leak into the sum.
        let matrix = Arc::new(
            Matrix::from_rows(vec![vec![-100.0], vec![1.0], vec![2.0], vec![-100.0]]).unwrap(),
        );
        let worker = Worker::new(
            0,
            matrix,
            Partition {
                start_row: 1,
                row_count: 2,
            },
        );
        assert_eq!(worker.run().unwrap().value, 3.0);
    }
}
