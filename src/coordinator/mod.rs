//! Coordinator: dispatch, join barrier, and aggregation
//!
//! The coordinator owns the partition plan for one reduction call. It spawns
//! every worker before consuming any result (true parallel dispatch), then
//! blocks at a full join barrier until each dispatched worker has reported a
//! partial result or a fault. Only after all workers are observed does it
//! decide the outcome: any recorded fault fails the whole call, otherwise the
//! partials are combined in ascending partition order so repeated runs with
//! the same worker count accumulate in the same order.
//!
//! Cancellation is cooperative: while waiting at the barrier the coordinator
//! polls a shared [`CancelFlag`] between receive attempts. On cancellation it
//! stops waiting and returns promptly; outstanding workers keep running
//! detached and their late results are dropped with the channel.

use crate::error::{AggregationError, FaultCause, PartitionFault, ReduceError};
use crate::matrix::Matrix;
use crate::partition::{self, Partition};
use crate::stats::{ReduceReport, StatsAggregator};
use crate::worker::{PartialResult, Worker};
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How often the join barrier checks for cancellation while waiting.
///
/// Bounds how long a cancelled caller can stay blocked.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Cooperative cancellation flag shared between a caller and the engine.
///
/// Clones observe the same flag. Cancelling is idempotent and never blocks.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A fresh, uncancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to anyone holding a clone of this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Orchestrates one reduction: partition, dispatch, join, aggregate.
///
/// All state is per-call; a coordinator can run any number of matrices with
/// the same worker count.
#[derive(Debug)]
pub struct Coordinator {
    worker_count: usize,
}

impl Coordinator {
    /// Create a coordinator for `worker_count` workers.
    ///
    /// Fails with [`ReduceError::InvalidConfiguration`] for a zero worker
    /// count; nothing is dispatched in that case.
    pub fn new(worker_count: usize) -> Result<Self, ReduceError> {
        if worker_count < 1 {
            return Err(ReduceError::InvalidConfiguration(format!(
                "worker count must be at least 1, got {worker_count}"
            )));
        }
        Ok(Self { worker_count })
    }

    /// Number of workers this coordinator dispatches per call.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Reduce the matrix with no external cancellation.
    pub fn run(&self, matrix: Arc<Matrix>) -> Result<ReduceReport, ReduceError> {
        self.run_with_cancel(matrix, &CancelFlag::new())
    }

    /// Reduce the matrix, honoring an external cancellation flag.
    ///
    /// Blocks until every dispatched worker has reported or the flag is set.
    /// On cancellation the call returns [`AggregationError::Interrupted`]
    /// within a bounded delay rather than a partial sum.
    pub fn run_with_cancel(
        &self,
        matrix: Arc<Matrix>,
        cancel: &CancelFlag,
    ) -> Result<ReduceReport, ReduceError> {
        let started = Instant::now();
        let partitions = partition::plan(matrix.rows(), self.worker_count);
        let partials = dispatch(&matrix, &partitions, cancel)?;

        // Deterministic accumulation: partials combine in partition order.
        let mut aggregator = StatsAggregator::new();
        let mut sum = 0.0;
        let mut ordered = partials;
        ordered.sort_by_key(|p| p.partition_index);
        for partial in ordered {
            sum += partial.value;
            aggregator.add_worker(partial.stats);
        }

        Ok(ReduceReport {
            sum,
            rows: matrix.rows(),
            cols: matrix.cols(),
            worker_count: partitions.len(),
            elapsed_us: started.elapsed().as_micros() as u64,
            workers: aggregator.into_sorted(),
        })
    }
}

/// One-call entry point: partitioned parallel sum of the whole matrix.
///
/// Equivalent to building a [`Coordinator`] and taking the report's sum.
pub fn reduce_sum(matrix: Arc<Matrix>, worker_count: usize) -> Result<f64, ReduceError> {
    Ok(Coordinator::new(worker_count)?.run(matrix)?.sum)
}

/// Spawn one worker per partition, then hold the full join barrier.
///
/// Every worker is spawned before any result is consumed. The barrier waits
/// for all of them even after a fault is recorded, so no thread is leaked on
/// the failure path; only cancellation leaves workers running detached.
fn dispatch(
    matrix: &Arc<Matrix>,
    partitions: &[Partition],
    cancel: &CancelFlag,
) -> Result<Vec<PartialResult>, AggregationError> {
    let matrix = Arc::clone(matrix);
    dispatch_with(partitions, cancel, move |index, part| {
        Worker::new(index, Arc::clone(&matrix), part).run()
    })
}

/// Dispatch with an explicit worker body. `dispatch` binds it to
/// [`Worker::run`]; tests substitute bodies that fail in controlled ways.
fn dispatch_with<F>(
    partitions: &[Partition],
    cancel: &CancelFlag,
    run: F,
) -> Result<Vec<PartialResult>, AggregationError>
where
    F: Fn(usize, Partition) -> Result<PartialResult, PartitionFault> + Send + Sync + 'static,
{
    let expected = partitions.len();
    let (tx, rx) = unbounded();
    let mut handles = Vec::with_capacity(expected);
    let run = Arc::new(run);

    for (index, &part) in partitions.iter().enumerate() {
        let tx = tx.clone();
        let run = Arc::clone(&run);
        handles.push(thread::spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| run(index, part))).unwrap_or_else(|payload| {
                Err(PartitionFault {
                    partition_index: index,
                    cause: FaultCause::Panicked(panic_message(payload.as_ref())),
                })
            });
            // Send fails only if the coordinator was cancelled and dropped the
            // receiver; the late result is discarded as specified.
            let _ = tx.send(outcome);
        }));
    }
    drop(tx);

    let outcomes = match join_partials(&rx, expected, cancel) {
        Ok(outcomes) => outcomes,
        Err(interrupted) => {
            // Workers are not forcibly stopped; they finish in the background
            // and their sends hit a closed channel.
            return Err(interrupted);
        }
    };

    // All workers have reported, so these joins return immediately.
    for handle in handles {
        let _ = handle.join();
    }

    let mut partials = Vec::with_capacity(expected);
    let mut faults = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(partial) => partials.push(partial),
            Err(fault) => faults.push(fault),
        }
    }

    if faults.is_empty() {
        Ok(partials)
    } else {
        faults.sort_by_key(|f| f.partition_index);
        Err(AggregationError::PartitionsFailed {
            faults,
            total: expected,
        })
    }
}

/// Wait until `expected` workers have reported, polling the cancellation flag
/// between receive attempts.
///
/// A worker that dies without sending (all senders gone early) is recorded as
/// a [`FaultCause::NoReport`] fault instead of blocking the barrier forever.
fn join_partials(
    rx: &Receiver<Result<PartialResult, PartitionFault>>,
    expected: usize,
    cancel: &CancelFlag,
) -> Result<Vec<Result<PartialResult, PartitionFault>>, AggregationError> {
    let mut outcomes = Vec::with_capacity(expected);

    while outcomes.len() < expected {
        if cancel.is_cancelled() {
            return Err(AggregationError::Interrupted);
        }
        match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
            Ok(outcome) => outcomes.push(outcome),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                let mut seen = vec![false; expected];
                for outcome in &outcomes {
                    let index = match outcome {
                        Ok(partial) => partial.partition_index,
                        Err(fault) => fault.partition_index,
                    };
                    if index < expected {
                        seen[index] = true;
                    }
                }
                for (index, reported) in seen.into_iter().enumerate() {
                    if !reported {
                        outcomes.push(Err(PartitionFault {
                            partition_index: index,
                            cause: FaultCause::NoReport,
                        }));
                    }
                }
                break;
            }
        }
    }

    Ok(outcomes)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
