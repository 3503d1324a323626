//! Gridsum - partitioned parallel reduction engine
//!
//! Gridsum reduces a dense two-dimensional `f64` matrix to a single scalar sum
//! by splitting the row space into contiguous partitions, dispatching one worker
//! thread per partition against shared read-only data, and joining all workers
//! at a full barrier before aggregating their partial results.
//!
//! # Architecture
//!
//! - **Partitioner**: pure, strictly covering ceil-based row split
//! - **Workers**: stateless execution units, one thread per partition
//! - **Coordinator**: spawn-all-then-join-all dispatch, fault collection,
//!   cooperative cancellation, partition-ordered aggregation
//! - **Stats**: per-worker metrics merged into an aggregate report

pub mod config;
pub mod coordinator;
pub mod error;
pub mod matrix;
pub mod output;
pub mod partition;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use coordinator::{reduce_sum, CancelFlag, Coordinator};
pub use error::ReduceError;
pub use matrix::Matrix;

/// Result type used throughout gridsum
pub type Result<T> = anyhow::Result<T>;
