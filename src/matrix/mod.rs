//! Dense row-major matrix shared read-only across workers
//!
//! The matrix is the only resource workers share. It is never mutated during a
//! reduction; the coordinator hands each worker an `Arc` clone and every access
//! goes through checked row lookups.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use thiserror::Error;

/// Shape violation found while constructing a matrix from nested rows.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row} has {len} columns, expected {cols}")]
pub struct RaggedRowsError {
    /// Index of the offending row.
    pub row: usize,
    /// Its actual length.
    pub len: usize,
    /// Length of row 0, which sets the matrix width.
    pub cols: usize,
}

/// Immutable rectangular `rows x cols` matrix of `f64` values.
///
/// Storage is flat row-major, so a partition's rows are contiguous in memory
/// and summation order within a row is left-to-right by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from nested rows, rejecting ragged input.
    ///
    /// The first row fixes the column count; every later row must match it.
    /// An empty row list yields the 0x0 matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, RaggedRowsError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(RaggedRowsError {
                    row: index,
                    len: row.len(),
                    cols,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// The 0x0 matrix.
    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }

    /// Deterministic synthetic matrix with values uniform in [0, 1).
    ///
    /// The same seed always produces the same matrix, so benchmark runs and
    /// tests are reproducible.
    pub fn random(rows: usize, cols: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..rows * cols).map(|_| rng.gen::<f64>()).collect();
        Self { rows, cols, data }
    }

    /// Load a matrix from a JSON array-of-arrays file.
    pub fn load_json(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;
        let rows: Vec<Vec<f64>> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid matrix JSON in {}", path.display()))?;
        Self::from_rows(rows)
            .with_context(|| format!("Ragged matrix in {}", path.display()))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the matrix holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked row access. Returns `None` past the last row.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index < self.rows {
            let start = index * self.cols;
            Some(&self.data[start..start + self.cols])
        } else {
            None
        }
    }

    /// Single-threaded row-major reference sum.
    ///
    /// This is the oracle the parallel engine is measured against: any worker
    /// count must agree with it within floating-point tolerance.
    pub fn sequential_sum(&self) -> f64 {
        self.data.iter().sum()
    }
}
