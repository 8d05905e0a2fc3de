//! # Joint Tables
//!
//! `JointTable` is the square `N x N` matrix used throughout the solver:
//! distribution factors, carry-over factors, initial moments and every
//! per-pass balance/carry-over/total grid are all joint tables.
//!
//! Cell `(i, j)` is read "member end toward joint `i`, acting at joint `j`"
//! (receiver row, source column). Diagonal cells are meaningless and stay at
//! `0.0`; cells off the structure's connectivity are placeholders that the
//! solver never reads.
//!
//! A plain nested-array representation is used instead of a linear-algebra
//! crate: these are display-shaped tables addressed cell by cell, and they
//! serialize to the same JSON grid a front end renders.

use serde::{Deserialize, Serialize};

/// Square matrix of per-member-end values, indexed `(row, col)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointTable {
    rows: Vec<Vec<f64>>,
}

impl JointTable {
    /// Create an `n x n` table of zeros.
    pub fn zeros(n: usize) -> Self {
        JointTable {
            rows: vec![vec![0.0; n]; n],
        }
    }

    /// Build from prepared rows. Callers must supply a square grid;
    /// the validator is responsible for rejecting ragged payloads first.
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == rows.len()));
        JointTable { rows }
    }

    /// Table dimension (number of joints).
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Set the value at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.rows[row][col] = value;
    }

    /// True if any cell is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.rows.iter().flatten().any(|v| !v.is_finite())
    }

    /// Rows as slices, for rendering.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}
