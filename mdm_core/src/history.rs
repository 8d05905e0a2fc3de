//! # Iteration History
//!
//! The solver's output: one [`IterationRecord`] per relaxation pass,
//! append-only, plus the aggregate bookkeeping a front end needs to render
//! the classic distribution table. Nothing here computes; assembly is pure
//! aggregation over the records the engine produced.

use serde::{Deserialize, Serialize};

use crate::table::JointTable;

/// Everything computed in a single relaxation pass.
///
/// `max_error_percent` is `None` for the initial pass: there is no previous
/// carry-over to measure against yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationRecord {
    /// Moment distributed at each member end this pass
    pub balance: JointTable,

    /// Moment carried over to the far end of each member this pass
    pub carry_over: JointTable,

    /// Running total moment at each member end after this pass
    pub total: JointTable,

    /// Worst member-end error percentage for this pass, absent on pass 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_error_percent: Option<f64>,
}

/// Ordered record of every pass plus the final moments.
///
/// The caller decides how to present non-convergence: the solve ran to
/// `iteration_count` passes, and [`ResultHistory::converged`] reports
/// whether the last pass got inside the tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultHistory {
    /// Display labels, passed through for annotation
    pub joint_labels: Vec<String>,

    /// One record per pass, index = pass number
    pub records: Vec<IterationRecord>,

    /// Number of passes actually run
    pub iteration_count: usize,

    /// Final moments, equal to the last record's total
    pub final_total: JointTable,
}

impl ResultHistory {
    pub(crate) fn new(joint_labels: Vec<String>, records: Vec<IterationRecord>) -> Self {
        let iteration_count = records.len();
        let final_total = records
            .last()
            .map(|record| record.total.clone())
            .unwrap_or_else(|| JointTable::zeros(joint_labels.len()));
        ResultHistory {
            joint_labels,
            records,
            iteration_count,
            final_total,
        }
    }

    /// The last pass's record.
    pub fn last_record(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    /// Worst error of the last pass, if one was computed.
    pub fn last_max_error_percent(&self) -> Option<f64> {
        self.records.last().and_then(|record| record.max_error_percent)
    }

    /// True if the last pass ended inside the tolerance.
    ///
    /// A single-pass run computes no error and therefore never reports
    /// convergence; the caller asked for exactly one pass.
    pub fn converged(&self, min_error_percent: f64) -> bool {
        self.last_max_error_percent()
            .map(|error| error < min_error_percent)
            .unwrap_or(false)
    }
}
