//! # Error Types
//!
//! Structured validation errors for `mdm_core`. Every failure names the
//! offending table, cell or joint so a front end can highlight exactly what
//! to fix rather than showing a generic message.
//!
//! The solver itself has no error type: once a payload passes validation,
//! every operation in the relaxation loop is a total function over finite
//! numeric tables.
//!
//! ## Example
//!
//! ```rust
//! use mdm_core::errors::{TableId, ValidationError};
//!
//! let err = ValidationError::non_numeric_cell(TableId::DistributionFactor, 1, Some(2));
//! assert_eq!(err.error_code(), "NON_NUMERIC_CELL");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Identifies the input table a validation failure refers to.
///
/// Serialized names match the wire payload field names so a front end can
/// map an error straight back onto the table it rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableId {
    Connections,
    DistributionFactor,
    CarryOverFactor,
    InitialMoment,
    AppliedMoment,
}

impl TableId {
    /// Wire/display name of the table (camelCase, matching the payload)
    pub fn name(&self) -> &'static str {
        match self {
            TableId::Connections => "connections",
            TableId::DistributionFactor => "distributionFactor",
            TableId::CarryOverFactor => "carryOverFactor",
            TableId::InitialMoment => "initialMoment",
            TableId::AppliedMoment => "appliedMoment",
        }
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Structured error type for payload validation.
///
/// Each variant carries enough context to pinpoint the offending input.
/// Failures are reported one at a time: validation short-circuits on the
/// first rule that fails, in the documented check order.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ValidationError {
    /// Joint count outside the supported range
    #[error("Number of joints must be between {min} and {max}, got {found}")]
    JointCountOutOfRange { found: usize, min: usize, max: usize },

    /// Iteration limit outside the supported range
    #[error("Maximum iterations must be between {min} and {max}, got {found}")]
    IterationLimitOutOfRange { found: usize, min: usize, max: usize },

    /// Convergence tolerance below the supported floor
    #[error("Minimum error percent must be at least {floor}, got {found}")]
    ToleranceTooSmall { found: f64, floor: f64 },

    /// A table does not have the expected dimensions
    #[error("Table '{table}' must be {expected}x{expected}, got {rows} rows x {cols} columns")]
    TableShape {
        table: TableId,
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// A joint is marked as connected to itself
    #[error("Joint {joint} is connected to itself")]
    SelfConnection { joint: usize },

    /// The connection matrix disagrees with its transpose
    #[error("Connection between joints {a} and {b} is not symmetric")]
    AsymmetricConnection { a: usize, b: usize },

    /// A joint has no connection to any other joint and cannot balance moments
    #[error("Joint {joint} ('{label}') is not connected to any other joint")]
    DisconnectedJoint { joint: usize, label: String },

    /// A required cell does not hold a finite number
    #[error("A value in table '{table}' (row {row}) is not a valid number")]
    NonNumericCell {
        table: TableId,
        row: usize,
        col: Option<usize>,
    },
}

impl ValidationError {
    /// Create a DisconnectedJoint error
    pub fn disconnected_joint(joint: usize, label: impl Into<String>) -> Self {
        ValidationError::DisconnectedJoint {
            joint,
            label: label.into(),
        }
    }

    /// Create a NonNumericCell error
    pub fn non_numeric_cell(table: TableId, row: usize, col: Option<usize>) -> Self {
        ValidationError::NonNumericCell { table, row, col }
    }

    /// Create a TableShape error
    pub fn table_shape(table: TableId, expected: usize, rows: usize, cols: usize) -> Self {
        ValidationError::TableShape {
            table,
            expected,
            rows,
            cols,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::JointCountOutOfRange { .. } => "JOINT_COUNT_OUT_OF_RANGE",
            ValidationError::IterationLimitOutOfRange { .. } => "ITERATION_LIMIT_OUT_OF_RANGE",
            ValidationError::ToleranceTooSmall { .. } => "TOLERANCE_TOO_SMALL",
            ValidationError::TableShape { .. } => "TABLE_SHAPE",
            ValidationError::SelfConnection { .. } => "SELF_CONNECTION",
            ValidationError::AsymmetricConnection { .. } => "ASYMMETRIC_CONNECTION",
            ValidationError::DisconnectedJoint { .. } => "DISCONNECTED_JOINT",
            ValidationError::NonNumericCell { .. } => "NON_NUMERIC_CELL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ValidationError::non_numeric_cell(TableId::DistributionFactor, 2, Some(0));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"distributionFactor\""));

        let roundtrip: ValidationError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ValidationError::disconnected_joint(2, "c").error_code(),
            "DISCONNECTED_JOINT"
        );
        assert_eq!(
            ValidationError::table_shape(TableId::Connections, 3, 2, 3).error_code(),
            "TABLE_SHAPE"
        );
    }

    #[test]
    fn test_table_names_match_wire_payload() {
        assert_eq!(TableId::DistributionFactor.name(), "distributionFactor");
        assert_eq!(TableId::AppliedMoment.name(), "appliedMoment");
        let json = serde_json::to_string(&TableId::CarryOverFactor).unwrap();
        assert_eq!(json, "\"carryOverFactor\"");
    }
}
