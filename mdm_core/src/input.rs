//! # Raw Input Payload
//!
//! `RawStructureInput` is the wire-level payload a front end hands to the
//! validator: connectivity checkboxes, the three factor/moment tables, the
//! applied-moment column and the two solver knobs. Matrix cells are
//! [`RawCell`]s (a JSON number or the literal text typed into an input box)
//! so the validator, not the deserializer, gets to report exactly which cell
//! is bad.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "numberOfJoints": 3,
//!   "jointLabels": ["A", "B", "C"],
//!   "connections": [
//!     [false, true, false],
//!     [true, false, true],
//!     [false, true, false]
//!   ],
//!   "distributionFactor": [
//!     [0, 0.5, 0],
//!     [0.5, 0, 0.5],
//!     [0, 0.5, 0]
//!   ],
//!   "carryOverFactor": [
//!     [0, 0.5, 0],
//!     [0.5, 0, 0.5],
//!     [0, 0.5, 0]
//!   ],
//!   "initialMoment": [
//!     [0, -26.25, 0],
//!     [26.25, 0, 0],
//!     [0, 0, 0]
//!   ],
//!   "appliedMoment": [0, 0, 0],
//!   "maxIterations": 20,
//!   "minErrorPercent": 0.001
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One hand-entered table cell: either an already-numeric value or the raw
/// text of an input box.
///
/// A blank or whitespace-only string reads as `0.0`: an untouched input box
/// contributes nothing, it is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Parse the cell into a finite number, or `None` if it cannot be one.
    pub fn parse(&self) -> Option<f64> {
        match self {
            RawCell::Number(v) => Some(*v).filter(|v| v.is_finite()),
            RawCell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
                }
            }
        }
    }
}

impl Default for RawCell {
    fn default() -> Self {
        RawCell::Number(0.0)
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

/// Raw solver payload as assembled by a front end.
///
/// See the module docs for the JSON shape. `jointLabels` is optional;
/// missing labels default to `A`, `B`, `C`, ... as in the classic input
/// sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStructureInput {
    /// Number of joints in the structure (N)
    pub number_of_joints: usize,

    /// Display label per joint, annotation only
    #[serde(default)]
    pub joint_labels: Option<Vec<String>>,

    /// N x N symmetric member-existence matrix, false diagonal
    pub connections: Vec<Vec<bool>>,

    /// N x N distribution factors (receiver row, source column)
    pub distribution_factor: Vec<Vec<RawCell>>,

    /// N x N carry-over factors (receiver row, source column)
    pub carry_over_factor: Vec<Vec<RawCell>>,

    /// N x N fixed-end moments before any balancing
    pub initial_moment: Vec<Vec<RawCell>>,

    /// External moment applied directly at each joint, length N
    pub applied_moment: Vec<RawCell>,

    /// Upper bound on relaxation passes, 1..=50
    pub max_iterations: usize,

    /// Stop once the worst member-end error percentage drops below this
    pub min_error_percent: f64,
}

impl RawStructureInput {
    /// Create an empty payload for `n` joints: no connections, all-zero
    /// tables, default solver knobs. Useful as a starting point for
    /// programmatic construction.
    pub fn blank(n: usize) -> Self {
        RawStructureInput {
            number_of_joints: n,
            joint_labels: None,
            connections: vec![vec![false; n]; n],
            distribution_factor: vec![vec![RawCell::default(); n]; n],
            carry_over_factor: vec![vec![RawCell::default(); n]; n],
            initial_moment: vec![vec![RawCell::default(); n]; n],
            applied_moment: vec![RawCell::default(); n],
            max_iterations: crate::engine::SolveOptions::default().max_iterations,
            min_error_percent: crate::engine::SolveOptions::default().min_error_percent,
        }
    }

    /// Mark joints `a` and `b` as joined by a member (both directions).
    pub fn connect(&mut self, a: usize, b: usize) {
        self.connections[a][b] = true;
        self.connections[b][a] = true;
    }

    /// Set the distribution factor toward joint `receiver` for the
    /// unbalanced moment at joint `source`.
    pub fn set_distribution_factor(&mut self, receiver: usize, source: usize, value: f64) {
        self.distribution_factor[receiver][source] = RawCell::Number(value);
    }

    /// Set the carry-over factor toward joint `receiver` from the balance at
    /// joint `source`.
    pub fn set_carry_over_factor(&mut self, receiver: usize, source: usize, value: f64) {
        self.carry_over_factor[receiver][source] = RawCell::Number(value);
    }

    /// Set the fixed-end moment for the member end at joint `source` toward
    /// joint `receiver`.
    pub fn set_initial_moment(&mut self, receiver: usize, source: usize, value: f64) {
        self.initial_moment[receiver][source] = RawCell::Number(value);
    }

    /// Set the externally applied moment at a joint.
    pub fn set_applied_moment(&mut self, joint: usize, value: f64) {
        self.applied_moment[joint] = RawCell::Number(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parsing() {
        assert_eq!(RawCell::Number(0.5).parse(), Some(0.5));
        assert_eq!(RawCell::from("0.364").parse(), Some(0.364));
        assert_eq!(RawCell::from("  -26.25 ").parse(), Some(-26.25));
        assert_eq!(RawCell::from("").parse(), Some(0.0));
        assert_eq!(RawCell::from("   ").parse(), Some(0.0));
        assert_eq!(RawCell::from("Bad Input").parse(), None);
        assert_eq!(RawCell::Number(f64::NAN).parse(), None);
        assert_eq!(RawCell::from("inf").parse(), None);
    }

    #[test]
    fn test_payload_json_field_names() {
        let mut raw = RawStructureInput::blank(2);
        raw.connect(0, 1);
        let json = serde_json::to_string(&raw).unwrap();
        assert!(json.contains("\"numberOfJoints\""));
        assert!(json.contains("\"distributionFactor\""));
        assert!(json.contains("\"minErrorPercent\""));

        let roundtrip: RawStructureInput = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, raw);
    }

    #[test]
    fn test_mixed_number_and_text_cells_deserialize() {
        let json = r#"{
            "numberOfJoints": 2,
            "connections": [[false, true], [true, false]],
            "distributionFactor": [["", "1"], [1.0, ""]],
            "carryOverFactor": [["", 0.5], ["0.5", ""]],
            "initialMoment": [["", -10], ["10", ""]],
            "appliedMoment": [0, "0"],
            "maxIterations": 10,
            "minErrorPercent": 0.001
        }"#;
        let raw: RawStructureInput = serde_json::from_str(json).unwrap();
        assert_eq!(raw.distribution_factor[0][1], RawCell::from("1"));
        assert_eq!(raw.initial_moment[0][1], RawCell::Number(-10.0));
    }
}
