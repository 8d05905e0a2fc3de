//! # Input Validation
//!
//! Turns a [`RawStructureInput`] payload into a [`StructureModel`] plus
//! [`SolveOptions`], or a [`ValidationError`] pinpointing the offending
//! table, cell or joint. Checks run in a fixed order and short-circuit on
//! the first failure:
//!
//! 1. Payload well-formedness: joint count, iteration limit and tolerance in
//!    range; every table square of dimension N; the connection matrix
//!    symmetric with a false diagonal.
//! 2. Connectivity completeness: every joint joined to at least one other.
//! 3. Numeric well-formedness, table by table (distribution factors, then
//!    carry-over factors, then initial moments, then applied moments): every
//!    cell on an existing connection must parse to a finite number.
//!
//! Cells the solver never reads (diagonals and cells without a member)
//! are don't-care: they parse leniently to a `0.0` placeholder and can hold
//! any text without failing validation.
//!
//! No further semantic checks are made. In particular, distribution-factor
//! columns are not required to sum to 1; hand-entered and rounded factors
//! are accepted as given.

use crate::engine::SolveOptions;
use crate::errors::{TableId, ValidationError, ValidationResult};
use crate::input::{RawCell, RawStructureInput};
use crate::model::{default_joint_labels, Connectivity, StructureModel};
use crate::table::JointTable;

/// Smallest structure that can balance anything
pub const MIN_JOINTS: usize = 2;
/// Largest structure the input sheet supports
pub const MAX_JOINTS: usize = 20;

/// A validated payload, ready to solve.
#[derive(Debug, Clone)]
pub struct ValidatedInput {
    pub model: StructureModel,
    pub options: SolveOptions,
}

/// Validate a raw payload into a solvable model.
///
/// # Example
///
/// ```rust
/// use mdm_core::input::RawStructureInput;
/// use mdm_core::validate::validate;
///
/// let mut raw = RawStructureInput::blank(2);
/// raw.connect(0, 1);
/// raw.set_distribution_factor(1, 0, 1.0);
/// raw.set_distribution_factor(0, 1, 1.0);
///
/// let validated = validate(&raw).unwrap();
/// assert_eq!(validated.model.joint_count(), 2);
/// ```
pub fn validate(raw: &RawStructureInput) -> ValidationResult<ValidatedInput> {
    let n = raw.number_of_joints;
    if !(MIN_JOINTS..=MAX_JOINTS).contains(&n) {
        return Err(ValidationError::JointCountOutOfRange {
            found: n,
            min: MIN_JOINTS,
            max: MAX_JOINTS,
        });
    }

    let options = validate_options(raw)?;

    check_square(TableId::Connections, n, &raw.connections)?;
    check_square(TableId::DistributionFactor, n, &raw.distribution_factor)?;
    check_square(TableId::CarryOverFactor, n, &raw.carry_over_factor)?;
    check_square(TableId::InitialMoment, n, &raw.initial_moment)?;
    if raw.applied_moment.len() != n {
        return Err(ValidationError::table_shape(
            TableId::AppliedMoment,
            n,
            raw.applied_moment.len(),
            1,
        ));
    }

    let connectivity = validate_connections(n, &raw.connections)?;
    let labels = resolve_labels(n, raw.joint_labels.as_deref());

    for (joint, label) in labels.iter().enumerate() {
        if !connectivity.is_connected(joint) {
            return Err(ValidationError::disconnected_joint(joint, label.clone()));
        }
    }

    let distribution = parse_table(
        TableId::DistributionFactor,
        &connectivity,
        &raw.distribution_factor,
    )?;
    let carry_over = parse_table(
        TableId::CarryOverFactor,
        &connectivity,
        &raw.carry_over_factor,
    )?;
    let initial = parse_table(TableId::InitialMoment, &connectivity, &raw.initial_moment)?;
    let applied = parse_vector(TableId::AppliedMoment, &raw.applied_moment)?;

    let model = StructureModel::new(labels, connectivity, distribution, carry_over, initial, applied);
    Ok(ValidatedInput { model, options })
}

fn validate_options(raw: &RawStructureInput) -> ValidationResult<SolveOptions> {
    use crate::engine::{MAX_ITERATIONS, MIN_ERROR_PERCENT, MIN_ITERATIONS};

    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&raw.max_iterations) {
        return Err(ValidationError::IterationLimitOutOfRange {
            found: raw.max_iterations,
            min: MIN_ITERATIONS,
            max: MAX_ITERATIONS,
        });
    }
    if !(raw.min_error_percent >= MIN_ERROR_PERCENT) || !raw.min_error_percent.is_finite() {
        return Err(ValidationError::ToleranceTooSmall {
            found: raw.min_error_percent,
            floor: MIN_ERROR_PERCENT,
        });
    }
    Ok(SolveOptions {
        max_iterations: raw.max_iterations,
        min_error_percent: raw.min_error_percent,
    })
}

fn check_square<T>(table: TableId, n: usize, rows: &[Vec<T>]) -> ValidationResult<()> {
    if rows.len() != n {
        let cols = rows.first().map_or(0, Vec::len);
        return Err(ValidationError::table_shape(table, n, rows.len(), cols));
    }
    if let Some(bad_row) = rows.iter().find(|row| row.len() != n) {
        return Err(ValidationError::table_shape(table, n, rows.len(), bad_row.len()));
    }
    Ok(())
}

fn validate_connections(n: usize, matrix: &[Vec<bool>]) -> ValidationResult<Connectivity> {
    for i in 0..n {
        if matrix[i][i] {
            return Err(ValidationError::SelfConnection { joint: i });
        }
        for j in (i + 1)..n {
            if matrix[i][j] != matrix[j][i] {
                return Err(ValidationError::AsymmetricConnection { a: i, b: j });
            }
        }
    }
    Ok(Connectivity::new(matrix.to_vec()))
}

fn resolve_labels(n: usize, provided: Option<&[String]>) -> Vec<String> {
    let defaults = default_joint_labels(n);
    match provided {
        // Labels are annotation only: take what was given per joint and fall
        // back to the default letter where missing or blank.
        Some(labels) => defaults
            .into_iter()
            .enumerate()
            .map(|(i, fallback)| match labels.get(i) {
                Some(label) if !label.trim().is_empty() => label.clone(),
                _ => fallback,
            })
            .collect(),
        None => defaults,
    }
}

/// Parse a square table, requiring finite numbers on connected cells only.
fn parse_table(
    table: TableId,
    connectivity: &Connectivity,
    cells: &[Vec<RawCell>],
) -> ValidationResult<JointTable> {
    let n = connectivity.joint_count();
    let mut rows = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            if connectivity.exists(i, j) {
                rows[i][j] = cells[i][j]
                    .parse()
                    .ok_or(ValidationError::non_numeric_cell(table, i, Some(j)))?;
            } else {
                // Don't-care cell: keep a placeholder, never an error.
                rows[i][j] = cells[i][j].parse().unwrap_or(0.0);
            }
        }
    }
    Ok(JointTable::from_rows(rows))
}

fn parse_vector(table: TableId, cells: &[RawCell]) -> ValidationResult<Vec<f64>> {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            cell.parse()
                .ok_or(ValidationError::non_numeric_cell(table, i, None))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_span_raw() -> RawStructureInput {
        let mut raw = RawStructureInput::blank(3);
        raw.connect(0, 1);
        raw.connect(1, 2);
        raw.set_distribution_factor(1, 0, 0.5);
        raw.set_distribution_factor(0, 1, 0.5);
        raw.set_distribution_factor(2, 1, 0.5);
        raw.set_distribution_factor(1, 2, 0.5);
        for (i, j) in [(0, 1), (1, 0), (1, 2), (2, 1)] {
            raw.set_carry_over_factor(i, j, 0.5);
        }
        raw.set_initial_moment(1, 0, 26.25);
        raw.set_initial_moment(0, 1, -26.25);
        raw
    }

    #[test]
    fn test_valid_payload_builds_model() {
        let validated = validate(&two_span_raw()).unwrap();
        let model = validated.model;
        assert_eq!(model.joint_count(), 3);
        assert_eq!(model.labels(), ["A", "B", "C"]);
        assert_eq!(model.distribution().get(0, 1), 0.5);
        assert_eq!(model.initial().get(1, 0), 26.25);
        assert_eq!(validated.options.max_iterations, 50);
    }

    #[test]
    fn test_disconnected_joint_detected() {
        let mut raw = two_span_raw();
        // Sever joint 2 from the structure entirely.
        raw.connections[1][2] = false;
        raw.connections[2][1] = false;
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DisconnectedJoint {
                joint: 2,
                label: "C".to_string(),
            }
        );
    }

    #[test]
    fn test_non_numeric_connected_cell_rejected() {
        let mut raw = two_span_raw();
        raw.distribution_factor[0][1] = "not a number".into();
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericCell {
                table: TableId::DistributionFactor,
                row: 0,
                col: Some(1),
            }
        );
    }

    #[test]
    fn test_non_numeric_applied_moment_reports_row_only() {
        let mut raw = two_span_raw();
        raw.applied_moment[2] = "x".into();
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericCell {
                table: TableId::AppliedMoment,
                row: 2,
                col: None,
            }
        );
    }

    #[test]
    fn test_junk_in_unconnected_cell_is_ignored() {
        let mut raw = two_span_raw();
        // Joints 0 and 2 are not connected; garbage there is don't-care.
        raw.initial_moment[0][2] = "garbage".into();
        raw.distribution_factor[2][0] = "???".into();
        let validated = validate(&raw).unwrap();
        assert_eq!(validated.model.initial().get(0, 2), 0.0);
        assert_eq!(validated.model.distribution().get(2, 0), 0.0);
    }

    #[test]
    fn test_blank_connected_cell_reads_as_zero() {
        let mut raw = two_span_raw();
        raw.initial_moment[2][1] = "".into();
        let validated = validate(&raw).unwrap();
        assert_eq!(validated.model.initial().get(2, 1), 0.0);
    }

    #[test]
    fn test_joint_count_range() {
        let raw = RawStructureInput::blank(1);
        assert_eq!(
            validate(&raw).unwrap_err().error_code(),
            "JOINT_COUNT_OUT_OF_RANGE"
        );
        let raw = RawStructureInput::blank(21);
        assert_eq!(
            validate(&raw).unwrap_err().error_code(),
            "JOINT_COUNT_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_iteration_and_tolerance_limits() {
        let mut raw = two_span_raw();
        raw.max_iterations = 0;
        assert_eq!(
            validate(&raw).unwrap_err().error_code(),
            "ITERATION_LIMIT_OUT_OF_RANGE"
        );

        let mut raw = two_span_raw();
        raw.max_iterations = 51;
        assert_eq!(
            validate(&raw).unwrap_err().error_code(),
            "ITERATION_LIMIT_OUT_OF_RANGE"
        );

        let mut raw = two_span_raw();
        raw.min_error_percent = 0.0;
        assert_eq!(
            validate(&raw).unwrap_err().error_code(),
            "TOLERANCE_TOO_SMALL"
        );

        let mut raw = two_span_raw();
        raw.min_error_percent = f64::NAN;
        assert_eq!(
            validate(&raw).unwrap_err().error_code(),
            "TOLERANCE_TOO_SMALL"
        );
    }

    #[test]
    fn test_shape_mismatch_names_table() {
        let mut raw = two_span_raw();
        raw.carry_over_factor[1].pop();
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TableShape {
                table: TableId::CarryOverFactor,
                expected: 3,
                rows: 3,
                cols: 2,
            }
        );
    }

    #[test]
    fn test_self_and_asymmetric_connections_rejected() {
        let mut raw = two_span_raw();
        raw.connections[1][1] = true;
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::SelfConnection { joint: 1 }
        );

        let mut raw = two_span_raw();
        raw.connections[2][0] = true;
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::AsymmetricConnection { a: 0, b: 2 }
        );
    }

    #[test]
    fn test_first_failure_wins_across_tables() {
        // Bad cells in both DF and COF: DF is checked first.
        let mut raw = two_span_raw();
        raw.distribution_factor[1][2] = "bad".into();
        raw.carry_over_factor[0][1] = "bad".into();
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericCell {
                table: TableId::DistributionFactor,
                row: 1,
                col: Some(2),
            }
        );
    }

    #[test]
    fn test_provided_labels_pass_through() {
        let mut raw = two_span_raw();
        raw.joint_labels = Some(vec!["a".into(), "".into(), "c".into()]);
        let validated = validate(&raw).unwrap();
        assert_eq!(validated.model.labels(), ["a", "B", "c"]);
    }
}
