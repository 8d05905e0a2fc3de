//! # Iteration Engine
//!
//! The relaxation loop of the moment distribution method. Each pass over
//! the structure:
//!
//! 1. sums the moments already acting at every joint (fixed-end moments on
//!    the first pass, the running totals afterwards);
//! 2. balances the remainder against the applied moment, distributing it
//!    into the members at the joint per the distribution factors;
//! 3. carries a share of every balance to the far end of its member per the
//!    carry-over factors (carry-over runs opposite the distribution
//!    direction: the near end receives what the far end balanced);
//! 4. accumulates balance and carry-over into the running totals.
//!
//! Passes are purely functional: every pass reads the immutable model and
//! the previous [`IterationRecord`] and appends a fresh record. Nothing is
//! mutated in place, which keeps a full audit trail for the output table
//! and makes each pass trivially testable.
//!
//! The loop stops as soon as the convergence evaluator reports the worst
//! member-end error inside the tolerance, or after `max_iterations` passes.
//! Running out of passes is not an error: the history is returned in full
//! and the caller inspects [`ResultHistory::converged`].

use serde::{Deserialize, Serialize};

use crate::convergence::ConvergenceEvaluator;
use crate::errors::ValidationResult;
use crate::history::{IterationRecord, ResultHistory};
use crate::input::RawStructureInput;
use crate::model::StructureModel;
use crate::table::JointTable;
use crate::validate::validate;

/// Fewest passes a caller may request
pub const MIN_ITERATIONS: usize = 1;
/// Hard ceiling on relaxation passes
pub const MAX_ITERATIONS: usize = 50;
/// Floor for the convergence tolerance (percent)
pub const MIN_ERROR_PERCENT: f64 = 0.001;

/// Solver knobs, validated into range before a solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveOptions {
    /// Upper bound on passes, `1..=50`
    pub max_iterations: usize,

    /// Stop once the worst member-end error percentage drops below this
    pub min_error_percent: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            max_iterations: MAX_ITERATIONS,
            min_error_percent: MIN_ERROR_PERCENT,
        }
    }
}

/// Validate a raw payload and solve it in one call.
///
/// This is the whole in-process boundary: structured payload in, structured
/// history out. Validation failures abort before any solving; a validated
/// model cannot fail to solve.
///
/// # Example
///
/// ```rust
/// use mdm_core::engine::analyze;
/// use mdm_core::input::RawStructureInput;
///
/// let mut raw = RawStructureInput::blank(2);
/// raw.connect(0, 1);
/// raw.set_distribution_factor(1, 0, 1.0);
/// raw.set_distribution_factor(0, 1, 1.0);
/// raw.set_initial_moment(0, 1, -12.0);
/// raw.set_initial_moment(1, 0, 12.0);
/// raw.max_iterations = 10;
///
/// let history = analyze(&raw).unwrap();
/// assert!(history.iteration_count <= 10);
/// ```
pub fn analyze(raw: &RawStructureInput) -> ValidationResult<ResultHistory> {
    let validated = validate(raw)?;
    Ok(solve(&validated.model, &validated.options))
}

/// Run the relaxation loop over a validated model.
///
/// Deterministic and total: same model and options, same history, always.
pub fn solve(model: &StructureModel, options: &SolveOptions) -> ResultHistory {
    let evaluator = ConvergenceEvaluator::new(options.min_error_percent);

    let mut records = Vec::with_capacity(options.max_iterations);
    records.push(initial_pass(model));

    for pass in 1..options.max_iterations {
        let record = relaxation_pass(model, &records[pass - 1], &evaluator);
        let converged = record
            .max_error_percent
            .is_some_and(|error| evaluator.is_converged(error));
        records.push(record);
        if converged {
            break;
        }
    }

    ResultHistory::new(model.labels().to_vec(), records)
}

/// Pass 0: balance against the fixed-end moments.
///
/// No error is computed: there is no previous carry-over to measure
/// against, and a single-pass solve simply reports what it distributed.
fn initial_pass(model: &StructureModel) -> IterationRecord {
    let column_sums = column_sums(model, model.initial());
    let balance = balance_table(model, &column_sums);
    let carry_over = carry_over_table(model, &balance);

    let mut total = JointTable::zeros(model.joint_count());
    for (i, j) in model.connected_pairs() {
        total.set(
            i,
            j,
            model.initial().get(i, j) + balance.get(i, j) + carry_over.get(i, j),
        );
    }

    IterationRecord {
        balance,
        carry_over,
        total,
        max_error_percent: None,
    }
}

/// Pass k > 0: balance against the previous running totals and accumulate.
fn relaxation_pass(
    model: &StructureModel,
    previous: &IterationRecord,
    evaluator: &ConvergenceEvaluator,
) -> IterationRecord {
    let column_sums = column_sums(model, &previous.total);
    let balance = balance_table(model, &column_sums);
    let carry_over = carry_over_table(model, &balance);

    let mut total = previous.total.clone();
    for (i, j) in model.connected_pairs() {
        total.set(
            i,
            j,
            total.get(i, j) + balance.get(i, j) + carry_over.get(i, j),
        );
    }

    let max_error = evaluator.max_error_percent(
        model.connectivity(),
        &balance,
        &total,
        &previous.carry_over,
    );

    IterationRecord {
        balance,
        carry_over,
        total,
        max_error_percent: Some(max_error),
    }
}

/// Moment already acting at each joint: the connected-column sums of `table`.
fn column_sums(model: &StructureModel, table: &JointTable) -> Vec<f64> {
    (0..model.joint_count())
        .map(|j| model.connectivity().column_sum(table, j))
        .collect()
}

/// Distribute each joint's unbalanced moment into its members.
///
/// `balance[i][j] = DF[i][j] * (applied[j] - column_sum[j])`
fn balance_table(model: &StructureModel, column_sums: &[f64]) -> JointTable {
    let mut balance = JointTable::zeros(model.joint_count());
    for (i, j) in model.connected_pairs() {
        balance.set(
            i,
            j,
            model.distribution().get(i, j) * (model.applied_moment(j) - column_sums[j]),
        );
    }
    balance
}

/// Transport each balance to the far end of its member.
///
/// Carry-over runs opposite the distribution direction: the entry at
/// `(i, j)` receives the balance computed at `(j, i)`, scaled by the
/// carry-over factor as seen from `j` to `i`.
///
/// `carry_over[i][j] = COF[j][i] * balance[j][i]`
fn carry_over_table(model: &StructureModel, balance: &JointTable) -> JointTable {
    let mut carry_over = JointTable::zeros(model.joint_count());
    for (i, j) in model.connected_pairs() {
        carry_over.set(
            i,
            j,
            model.carry_over().get(j, i) * balance.get(j, i),
        );
    }
    carry_over
}
