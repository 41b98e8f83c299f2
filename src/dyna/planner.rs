//! Synchronous value iteration over the estimated model
//!
//! Pure computation: the planner reads accumulated counts, refines the
//! state-value table in place, and synchronizes the action-value table for
//! observed pairs. It performs no environment interaction and holds no state
//! of its own, so the training loop can invoke it at any cadence.

use super::{
    model::TransitionModel,
    q_table::{QTable, ValueTable},
};

/// Outcome of one planning invocation
///
/// Hitting the sweep cap is not an error; callers that care can report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanningSummary {
    /// Number of sweeps actually run
    pub sweeps: usize,
    /// Largest |V_new(s) - V_old(s)| in the final sweep;
    /// `f64::INFINITY` if no sweep ran
    pub max_delta: f64,
    /// Whether the final sweep's delta fell below theta
    pub converged: bool,
}

/// One Bellman backup: expected reward plus discounted next-state value,
/// weighted by the empirical transition probabilities.
///
/// `None` when the pair has never been observed; the caller must skip it
/// rather than treat the missing estimate as a zero that could win a max.
fn backup(
    model: &TransitionModel,
    state: usize,
    action: usize,
    discount_factor: f64,
    values: &ValueTable,
) -> Option<f64> {
    let outcomes = model.outcomes(state, action)?;
    let backed_up = outcomes
        .iter()
        .map(|o| o.probability * (o.expected_reward + discount_factor * values.get(o.next_state)))
        .sum();
    Some(backed_up)
}

/// Run value-iteration sweeps until the max delta drops below `theta` or
/// `max_sweeps` is reached, then synchronize `q_table` from the result.
///
/// Each sweep visits states in ascending order and reads the previous
/// sweep's values, so backups within one sweep see a consistent snapshot.
/// States without a single observed action keep their current value entry;
/// after the loop, Q-values are overwritten only for pairs with observation
/// support, leaving model-free-only entries untouched.
pub(crate) fn run_value_iteration(
    model: &TransitionModel,
    discount_factor: f64,
    values: &mut ValueTable,
    q_table: &mut QTable,
    theta: f64,
    max_sweeps: usize,
) -> PlanningSummary {
    let n_states = model.n_states();
    let n_actions = model.n_actions();

    let mut summary = PlanningSummary {
        sweeps: 0,
        max_delta: f64::INFINITY,
        converged: false,
    };

    while summary.sweeps < max_sweeps {
        let snapshot = values.clone();
        let mut delta: f64 = 0.0;

        for state in 0..n_states {
            let mut best: Option<f64> = None;
            for action in 0..n_actions {
                if let Some(q_plan) = backup(model, state, action, discount_factor, &snapshot) {
                    best = Some(match best {
                        Some(current) => current.max(q_plan),
                        None => q_plan,
                    });
                }
            }
            if let Some(best) = best {
                delta = delta.max((best - snapshot.get(state)).abs());
                values.set(state, best);
            }
        }

        summary.sweeps += 1;
        summary.max_delta = delta;
        if delta < theta {
            summary.converged = true;
            break;
        }
    }

    for state in 0..n_states {
        for action in 0..n_actions {
            if let Some(q_plan) = backup(model, state, action, discount_factor, values) {
                q_table.set(state, action, q_plan);
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic 3-state chain: 0 -> 1 (reward 0), 1 -> 2 (reward 1),
    /// state 2 terminal (never acted from). With gamma = 0.9 the fixed point
    /// is V = [0.9, 1.0, 0.0].
    fn chain_model() -> TransitionModel {
        let mut model = TransitionModel::new(3, 1);
        model.record(0, 0, 0.0, 1);
        model.record(1, 0, 1.0, 2);
        model
    }

    #[test]
    fn test_chain_reaches_closed_form_values() {
        let model = chain_model();
        let mut values = ValueTable::new(3);
        let mut q_table = QTable::new(3, 1);

        let summary = run_value_iteration(&model, 0.9, &mut values, &mut q_table, 1e-10, 50);

        assert!(summary.converged, "chain should converge, got {summary:?}");
        assert!((values.get(0) - 0.9).abs() < 1e-9);
        assert!((values.get(1) - 1.0).abs() < 1e-9);
        assert_eq!(values.get(2), 0.0, "terminal state keeps zero value");

        // Q synchronized from the converged values for supported pairs only
        assert!((q_table.get(0, 0) - 0.9).abs() < 1e-9);
        assert!((q_table.get(1, 0) - 1.0).abs() < 1e-9);
        assert_eq!(q_table.get(2, 0), 0.0);
    }

    #[test]
    fn test_delta_sequence_is_non_increasing() {
        let model = chain_model();
        let mut values = ValueTable::new(3);
        let mut q_table = QTable::new(3, 1);

        // Single-sweep invocations expose the per-sweep delta sequence
        let mut deltas = Vec::new();
        for _ in 0..6 {
            let summary = run_value_iteration(&model, 0.9, &mut values, &mut q_table, 0.0, 1);
            deltas.push(summary.max_delta);
        }
        for pair in deltas.windows(2) {
            assert!(
                pair[1] <= pair[0] + 1e-12,
                "delta increased across sweeps: {deltas:?}"
            );
        }
        assert!(
            *deltas.last().unwrap() < 1e-9,
            "chain should settle within a few sweeps: {deltas:?}"
        );
    }

    #[test]
    fn test_unsupported_state_keeps_its_value() {
        let mut model = TransitionModel::new(3, 2);
        model.record(0, 0, 1.0, 2);

        let mut values = ValueTable::new(3);
        values.set(1, 0.7);
        let mut q_table = QTable::new(3, 2);
        q_table.set(1, 1, -0.3);

        run_value_iteration(&model, 0.9, &mut values, &mut q_table, 1e-10, 20);

        assert_eq!(values.get(1), 0.7, "state without support must not move");
        assert_eq!(q_table.get(1, 1), -0.3, "unsupported Q entry must not move");
        assert_eq!(q_table.get(0, 1), 0.0, "unsupported action left untouched");
        // Supported pair backs up through the (unsupported, zero-valued) state 2
        assert!((q_table.get(0, 0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_cap_is_respected_without_convergence() {
        // Self-loop with reward 1 converges geometrically toward 10; a tight
        // theta cannot be met in five sweeps.
        let mut model = TransitionModel::new(1, 1);
        model.record(0, 0, 1.0, 0);

        let mut values = ValueTable::new(1);
        let mut q_table = QTable::new(1, 1);
        let summary = run_value_iteration(&model, 0.9, &mut values, &mut q_table, 1e-12, 5);

        assert_eq!(summary.sweeps, 5);
        assert!(!summary.converged);
        assert!(summary.max_delta > 1e-12);
        assert!(values.get(0).is_finite());

        // Further sweeps keep approaching the 1/(1-gamma) fixed point
        let summary = run_value_iteration(&model, 0.9, &mut values, &mut q_table, 1e-9, 500);
        assert!(summary.converged);
        assert!((values.get(0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_stochastic_backup_weights_outcomes() {
        // 50/50 split between a reward-2 branch and a reward-0 branch
        let mut model = TransitionModel::new(3, 1);
        model.record(0, 0, 2.0, 1);
        model.record(0, 0, 0.0, 2);

        let mut values = ValueTable::new(3);
        let mut q_table = QTable::new(3, 1);
        let summary = run_value_iteration(&model, 0.9, &mut values, &mut q_table, 0.0, 1);

        assert_eq!(summary.sweeps, 1);
        assert!((values.get(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_model_converges_immediately() {
        let model = TransitionModel::new(4, 2);
        let mut values = ValueTable::new(4);
        let mut q_table = QTable::new(4, 2);

        let summary = run_value_iteration(&model, 0.99, &mut values, &mut q_table, 1e-8, 10);

        assert!(summary.converged);
        assert_eq!(summary.sweeps, 1);
        assert_eq!(summary.max_delta, 0.0);
        assert!(values.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_planning_with_zero_sweep_budget_is_a_no_op() {
        let model = chain_model();
        let mut values = ValueTable::new(3);
        let mut q_table = QTable::new(3, 1);

        let summary = run_value_iteration(&model, 0.9, &mut values, &mut q_table, 1e-8, 0);

        assert_eq!(summary.sweeps, 0);
        assert!(!summary.converged);
        assert_eq!(summary.max_delta, f64::INFINITY);
        // Q still synchronizes from the (untouched) value table
        assert_eq!(q_table.get(1, 0), 1.0);
    }
}
