//! Dense value tables for tabular learning
//!
//! Both tables are plain row-major storage over a fixed, fully enumerated
//! state/action space. All mutation policy (TD updates, planning sweeps)
//! lives with the agent and planner; the tables only read and write cells.

/// Action-value table mapping (state, action) pairs to Q-values
///
/// Row-major `n_states x n_actions` storage, zero-initialized. Indices are
/// validated at the agent boundary, so accessors here assume them in range.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    /// Q-values in row-major order: `values[state * n_actions + action]`
    values: Vec<f64>,
    n_states: usize,
    n_actions: usize,
}

impl QTable {
    /// Create a zero-initialized table for the given space dimensions
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self {
            values: vec![0.0; n_states * n_actions],
            n_states,
            n_actions,
        }
    }

    /// Number of states the table covers
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Number of actions per state
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn index(&self, state: usize, action: usize) -> usize {
        debug_assert!(state < self.n_states && action < self.n_actions);
        state * self.n_actions + action
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.values[self.index(state, action)]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        let idx = self.index(state, action);
        self.values[idx] = value;
    }

    /// All Q-values for one state, indexed by action
    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.n_actions;
        &self.values[start..start + self.n_actions]
    }

    /// Get maximum Q-value over all actions in a state
    pub fn max_q(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .fold(f64::NEG_INFINITY, |best, &q| best.max(q))
    }

    /// Select the greedy action (highest Q-value) for a state
    ///
    /// Ties break deterministically toward the lowest action index: the scan
    /// only replaces the incumbent on a strictly greater Q-value.
    pub fn greedy_action(&self, state: usize) -> usize {
        let row = self.row(state);
        let mut best = 0;
        for (action, &q) in row.iter().enumerate().skip(1) {
            if q > row[best] {
                best = action;
            }
        }
        best
    }

    /// Raw table contents, row-major
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Rebuild from snapshot parts; the caller has validated the length.
    pub(crate) fn from_parts(n_states: usize, n_actions: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), n_states * n_actions);
        Self {
            values,
            n_states,
            n_actions,
        }
    }
}

/// State-value table used by the planner
///
/// Zero-initialized; overwritten in place during planning sweeps.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    values: Vec<f64>,
}

impl ValueTable {
    /// Create a zero-initialized table over `n_states` states
    pub fn new(n_states: usize) -> Self {
        Self {
            values: vec![0.0; n_states],
        }
    }

    /// Number of states the table covers
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table covers zero states
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value estimate for a state
    pub fn get(&self, state: usize) -> f64 {
        self.values[state]
    }

    /// Set the value estimate for a state
    pub fn set(&mut self, state: usize, value: f64) {
        self.values[state] = value;
    }

    /// Raw table contents, indexed by state
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Rebuild from snapshot parts; the caller has validated the length.
    pub(crate) fn from_parts(values: Vec<f64>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_starts_at_zero() {
        let qtable = QTable::new(4, 3);
        for state in 0..4 {
            for action in 0..3 {
                assert_eq!(qtable.get(state, action), 0.0);
            }
        }
        assert_eq!(qtable.values().len(), 12);
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(4, 3);
        qtable.set(2, 1, 1.5);
        assert_eq!(qtable.get(2, 1), 1.5);
        // Neighbours in the flat vector stay untouched
        assert_eq!(qtable.get(2, 0), 0.0);
        assert_eq!(qtable.get(2, 2), 0.0);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(2, 3);
        qtable.set(0, 0, 0.5);
        qtable.set(0, 1, 1.5);
        qtable.set(0, 2, 0.8);
        assert_eq!(qtable.max_q(0), 1.5);
        assert_eq!(qtable.max_q(1), 0.0);
    }

    #[test]
    fn test_greedy_action_unique_maximum() {
        let mut qtable = QTable::new(1, 4);
        qtable.set(0, 0, 0.5);
        qtable.set(0, 1, 1.5);
        qtable.set(0, 2, 0.8);
        qtable.set(0, 3, -2.0);
        assert_eq!(qtable.greedy_action(0), 1);
    }

    #[test]
    fn test_greedy_action_tie_breaks_to_lowest_index() {
        let mut qtable = QTable::new(1, 4);
        qtable.set(0, 1, 0.7);
        qtable.set(0, 3, 0.7);
        assert_eq!(qtable.greedy_action(0), 1);

        // An all-zero row picks action 0
        let fresh = QTable::new(1, 4);
        assert_eq!(fresh.greedy_action(0), 0);
    }

    #[test]
    fn test_row_view() {
        let mut qtable = QTable::new(3, 2);
        qtable.set(1, 0, 0.25);
        qtable.set(1, 1, -0.5);
        assert_eq!(qtable.row(1), &[0.25, -0.5]);
    }

    #[test]
    fn test_value_table() {
        let mut values = ValueTable::new(3);
        assert_eq!(values.values(), &[0.0, 0.0, 0.0]);
        values.set(2, 0.9);
        assert_eq!(values.get(2), 0.9);
        assert_eq!(values.len(), 3);
    }
}
