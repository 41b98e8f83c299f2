//! Empirical transition/reward model estimated from observed steps

/// One predicted outcome of taking an action in a state
///
/// Derived from raw counts: `probability` is the empirical transition
/// frequency and `expected_reward` the mean observed reward for the triplet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub next_state: usize,
    pub probability: f64,
    pub expected_reward: f64,
}

/// Count-based estimate of the environment's transition and reward structure
///
/// Stores raw visit counts and reward sums per (state, action, next_state)
/// triplet. Probabilities and expected rewards are derived on demand, never
/// stored, so every query reflects all observations made so far. Counts are
/// monotonically non-decreasing; reward sums move in lockstep with them.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    /// Visit counts in row-major order:
    /// `counts[(state * n_actions + action) * n_states + next_state]`
    counts: Vec<u64>,
    /// Accumulated rewards, one slot per counted triplet
    reward_sums: Vec<f64>,
    n_states: usize,
    n_actions: usize,
}

impl TransitionModel {
    /// Create an empty model for the given space dimensions
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        let len = n_states * n_actions * n_states;
        Self {
            counts: vec![0; len],
            reward_sums: vec![0.0; len],
            n_states,
            n_actions,
        }
    }

    /// Number of states the model covers
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Number of actions per state
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn triplet_index(&self, state: usize, action: usize, next_state: usize) -> usize {
        debug_assert!(state < self.n_states && action < self.n_actions && next_state < self.n_states);
        (state * self.n_actions + action) * self.n_states + next_state
    }

    fn pair_range(&self, state: usize, action: usize) -> std::ops::Range<usize> {
        let start = (state * self.n_actions + action) * self.n_states;
        start..start + self.n_states
    }

    /// Record one observed transition
    ///
    /// Increments the triplet's count by one and adds `reward` to its sum.
    /// Repeated calls for the same triplet accumulate; unseen triplets start
    /// from zero implicitly.
    pub fn record(&mut self, state: usize, action: usize, reward: f64, next_state: usize) {
        let idx = self.triplet_index(state, action, next_state);
        self.counts[idx] += 1;
        self.reward_sums[idx] += reward;
    }

    /// Visit count for one (state, action, next_state) triplet
    pub fn count(&self, state: usize, action: usize, next_state: usize) -> u64 {
        self.counts[self.triplet_index(state, action, next_state)]
    }

    /// Accumulated reward for one (state, action, next_state) triplet
    pub fn reward_sum(&self, state: usize, action: usize, next_state: usize) -> f64 {
        self.reward_sums[self.triplet_index(state, action, next_state)]
    }

    /// Total observations for a (state, action) pair across all next states
    pub fn pair_count(&self, state: usize, action: usize) -> u64 {
        self.counts[self.pair_range(state, action)].iter().sum()
    }

    /// Whether a (state, action) pair has been observed at least once
    pub fn is_supported(&self, state: usize, action: usize) -> bool {
        self.pair_count(state, action) > 0
    }

    /// Derived outcome distribution for a (state, action) pair
    ///
    /// Returns `None` when the pair has never been observed: an unsupported
    /// pair contributes no transition mass, and callers must fall back rather
    /// than divide by a zero total. Otherwise yields one entry per next state
    /// with nonzero count; the probabilities sum to 1.
    pub fn outcomes(&self, state: usize, action: usize) -> Option<Vec<Outcome>> {
        let range = self.pair_range(state, action);
        let counts = &self.counts[range.clone()];
        let sums = &self.reward_sums[range];

        let total: u64 = counts.iter().sum();
        if total == 0 {
            return None;
        }

        let total = total as f64;
        let outcomes = counts
            .iter()
            .zip(sums)
            .enumerate()
            .filter(|&(_, (&count, _))| count > 0)
            .map(|(next_state, (&count, &sum))| Outcome {
                next_state,
                probability: count as f64 / total,
                expected_reward: sum / count as f64,
            })
            .collect();
        Some(outcomes)
    }

    /// Raw counts, triplet-major
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Raw reward sums, triplet-major
    pub fn reward_sums(&self) -> &[f64] {
        &self.reward_sums
    }

    /// Rebuild from snapshot parts; the caller has validated the lengths.
    pub(crate) fn from_parts(
        n_states: usize,
        n_actions: usize,
        counts: Vec<u64>,
        reward_sums: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(counts.len(), n_states * n_actions * n_states);
        debug_assert_eq!(reward_sums.len(), counts.len());
        Self {
            counts,
            reward_sums,
            n_states,
            n_actions,
        }
    }
}
