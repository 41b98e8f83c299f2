//! The Dyna-style tabular agent
//!
//! One owned struct ties the pieces together: Q-learning from direct
//! experience, count-based model estimation from the same experience, and
//! value-iteration planning over the estimated model. A single training
//! loop drives the agent serially; nothing here blocks or spawns.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::{Error, Result},
    types::Transition,
};

use super::{
    model::TransitionModel,
    planner::{PlanningSummary, run_value_iteration},
    q_table::{QTable, ValueTable},
    serialization::AgentSnapshot,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

fn validate_hyperparameters(
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
) -> Result<()> {
    if !(learning_rate > 0.0 && learning_rate <= 1.0) {
        return Err(Error::InvalidHyperparameter {
            name: "learning_rate".to_string(),
            value: learning_rate,
            expected: "(0, 1]".to_string(),
        });
    }
    if !(discount_factor >= 0.0 && discount_factor < 1.0) {
        return Err(Error::InvalidHyperparameter {
            name: "discount_factor".to_string(),
            value: discount_factor,
            expected: "[0, 1)".to_string(),
        });
    }
    if !(epsilon_decay > 0.0 && epsilon_decay <= 1.0) {
        return Err(Error::InvalidHyperparameter {
            name: "epsilon_decay".to_string(),
            value: epsilon_decay,
            expected: "(0, 1]".to_string(),
        });
    }
    if !(min_epsilon >= 0.0 && min_epsilon <= 1.0) {
        return Err(Error::InvalidHyperparameter {
            name: "min_epsilon".to_string(),
            value: min_epsilon,
            expected: "[0, 1]".to_string(),
        });
    }
    if !(epsilon >= min_epsilon && epsilon <= 1.0) {
        return Err(Error::InvalidHyperparameter {
            name: "epsilon".to_string(),
            value: epsilon,
            expected: format!("[{min_epsilon}, 1]"),
        });
    }
    Ok(())
}

/// Tabular agent combining model-free and model-based learning
///
/// Owns every table it learns: the action-value table (Q), the state-value
/// table (V), the empirical transition model, the exploration state, and the
/// random source. Tables are zero-initialized at construction and never reset
/// afterwards.
#[derive(Debug, Clone)]
pub struct DynaAgent {
    q_table: QTable,
    values: ValueTable,
    model: TransitionModel,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl DynaAgent {
    /// Create a new agent over an `n_states` x `n_actions` space
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - α step size, in (0, 1]
    /// * `discount_factor` - γ weight on future value, in [0, 1)
    /// * `epsilon` - initial exploration rate, in [min_epsilon, 1]
    /// * `epsilon_decay` - multiplicative decay per episode, in (0, 1]
    /// * `min_epsilon` - exploration floor, in [0, 1]
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySpace`] for a zero-sized state or action space
    /// and [`Error::InvalidHyperparameter`] for out-of-range parameters.
    pub fn new(
        n_states: usize,
        n_actions: usize,
        learning_rate: f64,
        discount_factor: f64,
        epsilon: f64,
        epsilon_decay: f64,
        min_epsilon: f64,
    ) -> Result<Self> {
        if n_states == 0 || n_actions == 0 {
            return Err(Error::EmptySpace {
                n_states,
                n_actions,
            });
        }
        validate_hyperparameters(
            learning_rate,
            discount_factor,
            epsilon,
            epsilon_decay,
            min_epsilon,
        )?;

        Ok(Self {
            q_table: QTable::new(n_states, n_actions),
            values: ValueTable::new(n_states),
            model: TransitionModel::new(n_states, n_actions),
            learning_rate,
            discount_factor,
            epsilon,
            epsilon_decay,
            min_epsilon,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Seed the agent's random source for reproducible exploration
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_seed(seed);
        self
    }

    /// Reseed the agent's random source in place.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// Number of states in the space
    pub fn n_states(&self) -> usize {
        self.q_table.n_states()
    }

    /// Number of actions per state
    pub fn n_actions(&self) -> usize {
        self.q_table.n_actions()
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Learning rate α
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Discount factor γ
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Seed the random source was built from, if one was given
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Read access to the action-value table
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Read access to the state-value table
    pub fn state_values(&self) -> &ValueTable {
        &self.values
    }

    /// Read access to the estimated transition model
    pub fn model(&self) -> &TransitionModel {
        &self.model
    }

    fn check_state(&self, state: usize) -> Result<()> {
        if state >= self.n_states() {
            return Err(Error::StateOutOfRange {
                state,
                n_states: self.n_states(),
            });
        }
        Ok(())
    }

    fn check_action(&self, action: usize) -> Result<()> {
        if action >= self.n_actions() {
            return Err(Error::ActionOutOfRange {
                action,
                n_actions: self.n_actions(),
            });
        }
        Ok(())
    }

    /// ε-greedy action selection
    ///
    /// With `training` false this is the pure evaluation policy: the greedy
    /// action with ties broken toward the lowest index, consuming no
    /// randomness. With `training` true, one uniform sample gates between a
    /// uniformly random action (probability epsilon) and the greedy action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] for an out-of-range state.
    pub fn choose_action(&mut self, state: usize, training: bool) -> Result<usize> {
        self.check_state(state)?;
        if training && self.rng.random::<f64>() < self.epsilon {
            // Explore: uniform over the full action set
            return Ok(self.rng.random_range(0..self.n_actions()));
        }
        // Exploit: greedy over the Q row
        Ok(self.q_table.greedy_action(state))
    }

    /// Greedy action for a state, without touching the random source
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] for an out-of-range state.
    pub fn greedy_action(&self, state: usize) -> Result<usize> {
        self.check_state(state)?;
        Ok(self.q_table.greedy_action(state))
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// A `done` transition forces a zero bootstrap: the max over the next
    /// row is replaced by 0, so the target is the raw reward. Terminal rows
    /// themselves stay at zero forever because no episode continues out of a
    /// terminal state, which keeps planned and learned backups consistent.
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error if `state`, `action`, or `next_state`
    /// fall outside the configured space; the tables are untouched in that
    /// case.
    pub fn update_q(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
        done: bool,
    ) -> Result<()> {
        self.check_state(state)?;
        self.check_action(action)?;
        self.check_state(next_state)?;

        let current_q = self.q_table.get(state, action);
        let max_next_q = if done { 0.0 } else { self.q_table.max_q(next_state) };
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.q_table.set(state, action, new_q);
        Ok(())
    }

    /// Record one observed transition in the empirical model
    ///
    /// Increments the triplet's visit count and adds the reward to its sum,
    /// always together.
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error if `state`, `action`, or `next_state`
    /// fall outside the configured space; the model is untouched in that
    /// case.
    pub fn update_model(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
    ) -> Result<()> {
        self.check_state(state)?;
        self.check_action(action)?;
        self.check_state(next_state)?;

        self.model.record(state, action, reward, next_state);
        Ok(())
    }

    /// Feed one environment step to both learners
    ///
    /// Applies the Q-learning update and records the transition in the
    /// model, keeping the two in lockstep. This is the method the training
    /// loop calls once per step.
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for indices outside the configured
    /// space.
    pub fn observe(&mut self, state: usize, action: usize, transition: Transition) -> Result<()> {
        self.update_q(
            state,
            action,
            transition.reward,
            transition.next_state,
            transition.done,
        )?;
        self.update_model(state, action, transition.reward, transition.next_state)
    }

    /// Run value iteration over the estimated model
    ///
    /// Refines the state-value table until the largest per-sweep change
    /// drops below `theta` or `max_sweeps` is exhausted, then synchronizes
    /// Q-values for every observed pair. Hitting the cap is reported in the
    /// summary, not treated as an error.
    pub fn plan(&mut self, theta: f64, max_sweeps: usize) -> PlanningSummary {
        run_value_iteration(
            &self.model,
            self.discount_factor,
            &mut self.values,
            &mut self.q_table,
            theta,
            max_sweeps,
        )
    }

    /// Decay epsilon after an episode
    ///
    /// epsilon ← max(min_epsilon, epsilon · epsilon_decay). Called once per
    /// episode by the training loop; the sequence is monotonically
    /// non-increasing and bounded below by the floor.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
    }

    pub(crate) fn export_state(&self) -> AgentSnapshot {
        AgentSnapshot {
            n_states: self.n_states(),
            n_actions: self.n_actions(),
            q_values: self.q_table.values().to_vec(),
            state_values: self.values.values().to_vec(),
            transition_counts: self.model.counts().to_vec(),
            reward_sums: self.model.reward_sums().to_vec(),
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
            epsilon: self.epsilon,
            epsilon_decay: self.epsilon_decay,
            min_epsilon: self.min_epsilon,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(snapshot: AgentSnapshot) -> Result<Self> {
        let AgentSnapshot {
            n_states,
            n_actions,
            q_values,
            state_values,
            transition_counts,
            reward_sums,
            learning_rate,
            discount_factor,
            epsilon,
            epsilon_decay,
            min_epsilon,
            rng_seed,
        } = snapshot;

        if n_states == 0 || n_actions == 0 {
            return Err(Error::EmptySpace {
                n_states,
                n_actions,
            });
        }
        validate_hyperparameters(
            learning_rate,
            discount_factor,
            epsilon,
            epsilon_decay,
            min_epsilon,
        )?;

        let check_len = |table: &str, found: usize, expected: usize| -> Result<()> {
            if found != expected {
                return Err(Error::SnapshotShapeMismatch {
                    table: table.to_string(),
                    expected,
                    found,
                });
            }
            Ok(())
        };
        check_len("q_values", q_values.len(), n_states * n_actions)?;
        check_len("state_values", state_values.len(), n_states)?;
        let triplets = n_states * n_actions * n_states;
        check_len("transition_counts", transition_counts.len(), triplets)?;
        check_len("reward_sums", reward_sums.len(), triplets)?;

        Ok(Self {
            q_table: QTable::from_parts(n_states, n_actions, q_values),
            values: ValueTable::from_parts(state_values),
            model: TransitionModel::from_parts(n_states, n_actions, transition_counts, reward_sums),
            learning_rate,
            discount_factor,
            epsilon,
            epsilon_decay,
            min_epsilon,
            rng: build_rng(rng_seed),
            rng_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_agent() -> DynaAgent {
        DynaAgent::new(4, 3, 0.5, 0.99, 0.5, 0.995, 0.01)
            .unwrap()
            .with_seed(7)
    }

    #[test]
    fn test_rejects_empty_spaces() {
        assert!(matches!(
            DynaAgent::new(0, 3, 0.5, 0.9, 0.5, 0.99, 0.01),
            Err(Error::EmptySpace { .. })
        ));
        assert!(matches!(
            DynaAgent::new(4, 0, 0.5, 0.9, 0.5, 0.99, 0.01),
            Err(Error::EmptySpace { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_hyperparameters() {
        // learning rate must sit in (0, 1]
        assert!(DynaAgent::new(2, 2, 0.0, 0.9, 0.5, 0.99, 0.01).is_err());
        assert!(DynaAgent::new(2, 2, 1.5, 0.9, 0.5, 0.99, 0.01).is_err());
        assert!(DynaAgent::new(2, 2, f64::NAN, 0.9, 0.5, 0.99, 0.01).is_err());
        // discount must sit in [0, 1)
        assert!(DynaAgent::new(2, 2, 0.5, 1.0, 0.5, 0.99, 0.01).is_err());
        assert!(DynaAgent::new(2, 2, 0.5, -0.1, 0.5, 0.99, 0.01).is_err());
        // epsilon cannot undercut its floor or exceed 1
        assert!(DynaAgent::new(2, 2, 0.5, 0.9, 0.005, 0.99, 0.01).is_err());
        assert!(DynaAgent::new(2, 2, 0.5, 0.9, 1.2, 0.99, 0.01).is_err());
        // decay must sit in (0, 1]
        assert!(DynaAgent::new(2, 2, 0.5, 0.9, 0.5, 0.0, 0.01).is_err());

        assert!(DynaAgent::new(2, 2, 1.0, 0.0, 1.0, 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_boundary_rejects_bad_indices() {
        let mut agent = test_agent();
        assert!(matches!(
            agent.choose_action(4, true),
            Err(Error::StateOutOfRange { state: 4, .. })
        ));
        assert!(matches!(
            agent.update_q(0, 3, 1.0, 1, false),
            Err(Error::ActionOutOfRange { action: 3, .. })
        ));
        assert!(matches!(
            agent.update_model(0, 0, 1.0, 9),
            Err(Error::StateOutOfRange { state: 9, .. })
        ));
        // Nothing was recorded by the rejected calls
        assert_eq!(agent.model().pair_count(0, 0), 0);
        assert_eq!(agent.q_table().get(0, 0), 0.0);
    }

    #[test]
    fn test_update_q_with_full_step_and_no_discount_copies_reward() {
        let mut agent = DynaAgent::new(3, 2, 1.0, 0.0, 0.1, 0.9, 0.1).unwrap();
        agent.update_q(0, 1, -2.5, 2, false).unwrap();
        assert_eq!(agent.q_table().get(0, 1), -2.5);
    }

    #[test]
    fn test_update_q_bootstraps_from_next_row_maximum() {
        let mut agent = test_agent();
        agent.update_q(1, 0, 2.0, 1, true).unwrap(); // plant Q(1,0) = 1.0
        assert!((agent.q_table().get(1, 0) - 1.0).abs() < 1e-12);

        // Q(0,2) = 0 + 0.5 * (0 + 0.99 * 1.0 - 0) = 0.495
        agent.update_q(0, 2, 0.0, 1, false).unwrap();
        assert!((agent.q_table().get(0, 2) - 0.495).abs() < 1e-12);
    }

    #[test]
    fn test_done_forces_zero_bootstrap() {
        let mut agent = test_agent();
        agent.update_q(1, 0, 50.0, 1, true).unwrap(); // make the next row tempting

        agent.update_q(0, 0, 1.0, 1, true).unwrap();
        // 0 + 0.5 * (1.0 + 0 - 0): the 25.0 in the next row must not leak in
        assert!((agent.q_table().get(0, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_mode_consumes_no_randomness() {
        let mut probe = test_agent();
        let mut control = test_agent();

        // Greedy queries on one agent only
        for _ in 0..25 {
            probe.choose_action(2, false).unwrap();
        }

        // Both agents now produce identical training-mode streams
        for _ in 0..50 {
            assert_eq!(
                probe.choose_action(1, true).unwrap(),
                control.choose_action(1, true).unwrap()
            );
        }
    }

    #[test]
    fn test_choose_action_exploits_when_epsilon_is_zero() {
        let mut agent = DynaAgent::new(2, 3, 0.5, 0.9, 0.0, 1.0, 0.0)
            .unwrap()
            .with_seed(3);
        agent.update_q(0, 2, 1.0, 1, true).unwrap();
        for _ in 0..20 {
            assert_eq!(agent.choose_action(0, true).unwrap(), 2);
        }
    }

    #[test]
    fn test_choose_action_explores_when_epsilon_is_one() {
        let mut agent = DynaAgent::new(2, 3, 0.5, 0.9, 1.0, 1.0, 0.05)
            .unwrap()
            .with_seed(11);
        agent.update_q(0, 2, 100.0, 1, true).unwrap();

        let mut seen = [false; 3];
        for _ in 0..200 {
            let action = agent.choose_action(0, true).unwrap();
            seen[action] = true;
        }
        assert_eq!(seen, [true, true, true], "uniform draws should cover all actions");
    }

    #[test]
    fn test_epsilon_decay_follows_the_clamped_geometric_sequence() {
        let mut agent = DynaAgent::new(2, 2, 0.5, 0.9, 1.0, 0.9, 0.05).unwrap();
        for k in 1..=40 {
            agent.decay_epsilon();
            let expected = (0.9f64.powi(k)).max(0.05);
            assert!(
                (agent.epsilon() - expected).abs() < 1e-12,
                "after {k} decays expected {expected}, got {}",
                agent.epsilon()
            );
        }
        assert_eq!(agent.epsilon(), 0.05, "sequence must clamp at the floor");
    }

    #[test]
    fn test_observe_updates_q_and_model_in_lockstep() {
        let mut agent = test_agent();
        let step = Transition {
            next_state: 2,
            reward: 1.0,
            done: false,
        };
        agent.observe(0, 1, step).unwrap();

        assert_eq!(agent.model().count(0, 1, 2), 1);
        assert!((agent.model().reward_sum(0, 1, 2) - 1.0).abs() < 1e-12);
        assert!((agent.q_table().get(0, 1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_plan_refines_values_from_the_model() {
        let mut agent = DynaAgent::new(3, 1, 0.5, 0.9, 0.1, 0.9, 0.1).unwrap();
        agent.update_model(0, 0, 0.0, 1).unwrap();
        agent.update_model(1, 0, 1.0, 2).unwrap();

        let summary = agent.plan(1e-10, 50);
        assert!(summary.converged);
        assert!((agent.state_values().get(0) - 0.9).abs() < 1e-9);
        assert!((agent.state_values().get(1) - 1.0).abs() < 1e-9);
        assert_eq!(agent.state_values().get(2), 0.0);
        assert!((agent.q_table().get(0, 0) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_plan_leaves_model_free_only_entries_alone() {
        let mut agent = DynaAgent::new(3, 2, 1.0, 0.9, 0.1, 0.9, 0.1).unwrap();
        // Learned through TD only; the model never saw this pair
        agent.update_q(2, 1, 4.0, 0, true).unwrap();
        // The model saw a different pair
        agent.update_model(0, 0, 1.0, 1).unwrap();

        agent.plan(1e-10, 50);
        assert_eq!(agent.q_table().get(2, 1), 4.0);
    }

    #[test]
    fn test_snapshot_round_trips_through_export() {
        let mut agent = test_agent();
        agent.observe(0, 1, Transition { next_state: 2, reward: 0.5, done: false }).unwrap();
        agent.observe(2, 0, Transition { next_state: 3, reward: 1.0, done: true }).unwrap();
        agent.plan(1e-8, 20);
        agent.decay_epsilon();

        let restored = DynaAgent::from_state(agent.export_state()).unwrap();
        assert_eq!(restored.q_table(), agent.q_table());
        assert_eq!(restored.state_values(), agent.state_values());
        assert_eq!(restored.model(), agent.model());
        assert_eq!(restored.epsilon(), agent.epsilon());
        assert_eq!(restored.rng_seed(), agent.rng_seed());
    }

    #[test]
    fn test_from_state_rejects_mismatched_shapes() {
        let agent = test_agent();
        let mut snapshot = agent.export_state();
        snapshot.q_values.pop();
        match DynaAgent::from_state(snapshot) {
            Err(Error::SnapshotShapeMismatch { table, expected, found }) => {
                assert_eq!(table, "q_values");
                assert_eq!(expected, 12);
                assert_eq!(found, 11);
            }
            other => panic!("expected shape mismatch, got {other:?}"),
        }
    }
}
