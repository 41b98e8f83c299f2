//! Configuration types for agent creation.

use crate::types::defaults;

/// Configuration for creating a Dyna agent.
///
/// This type provides a type-safe, builder-style API for configuring agents
/// before creation through the dependency injection container.
///
/// # Examples
///
/// ```
/// use dynaq::app::AgentConfig;
///
/// let config = AgentConfig::new(16, 4)
///     .with_learning_rate(0.5)
///     .with_discount_factor(0.9)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Number of states in the environment
    pub n_states: usize,
    /// Number of actions per state
    pub n_actions: usize,
    /// Learning rate (alpha)
    pub learning_rate: f64,
    /// Discount factor (gamma)
    pub discount_factor: f64,
    /// Initial exploration rate (epsilon)
    pub epsilon: f64,
    /// Multiplicative epsilon decay applied once per episode
    pub epsilon_decay: f64,
    /// Exploration floor
    pub min_epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a new agent configuration for the given space dimensions.
    ///
    /// Uses default values for all hyperparameters:
    /// - Learning rate: `0.1`
    /// - Discount factor: `0.99`
    /// - Epsilon: `1.0` decaying by `0.995` down to `0.05`
    /// - Seed: None (non-deterministic)
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self {
            n_states,
            n_actions,
            learning_rate: defaults::LEARNING_RATE,
            discount_factor: defaults::DISCOUNT_FACTOR,
            epsilon: defaults::EPSILON,
            epsilon_decay: defaults::EPSILON_DECAY,
            min_epsilon: defaults::MIN_EPSILON,
            seed: None,
        }
    }

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the initial exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the per-episode epsilon decay factor.
    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    /// Set the exploration floor.
    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
