//! Shared domain types for the agent/environment contract.

use serde::{Deserialize, Serialize};

/// One observed interaction step, as returned by an environment.
///
/// This is the entire contract between the agent and its environment:
/// a resulting state id, a scalar reward, and a terminal flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// State the environment landed in.
    pub next_state: usize,
    /// Reward emitted for the step.
    pub reward: f64,
    /// Whether the episode ended on this step.
    pub done: bool,
}

/// Per-episode totals reported to observers and training curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Zero-based episode index.
    pub episode: usize,
    /// Steps taken before the episode ended or hit the step cap.
    pub steps: usize,
    /// Sum of rewards collected over the episode.
    pub total_reward: f64,
    /// Exploration rate in effect while the episode ran.
    pub epsilon: f64,
}

/// Default hyperparameters shared by `AgentConfig` and the CLI flags.
pub mod defaults {
    /// Default learning rate (alpha).
    pub const LEARNING_RATE: f64 = 0.1;

    /// Default discount factor (gamma).
    pub const DISCOUNT_FACTOR: f64 = 0.99;

    /// Default initial exploration rate (epsilon).
    pub const EPSILON: f64 = 1.0;

    /// Default multiplicative epsilon decay, applied once per episode.
    pub const EPSILON_DECAY: f64 = 0.995;

    /// Default exploration floor.
    pub const MIN_EPSILON: f64 = 0.05;

    /// Default convergence threshold for planning sweeps.
    pub const PLAN_THETA: f64 = 1e-8;

    /// Default sweep cap for one planning invocation.
    pub const PLAN_MAX_SWEEPS: usize = 100;
}
