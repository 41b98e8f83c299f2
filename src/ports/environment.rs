//! Environment port - the four-tuple interaction contract.
//!
//! The agent core needs exactly this much from a world: space dimensions, a
//! starting state per episode, and one (next_state, reward, done) triple per
//! action. State and action ids are plain indices; the agent interprets no
//! structure inside them.

use crate::{Result, types::Transition};

/// Port for discrete environments driven one step at a time.
///
/// Implementations own whatever simulation state they need; the training
/// pipeline only ever calls `reset` at episode starts and `step` once per
/// chosen action. Stepping a finished episode is a contract violation and
/// should fail rather than silently continue.
///
/// # Examples
///
/// ```
/// use dynaq::{Result, ports::Environment, types::Transition};
///
/// /// Three cells in a row; walking right ends the episode at the last one.
/// struct Corridor {
///     pos: usize,
/// }
///
/// impl Environment for Corridor {
///     fn n_states(&self) -> usize {
///         3
///     }
///
///     fn n_actions(&self) -> usize {
///         1
///     }
///
///     fn reset(&mut self) -> usize {
///         self.pos = 0;
///         self.pos
///     }
///
///     fn step(&mut self, _action: usize) -> Result<Transition> {
///         self.pos += 1;
///         Ok(Transition {
///             next_state: self.pos,
///             reward: 0.0,
///             done: self.pos == 2,
///         })
///     }
/// }
///
/// let mut env = Corridor { pos: 0 };
/// assert_eq!(env.reset(), 0);
/// ```
pub trait Environment {
    /// Number of distinct states.
    fn n_states(&self) -> usize;

    /// Number of actions available in every state.
    fn n_actions(&self) -> usize;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> usize;

    /// Apply one action to the current state.
    ///
    /// # Errors
    ///
    /// Implementations return an error for an out-of-range action or when
    /// stepped after the episode has already ended.
    fn step(&mut self, action: usize) -> Result<Transition>;

    /// Short human-readable name for reports and metadata.
    ///
    /// # Default Implementation
    ///
    /// Returns `"environment"`. Override to identify concrete worlds.
    fn name(&self) -> &str {
        "environment"
    }
}
