//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or metrics.

use crate::{
    Result,
    dyna::PlanningSummary,
    types::{EpisodeSummary, Transition},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - CSV learning curves for plotting
/// - Aggregate metrics for evaluation
///
/// # Design Philosophy
///
/// This trait represents a **port** in hexagonal architecture - a boundary
/// between the training pipeline and external observation mechanisms.
/// Different observation strategies are **adapters** that implement this port.
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each environment step, after learning updates
///    - `on_planning(...)` - After planning sweeps (only when the planner ran)
///    - `on_episode_end(episode, summary)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use dynaq::{
///     ports::Observer,
///     types::EpisodeSummary,
/// };
///
/// struct CustomObserver {
///     episode_count: usize,
/// }
///
/// impl Observer for CustomObserver {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _summary: &EpisodeSummary,
///     ) -> dynaq::Result<()> {
///         self.episode_count += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// This is the first method called in the observation lifecycle.
    ///
    /// # Parameters
    ///
    /// * `total_episodes` - Total number of episodes that will be run
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the episode (0-based)
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to reset per-episode state.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each environment step.
    ///
    /// This method is invoked after the step has been applied to the
    /// value estimates and the model.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step` - Step number within the episode (0-based)
    /// * `state` - State the action was taken from
    /// * `action` - Action that was taken
    /// * `transition` - Resulting state, reward, and terminal flag
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to observe individual interactions.
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: usize,
        _action: usize,
        _transition: &Transition,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after a planning pass completes.
    ///
    /// This method is optional and only called on episodes where the
    /// pipeline invoked the planner. It allows observers to track sweep
    /// counts and convergence behavior.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `summary` - Sweep count, residual, and convergence flag
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to observe planning behavior.
    fn on_planning(&mut self, _episode: usize, _summary: &PlanningSummary) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends.
    ///
    /// This method is invoked after epsilon has been decayed for the
    /// episode, so `summary.epsilon` reports the rate the episode was
    /// actually played with.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the completed episode
    /// * `summary` - Step count, return, and exploration rate
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to record episode outcomes.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// This is the last method called in the observation lifecycle.
    /// Use this to finalize outputs, close files, or display summaries.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to perform cleanup or final reporting.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
