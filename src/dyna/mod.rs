//! Dyna-style tabular reinforcement learning
//!
//! This module implements the agent core: Q-learning from direct experience,
//! an empirical transition/reward model accumulated from the same experience,
//! and synchronous value iteration over that model. Combining the two signals
//! lets sparse real experience go further than either alone.
//!
//! ## Learning signals
//!
//! | Signal | Source | Writes |
//! |--------|--------|--------|
//! | Model-free (Q-learning) | each observed step | one Q entry per step |
//! | Model-based (value iteration) | accumulated model | V, then Q for observed pairs |
//!
//! ## Usage Example
//!
//! ```no_run
//! use dynaq::{dyna::DynaAgent, types::Transition};
//!
//! let mut agent = DynaAgent::new(
//!     16,    // n_states
//!     4,     // n_actions
//!     0.1,   // learning_rate
//!     0.99,  // discount_factor
//!     1.0,   // epsilon
//!     0.995, // epsilon_decay
//!     0.05,  // min_epsilon
//! )?
//! .with_seed(42);
//!
//! // One environment step feeds both learners
//! let action = agent.choose_action(0, true)?;
//! agent.observe(
//!     0,
//!     action,
//!     Transition { next_state: 1, reward: 0.0, done: false },
//! )?;
//!
//! // Periodic planning refines values from everything observed so far
//! let summary = agent.plan(1e-8, 100);
//! assert!(summary.sweeps <= 100);
//!
//! // Episode boundary
//! agent.decay_epsilon();
//! # Ok::<(), dynaq::Error>(())
//! ```

pub mod agent;
pub mod model;
pub mod planner;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::DynaAgent;
pub use model::{Outcome, TransitionModel};
pub use planner::PlanningSummary;
pub use q_table::{QTable, ValueTable};
pub use serialization::{SavedAgent, TrainingMetadata};
