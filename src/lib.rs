//! Tabular Dyna-style reinforcement learning
//!
//! This crate provides:
//! - A Dyna agent combining Q-learning with value-iteration planning over an
//!   empirically estimated transition model
//! - A slippery grid world environment parsed from ASCII maps
//! - Training and evaluation pipelines with composable observers
//! - Versioned agent persistence behind a repository port

pub mod adapters;
pub mod app;
pub mod cli;
pub mod dyna;
pub mod env;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod types;

pub use dyna::{
    DynaAgent, Outcome, PlanningSummary, QTable, SavedAgent, TrainingMetadata, TransitionModel,
    ValueTable,
};
pub use env::GridWorld;
pub use error::{Error, Result};
pub use types::{EpisodeSummary, Transition};
