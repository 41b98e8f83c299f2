//! Built-in environments.
//!
//! Anything implementing [`crate::ports::Environment`] can drive training;
//! this module ships a slippery grid world parsed from ASCII maps, which is
//! enough to exercise every part of the agent.

pub mod grid;

pub use grid::{Cell, GridWorld};
