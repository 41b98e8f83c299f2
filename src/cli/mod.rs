//! CLI infrastructure for the dynaq toolkit
//!
//! This module provides the command-line interface for training and
//! evaluating tabular Dyna agents on grid environments.

pub mod commands;
