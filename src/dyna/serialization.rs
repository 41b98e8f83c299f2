//! Serialization support for trained agents.
//!
//! Snapshots carry the agent's full learned state as raw vectors plus the
//! dimensions and hyperparameters they were produced under, wrapped in a
//! versioned envelope. Loading validates the version and every table length
//! before an agent is reconstructed; nothing is ever reshaped or truncated.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::agent::DynaAgent;

/// Full internal state of an agent, as stored on disk
///
/// Kept as raw vectors rather than the in-memory table types so the wire
/// format stays independent of internal layout and load-time shape checks
/// are exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentSnapshot {
    pub n_states: usize,
    pub n_actions: usize,
    /// Q-values, row-major `state * n_actions + action`
    pub q_values: Vec<f64>,
    /// State values, indexed by state
    pub state_values: Vec<f64>,
    /// Model visit counts, triplet-major
    pub transition_counts: Vec<u64>,
    /// Model reward sums, in lockstep with the counts
    pub reward_sums: Vec<f64>,
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    pub rng_seed: Option<u64>,
}

/// Metadata about the training process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained
    pub episodes_trained: Option<usize>,
    /// Environment the agent was trained in
    pub environment: Option<String>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Timestamp when saved
    pub saved_at: Option<String>,
}

/// Serializable representation of a trained agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    /// Version of the save format (for future compatibility)
    pub version: u32,
    snapshot: AgentSnapshot,
    /// Training metadata
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    /// Current save format version
    pub const VERSION: u32 = 1;

    /// Create from a trained agent
    pub fn from_agent(agent: &DynaAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            snapshot: agent.export_state(),
            metadata,
        }
    }

    /// Reconstruct the agent this snapshot was taken from
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedSnapshotVersion`] for an unknown format
    /// version and [`Error::SnapshotShapeMismatch`] when any table length
    /// disagrees with the recorded dimensions.
    pub fn to_agent(&self) -> Result<DynaAgent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                found: self.version,
                supported: Self::VERSION,
            });
        }
        DynaAgent::from_state(self.snapshot.clone())
    }
}
