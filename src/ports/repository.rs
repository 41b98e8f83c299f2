//! Repository port for agent persistence.
//!
//! This module defines the trait boundary between the domain and infrastructure
//! layers for agent storage and retrieval.

use std::path::Path;

use crate::{Result, dyna::SavedAgent};

/// Port for persisting and loading saved agents.
///
/// This trait abstracts the storage mechanism, allowing different implementations
/// (MessagePack, in-memory, database, etc.) without coupling the domain logic to
/// specific serialization formats.
///
/// # Examples
///
/// ```no_run
/// use dynaq::ports::AgentRepository;
/// use dynaq::dyna::SavedAgent;
/// use std::path::Path;
///
/// fn save_agent<R: AgentRepository>(
///     repo: &R,
///     agent: &SavedAgent,
///     path: &Path,
/// ) -> dynaq::Result<()> {
///     repo.save(agent, path)
/// }
/// ```
pub trait AgentRepository {
    /// Save an agent to persistent storage.
    ///
    /// # Arguments
    ///
    /// * `agent` - The versioned agent envelope to save
    /// * `path` - The location where the agent should be saved
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path cannot be created or written to
    /// - Serialization fails
    /// - I/O errors occur during writing
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()>;

    /// Load an agent from persistent storage.
    ///
    /// # Arguments
    ///
    /// * `path` - The location from which to load the agent
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The file format is invalid or corrupted
    /// - Deserialization fails
    fn load(&self, path: &Path) -> Result<SavedAgent>;
}
