//! In-memory agent repository for testing.
//!
//! This adapter provides a pure in-memory implementation of AgentRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{Result, dyna::SavedAgent, error::Error, ports::AgentRepository};

/// In-memory repository for testing.
///
/// Stores agents in memory using a shared HashMap, avoiding file system I/O
/// entirely. Perfect for fast, isolated tests.
///
/// # Examples
///
/// ```
/// use dynaq::adapters::InMemoryRepository;
/// use dynaq::dyna::{DynaAgent, SavedAgent, TrainingMetadata};
/// use dynaq::ports::AgentRepository;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let agent = DynaAgent::new(16, 4, 0.1, 0.99, 1.0, 0.995, 0.05)?;
/// let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
///
/// // Save to "memory" (not disk)
/// repo.save(&saved, Path::new("test_agent"))?;
///
/// // Load from "memory"
/// let loaded = repo.load(Path::new("test_agent"))?;
/// # Ok::<(), dynaq::Error>(())
/// ```
///
/// # Thread Safety
///
/// This repository is thread-safe and can be safely cloned and shared across
/// threads. All clones share the same underlying storage.
#[derive(Clone)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the number of agents currently stored.
    ///
    /// Useful for testing to verify save operations occurred.
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    /// Clear all stored agents.
    ///
    /// Useful for resetting state between tests.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }

    /// Check if an agent exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        let key = path.to_string_lossy().to_string();
        self.storage.lock().unwrap().contains_key(&key)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRepository for InMemoryRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec(agent).map_err(|e| Error::SerializationContext {
            operation: "serialize agent for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage.lock().unwrap().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage.lock().unwrap();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load agent from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize agent from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}
