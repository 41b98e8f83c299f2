//! MessagePack implementation of agent repository.
//!
//! This adapter implements the AgentRepository port using rmp_serde for
//! compact binary serialization.

use std::{fs::File, path::Path};

use crate::{Result, dyna::SavedAgent, error::Error, ports::AgentRepository};

/// MessagePack-based agent repository.
///
/// Provides persistent storage using the MessagePack binary format via rmp_serde.
/// This format offers good compression and fast serialization/deserialization.
///
/// # Examples
///
/// ```no_run
/// use dynaq::adapters::MsgPackRepository;
/// use dynaq::dyna::{DynaAgent, SavedAgent, TrainingMetadata};
/// use dynaq::ports::AgentRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let agent = DynaAgent::new(16, 4, 0.1, 0.99, 1.0, 0.995, 0.05)?;
/// let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
///
/// // Save agent
/// repo.save(&saved, Path::new("trained.msgpack"))?;
///
/// // Load agent
/// let loaded = repo.load(Path::new("trained.msgpack"))?;
/// # Ok::<(), dynaq::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl AgentRepository for MsgPackRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        rmp_serde::encode::write(&mut file, agent).map_err(|e| Error::SerializationContext {
            operation: "serialize agent to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let agent = rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
            operation: "deserialize agent from MessagePack".to_string(),
            message: e.to_string(),
        })?;

        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::dyna::{DynaAgent, TrainingMetadata};

    fn sample_agent() -> DynaAgent {
        let mut agent = DynaAgent::new(3, 2, 0.5, 0.9, 1.0, 0.9, 0.05).unwrap();
        agent.update_q(0, 1, 1.0, 2, true).unwrap();
        agent.update_model(0, 1, 1.0, 2).unwrap();
        agent
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test_agent.msgpack");

        let repo = MsgPackRepository::new();
        let agent = sample_agent();
        let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());

        repo.save(&saved, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        let restored = loaded.to_agent().expect("Failed to rebuild agent");
        assert_eq!(agent.q_table().values(), restored.q_table().values());
        assert_eq!(agent.model().counts(), restored.model().counts());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.load(Path::new("/tmp/nonexistent_12345.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = MsgPackRepository::new();
        let saved = SavedAgent::from_agent(&sample_agent(), TrainingMetadata::default());
        let result = repo.save(&saved, Path::new("/invalid_dir_12345/file.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_garbage_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("garbage.msgpack");
        std::fs::write(&file_path, b"not msgpack at all").unwrap();

        let repo = MsgPackRepository::new();
        let result = repo.load(&file_path);
        assert!(matches!(
            result,
            Err(Error::SerializationContext { .. })
        ));
    }
}
