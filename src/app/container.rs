//! Dependency injection container for the dynaq application.
//!
//! This module provides centralized dependency management following hexagonal
//! architecture principles. The container owns infrastructure dependencies and
//! provides factory methods for creating domain objects.

use std::{path::Path, sync::Arc};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    dyna::{DynaAgent, SavedAgent, TrainingMetadata},
    ports::AgentRepository,
};

/// Application with dependency injection.
///
/// Centralizes creation and wiring of dependencies following hexagonal architecture.
/// All infrastructure dependencies are owned by the app and injected into
/// domain objects and use cases.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use dynaq::app::{AgentConfig, App};
///
/// let app = App::new();
///
/// let config = AgentConfig::new(16, 4).with_seed(42);
/// let agent = app.create_agent(&config)?;
/// # Ok::<(), dynaq::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use dynaq::app::App;
/// use dynaq::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for agent persistence
    agent_repository: Arc<dyn AgentRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for agent persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            agent_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    ///
    /// Primarily used for testing with mock/in-memory dependencies.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynaq::app::App;
    /// use dynaq::adapters::InMemoryRepository;
    ///
    /// let app = App::for_testing()
    ///     .with_repository(InMemoryRepository::new())
    ///     .with_default_seed(42)
    ///     .build();
    /// ```
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the agent repository.
    ///
    /// Returns an Arc-wrapped repository that can be shared across threads.
    pub fn agent_repository(&self) -> Arc<dyn AgentRepository + Send + Sync> {
        Arc::clone(&self.agent_repository)
    }

    /// Create a new Dyna agent with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Agent configuration including space dimensions, learning
    ///   hyperparameters, and seed
    ///
    /// # Errors
    ///
    /// Returns an error if the space is empty or a hyperparameter falls
    /// outside its valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynaq::app::{AgentConfig, App};
    ///
    /// let app = App::new();
    ///
    /// let config = AgentConfig::new(16, 4)
    ///     .with_learning_rate(0.5)
    ///     .with_seed(42);
    ///
    /// let agent = app.create_agent(&config)?;
    /// # Ok::<(), dynaq::Error>(())
    /// ```
    pub fn create_agent(&self, config: &AgentConfig) -> Result<DynaAgent> {
        let mut agent = DynaAgent::new(
            config.n_states,
            config.n_actions,
            config.learning_rate,
            config.discount_factor,
            config.epsilon,
            config.epsilon_decay,
            config.min_epsilon,
        )?;

        // Apply seed from config or use container default
        if let Some(seed) = config.seed.or(self.default_seed) {
            agent.set_seed(seed);
        }

        Ok(agent)
    }

    /// Load an agent from persistent storage.
    ///
    /// Uses the configured repository to load the saved envelope and rebuilds
    /// the agent from it, preserving all learned estimates and hyperparameters.
    /// A container default seed, if configured, overrides the saved seed.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the saved agent file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, carries an unsupported
    /// version, or fails shape validation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dynaq::app::App;
    /// use std::path::Path;
    ///
    /// let app = App::new();
    /// let agent = app.load_agent(Path::new("trained_agent.msgpack"))?;
    /// # Ok::<(), dynaq::Error>(())
    /// ```
    pub fn load_agent(&self, path: &Path) -> Result<DynaAgent> {
        let saved = self.agent_repository.load(path)?;
        let mut agent = saved.to_agent()?;

        // Apply default seed if configured
        if let Some(seed) = self.default_seed {
            agent.set_seed(seed);
        }

        Ok(agent)
    }

    /// Load the saved envelope without rebuilding the agent.
    ///
    /// Useful when the caller wants the training metadata alongside the
    /// agent state.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialized.
    pub fn load_saved(&self, path: &Path) -> Result<SavedAgent> {
        self.agent_repository.load(path)
    }

    /// Save an agent to persistent storage.
    ///
    /// Uses the configured repository to persist the agent's complete state
    /// together with the given training metadata.
    ///
    /// # Arguments
    ///
    /// * `agent` - The agent to save
    /// * `metadata` - Training provenance stored alongside the agent
    /// * `path` - Path where the agent should be saved
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dynaq::app::{AgentConfig, App};
    /// use dynaq::dyna::TrainingMetadata;
    /// use std::path::Path;
    ///
    /// let app = App::new();
    /// let config = AgentConfig::new(16, 4);
    /// let agent = app.create_agent(&config)?;
    ///
    /// // Train the agent...
    ///
    /// app.save_agent(&agent, TrainingMetadata::default(), Path::new("trained_agent.msgpack"))?;
    /// # Ok::<(), dynaq::Error>(())
    /// ```
    pub fn save_agent(
        &self,
        agent: &DynaAgent,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let saved = SavedAgent::from_agent(agent, metadata);
        self.agent_repository.save(&saved, path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject mock repositories and control randomness.
///
/// # Examples
///
/// ```
/// use dynaq::app::AppBuilder;
/// use dynaq::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct AppBuilder {
    agent_repository: Option<Arc<dyn AgentRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            agent_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom agent repository.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynaq::app::AppBuilder;
    /// use dynaq::adapters::InMemoryRepository;
    ///
    /// let builder = AppBuilder::new()
    ///     .with_repository(InMemoryRepository::new());
    /// ```
    pub fn with_repository<R: AgentRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.agent_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all agents created by this container.
    ///
    /// Useful for creating deterministic tests.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynaq::app::AppBuilder;
    ///
    /// let builder = AppBuilder::new()
    ///     .with_default_seed(42);  // All agents will use seed 42
    /// ```
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            agent_repository: self
                .agent_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
