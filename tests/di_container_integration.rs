//! Integration tests for dependency injection.
//!
//! These tests demonstrate the benefits of the DI app:
//! - Easy testing with in-memory repositories (no file I/O)
//! - Deterministic behavior with fixed seeds
//! - Centralized dependency management

use std::path::Path;

use dynaq::{
    Transition,
    adapters::InMemoryRepository,
    app::{AgentConfig, App},
    dyna::TrainingMetadata,
};

#[test]
fn test_app_with_in_memory_repository() {
    // Create app with in-memory repository (no disk I/O!)
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .with_default_seed(42)
        .build();

    // Create an agent
    let config = AgentConfig::new(16, 4);
    let mut agent = app.create_agent(&config).unwrap();

    // Train the agent a bit
    agent
        .observe(
            0,
            2,
            Transition {
                next_state: 1,
                reward: 0.0,
                done: false,
            },
        )
        .unwrap();
    agent.plan(1e-8, 10);

    // Save to "memory" (not disk)
    let path = Path::new("test_agent");
    app.save_agent(&agent, TrainingMetadata::default(), path)
        .unwrap();

    // Load from "memory"
    let loaded_agent = app.load_agent(path).unwrap();

    // Both agents should carry the same learned state
    assert_eq!(agent.q_table(), loaded_agent.q_table());
    assert_eq!(agent.model(), loaded_agent.model());
}

#[test]
fn test_deterministic_creation_with_seed() {
    // Two apps with same seed should produce identical agents
    let config = AgentConfig::new(16, 4).with_seed(42);

    let app1 = App::for_testing().build();
    let app2 = App::for_testing().build();

    let mut agent1 = app1.create_agent(&config).unwrap();
    let mut agent2 = app2.create_agent(&config).unwrap();

    // Exploration draws from both agents must line up
    let picks1: Vec<usize> = (0..20)
        .map(|_| agent1.choose_action(0, true).unwrap())
        .collect();
    let picks2: Vec<usize> = (0..20)
        .map(|_| agent2.choose_action(0, true).unwrap())
        .collect();
    assert_eq!(picks1, picks2);
}

#[test]
fn test_app_default_seed_propagates() {
    // App with default seed
    let app = App::for_testing().with_default_seed(123).build();

    let config = AgentConfig::new(8, 2); // No seed in config
    let agent = app.create_agent(&config).unwrap();

    assert_eq!(agent.rng_seed(), Some(123));
}

#[test]
fn test_config_seed_overrides_app_default() {
    let app = App::for_testing().with_default_seed(42).build();

    // Config seed should override
    let config = AgentConfig::new(8, 2).with_seed(999);
    let agent = app.create_agent(&config).unwrap();

    assert_eq!(agent.rng_seed(), Some(999));
}

#[test]
fn test_multiple_agents_from_same_app() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();

    // Create multiple agents with different configurations
    let agent1 = app
        .create_agent(&AgentConfig::new(16, 4).with_seed(1))
        .unwrap();
    let agent2 = app
        .create_agent(
            &AgentConfig::new(64, 4)
                .with_seed(2)
                .with_learning_rate(0.5)
                .with_epsilon(0.2),
        )
        .unwrap();

    assert_eq!(agent1.n_states(), 16);
    assert_eq!(agent2.n_states(), 64);
    assert_eq!(agent2.learning_rate(), 0.5);
    assert_eq!(agent2.epsilon(), 0.2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let app = App::for_testing().build();

    // Zero-sized state space
    assert!(app.create_agent(&AgentConfig::new(0, 4)).is_err());

    // Out-of-range learning rate
    let config = AgentConfig::new(16, 4).with_learning_rate(1.5);
    assert!(app.create_agent(&config).is_err());
}

#[test]
fn test_in_memory_repository_isolation() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing().with_repository(repo.clone()).build();

    let config = AgentConfig::new(16, 4).with_seed(42);
    let agent = app.create_agent(&config).unwrap();

    // Initially no agents stored
    assert_eq!(repo.count(), 0);

    // Save
    app.save_agent(&agent, TrainingMetadata::default(), Path::new("agent1"))
        .unwrap();
    assert_eq!(repo.count(), 1);

    // Save another
    app.save_agent(&agent, TrainingMetadata::default(), Path::new("agent2"))
        .unwrap();
    assert_eq!(repo.count(), 2);

    // Clear
    repo.clear();
    assert_eq!(repo.count(), 0);
}

#[test]
fn test_load_agent_preserves_learned_state() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(42)
        .build();

    // Create and train an agent
    let config = AgentConfig::new(16, 4).with_seed(123);
    let mut agent = app.create_agent(&config).unwrap();

    // A few updates to make the learned state distinctive
    agent.update_q(0, 2, 1.0, 1, false).unwrap();
    agent.update_q(1, 3, -0.5, 2, true).unwrap();
    agent.update_model(0, 2, 1.0, 1).unwrap();

    // Save the agent
    let path = Path::new("trained_agent");
    app.save_agent(&agent, TrainingMetadata::default(), path)
        .unwrap();
    assert_eq!(repo.count(), 1, "Repository should contain saved agent");

    // Load the agent
    let loaded_agent = app.load_agent(path).unwrap();

    // Verify the learned state was preserved
    assert_eq!(
        loaded_agent.q_table(),
        agent.q_table(),
        "Loaded agent should have the same Q-table"
    );
    assert_eq!(loaded_agent.model().count(0, 2, 1), 1);
}

#[test]
fn test_load_saved_exposes_metadata() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing().with_repository(repo.clone()).build();

    let agent = app.create_agent(&AgentConfig::new(16, 4)).unwrap();
    let metadata = TrainingMetadata {
        episodes_trained: Some(250),
        environment: Some("4x4".to_string()),
        seed: None,
        saved_at: None,
    };

    let path = Path::new("with_metadata");
    app.save_agent(&agent, metadata.clone(), path).unwrap();

    let saved = app.load_saved(path).unwrap();
    assert_eq!(saved.metadata, metadata);
}
