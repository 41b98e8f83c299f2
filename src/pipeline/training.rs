//! Training pipeline for Dyna agents

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    dyna::DynaAgent,
    ports::{Environment, Observer},
    types::{EpisodeSummary, defaults},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub num_episodes: usize,

    /// Step cap per episode, guarding against rollouts that never terminate
    pub max_steps_per_episode: usize,

    /// Run planning after every this many episodes (0 disables planning)
    pub plan_every: usize,

    /// Convergence threshold handed to the planner
    pub plan_theta: f64,

    /// Sweep cap handed to the planner
    pub plan_max_sweeps: usize,

    /// Random seed applied to the agent before the first episode
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 500,
            max_steps_per_episode: 200,
            plan_every: 1,
            plan_theta: defaults::PLAN_THETA,
            plan_max_sweeps: defaults::PLAN_MAX_SWEEPS,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes run
    pub total_episodes: usize,

    /// Total environment steps across all episodes
    pub total_steps: usize,

    /// Mean per-episode return
    pub mean_reward: f64,

    /// Best per-episode return
    pub best_reward: f64,

    /// Exploration rate after the final decay
    pub final_epsilon: f64,

    /// How many times the planner was invoked
    pub planning_invocations: usize,

    /// Total sweeps across all planner invocations
    pub planning_sweeps: usize,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(
        total_episodes: usize,
        total_steps: usize,
        total_reward: f64,
        best_reward: f64,
        final_epsilon: f64,
        planning_invocations: usize,
        planning_sweeps: usize,
    ) -> Self {
        let (mean_reward, best_reward) = if total_episodes > 0 {
            (total_reward / total_episodes as f64, best_reward)
        } else {
            (0.0, 0.0)
        };

        Self {
            total_episodes,
            total_steps,
            mean_reward,
            best_reward,
            final_epsilon,
            planning_invocations,
            planning_sweeps,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline driving one agent through one environment.
///
/// Each episode interleaves acting, model-free updates, and model learning;
/// planning runs on the configured cadence and epsilon decays once per
/// episode. The environment carries its own randomness, so only the agent is
/// reseeded from `config.seed`.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run training with the given agent and environment
    pub fn run(
        &mut self,
        agent: &mut DynaAgent,
        env: &mut dyn Environment,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            agent.set_seed(seed);
        }

        // Notify observers of training start
        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_episodes)?;
        }

        let mut total_steps = 0;
        let mut total_reward = 0.0;
        let mut best_reward = f64::NEG_INFINITY;
        let mut planning_invocations = 0;
        let mut planning_sweeps = 0;

        for episode in 0..self.config.num_episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let epsilon_in_effect = agent.epsilon();
            let mut state = env.reset();
            let mut episode_reward = 0.0;
            let mut steps = 0;

            for step in 0..self.config.max_steps_per_episode {
                let action = agent.choose_action(state, true)?;
                let transition = env.step(action)?;
                agent.observe(state, action, transition)?;

                episode_reward += transition.reward;
                steps = step + 1;

                // Notify observers of the learned-from step
                for observer in &mut self.observers {
                    observer.on_step(episode, step, state, action, &transition)?;
                }

                state = transition.next_state;
                if transition.done {
                    break;
                }
            }

            if self.config.plan_every > 0 && (episode + 1).is_multiple_of(self.config.plan_every) {
                let summary = agent.plan(self.config.plan_theta, self.config.plan_max_sweeps);
                planning_invocations += 1;
                planning_sweeps += summary.sweeps;
                for observer in &mut self.observers {
                    observer.on_planning(episode, &summary)?;
                }
            }

            agent.decay_epsilon();

            total_steps += steps;
            total_reward += episode_reward;
            best_reward = best_reward.max(episode_reward);

            let summary = EpisodeSummary {
                episode,
                steps,
                total_reward: episode_reward,
                epsilon: epsilon_in_effect,
            };

            // Notify observers of episode end
            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }
        }

        // Notify observers of training end
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(
            self.config.num_episodes,
            total_steps,
            total_reward,
            best_reward,
            agent.epsilon(),
            planning_invocations,
            planning_sweeps,
        ))
    }
}
