//! Greedy-policy evaluation runs

use serde::{Deserialize, Serialize};

use crate::{Result, dyna::DynaAgent, ports::Environment};

/// Evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Number of evaluation episodes
    pub num_episodes: usize,

    /// Step cap per episode
    pub max_steps_per_episode: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            num_episodes: 100,
            max_steps_per_episode: 200,
        }
    }
}

/// Aggregate outcome of an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Episodes evaluated
    pub total_episodes: usize,

    /// Episodes that reached a terminal state before the step cap
    pub completed_episodes: usize,

    /// Fraction of episodes that reached a terminal state
    pub completion_rate: f64,

    /// Mean per-episode return
    pub mean_reward: f64,

    /// Best per-episode return
    pub best_reward: f64,

    /// Worst per-episode return
    pub worst_reward: f64,

    /// Mean episode length in steps
    pub mean_steps: f64,
}

impl EvaluationReport {
    /// Save report to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

/// Run the agent's greedy policy and report aggregate returns.
///
/// No learning happens here: action selection ignores epsilon, nothing is
/// written back to the value estimates or the model, and the agent is taken
/// by shared reference. Stochastic environments still vary between episodes
/// through their own randomness.
///
/// # Errors
///
/// Returns an error if the environment produces states outside the agent's
/// space or if stepping the environment fails.
pub fn evaluate(
    agent: &DynaAgent,
    env: &mut dyn Environment,
    config: &EvaluationConfig,
) -> Result<EvaluationReport> {
    let mut total_reward = 0.0;
    let mut best_reward = f64::NEG_INFINITY;
    let mut worst_reward = f64::INFINITY;
    let mut total_steps = 0;
    let mut completed_episodes = 0;

    for _ in 0..config.num_episodes {
        let mut state = env.reset();
        let mut episode_reward = 0.0;

        for _ in 0..config.max_steps_per_episode {
            let action = agent.greedy_action(state)?;
            let transition = env.step(action)?;

            episode_reward += transition.reward;
            total_steps += 1;
            state = transition.next_state;

            if transition.done {
                completed_episodes += 1;
                break;
            }
        }

        total_reward += episode_reward;
        best_reward = best_reward.max(episode_reward);
        worst_reward = worst_reward.min(episode_reward);
    }

    let (mean_reward, best_reward, worst_reward, mean_steps) = if config.num_episodes > 0 {
        (
            total_reward / config.num_episodes as f64,
            best_reward,
            worst_reward,
            total_steps as f64 / config.num_episodes as f64,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };
    let completion_rate = if config.num_episodes > 0 {
        completed_episodes as f64 / config.num_episodes as f64
    } else {
        0.0
    };

    Ok(EvaluationReport {
        total_episodes: config.num_episodes,
        completed_episodes,
        completion_rate,
        mean_reward,
        best_reward,
        worst_reward,
        mean_steps,
    })
}
