//! Evaluate command - Run a trained agent's greedy policy

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    app::App,
    cli::commands::train::{MapChoice, build_environment},
    pipeline::{EvaluationConfig, evaluate},
    ports::Environment,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent", allow_negative_numbers = true)]
pub struct EvaluateArgs {
    /// Path to the trained agent file
    pub agent: PathBuf,

    /// Built-in map to evaluate on (defaults to the map the agent was trained on)
    #[arg(long, short = 'm', value_enum)]
    pub map: Option<MapChoice>,

    /// Load a custom ASCII map (rows of S/F/H/G) instead of a built-in one
    #[arg(long)]
    pub map_file: Option<PathBuf>,

    /// Slip probability (0 = deterministic, 2/3 = classic slippery lake)
    #[arg(long, default_value_t = 0.0)]
    pub slip: f64,

    /// Reward for every non-terminal step
    #[arg(long, default_value_t = 0.0)]
    pub step_reward: f64,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Step cap per episode
    #[arg(long, default_value_t = 200)]
    pub max_steps: usize,

    /// Seed for environment randomness
    #[arg(long)]
    pub env_seed: Option<u64>,

    /// Export the evaluation report to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let app = App::new();

    println!("Loading trained agent from: {}", args.agent.display());
    let saved = app.load_saved(&args.agent)?;

    println!("\n=== Loaded Agent Info ===");
    if let Some(episodes) = saved.metadata.episodes_trained {
        println!("Episodes trained: {episodes}");
    }
    if let Some(environment) = &saved.metadata.environment {
        println!("Environment: {environment}");
    }
    if let Some(seed) = saved.metadata.seed {
        println!("Training seed: {seed}");
    }

    let agent = saved.to_agent()?;

    // Pick the evaluation map: an explicit flag wins, then the saved
    // environment name, then the 4x4 default for agents without metadata.
    let map = if args.map_file.is_some() {
        args.map.unwrap_or(MapChoice::FourByFour)
    } else if let Some(map) = args.map {
        map
    } else {
        let name = saved.metadata.environment.as_deref().unwrap_or("4x4");
        MapChoice::parse_name(name).ok_or_else(|| {
            anyhow!(
                "agent was trained on '{name}', which is not a built-in map; \
                 pass --map or --map-file to pick an evaluation environment"
            )
        })?
    };

    let mut env = build_environment(
        map,
        args.map_file.as_deref(),
        args.slip,
        args.step_reward,
        args.env_seed,
    )?;

    if env.n_states() != agent.n_states() || env.n_actions() != agent.n_actions() {
        return Err(anyhow!(
            "environment {} has {} states x {} actions but the agent was trained for {} x {}",
            env.name(),
            env.n_states(),
            env.n_actions(),
            agent.n_states(),
            agent.n_actions()
        ));
    }

    println!("\n=== Evaluation Configuration ===");
    println!(
        "Environment: {} ({} states, {} actions, slip {})",
        env.name(),
        env.n_states(),
        env.n_actions(),
        args.slip
    );
    println!("Episodes: {} (max {} steps each)", args.episodes, args.max_steps);
    if let Some(seed) = args.env_seed {
        println!("Environment seed: {seed}");
    }

    let config = EvaluationConfig {
        num_episodes: args.episodes,
        max_steps_per_episode: args.max_steps,
    };
    let report = evaluate(&agent, &mut env, &config)?;

    println!("\n=== Evaluation Results ===");
    println!("Episodes: {}", report.total_episodes);
    println!(
        "Completed: {} ({:.1}%)",
        report.completed_episodes,
        report.completion_rate * 100.0
    );
    println!("Mean return: {:.3}", report.mean_reward);
    println!("Best return: {:.3}", report.best_reward);
    println!("Worst return: {:.3}", report.worst_reward);
    println!("Mean steps: {:.1}", report.mean_steps);

    if let Some(export_path) = &args.export {
        report.save(export_path)?;
        println!("\n✓ Report exported to: {}", export_path.display());
    }

    Ok(())
}
