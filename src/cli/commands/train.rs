//! Train command - Train a Dyna agent on a grid environment

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::{AgentConfig, App},
    dyna::TrainingMetadata,
    env::GridWorld,
    pipeline::{
        CurveObserver, EvaluationConfig, EvaluationReport, ProgressObserver, TrainingConfig,
        TrainingPipeline, TrainingResult, evaluate,
    },
    ports::Environment,
    types::defaults,
};

#[derive(Debug, Serialize)]
struct TrainingStats {
    total_episodes: usize,
    total_steps: usize,
    mean_reward: f64,
    best_reward: f64,
    final_epsilon: f64,
    planning_invocations: usize,
    planning_sweeps: usize,
}

impl From<&TrainingResult> for TrainingStats {
    fn from(result: &TrainingResult) -> Self {
        Self {
            total_episodes: result.total_episodes,
            total_steps: result.total_steps,
            mean_reward: result.mean_reward,
            best_reward: result.best_reward,
            final_epsilon: result.final_epsilon,
            planning_invocations: result.planning_invocations,
            planning_sweeps: result.planning_sweeps,
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationStats {
    total_episodes: usize,
    completed_episodes: usize,
    completion_rate: f64,
    mean_reward: f64,
    mean_steps: f64,
}

impl From<&EvaluationReport> for ValidationStats {
    fn from(report: &EvaluationReport) -> Self {
        Self {
            total_episodes: report.total_episodes,
            completed_episodes: report.completed_episodes,
            completion_rate: report.completion_rate,
            mean_reward: report.mean_reward,
            mean_steps: report.mean_steps,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingStats,
    validation: Option<ValidationStats>,
    environment: String,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    slip: f64,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    plan_every: usize,
    seed: Option<u64>,
}

/// Built-in map layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MapChoice {
    /// Classic 4x4 lake
    #[value(name = "4x4")]
    FourByFour,
    /// Classic 8x8 lake
    #[value(name = "8x8")]
    EightByEight,
}

impl MapChoice {
    /// Resolve a saved environment name back to a built-in map.
    pub(crate) fn parse_name(name: &str) -> Option<Self> {
        match name {
            "4x4" => Some(Self::FourByFour),
            "8x8" => Some(Self::EightByEight),
            _ => None,
        }
    }
}

/// Build the training environment from a built-in map or an ASCII map file.
///
/// When `map_file` is given it takes precedence over the built-in choice.
/// Blank lines in the file are skipped so trailing newlines do not produce
/// phantom rows.
pub(crate) fn build_environment(
    map: MapChoice,
    map_file: Option<&Path>,
    slip: f64,
    step_reward: f64,
    seed: Option<u64>,
) -> Result<GridWorld> {
    let mut env = if let Some(path) = map_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read map file {}", path.display()))?;
        let rows: Vec<&str> = contents
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        GridWorld::from_map(&rows, slip)?
    } else {
        match map {
            MapChoice::FourByFour => GridWorld::four_by_four(slip)?,
            MapChoice::EightByEight => GridWorld::eight_by_eight(slip)?,
        }
    };

    env = env.with_rewards(1.0, 0.0, step_reward);
    if let Some(seed) = seed {
        env = env.with_seed(seed);
    }
    Ok(env)
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Dyna agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Built-in map to train on
    #[arg(long, short = 'm', value_enum, default_value_t = MapChoice::FourByFour)]
    pub map: MapChoice,

    /// Load a custom ASCII map (rows of S/F/H/G) instead of a built-in one
    #[arg(long)]
    pub map_file: Option<PathBuf>,

    /// Slip probability (0 = deterministic, 2/3 = classic slippery lake)
    #[arg(long, default_value_t = 0.0)]
    pub slip: f64,

    /// Reward for every non-terminal step
    #[arg(long, default_value_t = 0.0)]
    pub step_reward: f64,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 500)]
    pub episodes: usize,

    /// Step cap per episode
    #[arg(long, default_value_t = 200)]
    pub max_steps: usize,

    /// Learning rate α (0.0-1.0]
    #[arg(long, default_value_t = defaults::LEARNING_RATE)]
    pub learning_rate: f64,

    /// Discount factor γ [0.0-1.0)
    #[arg(long, default_value_t = defaults::DISCOUNT_FACTOR)]
    pub discount: f64,

    /// Initial epsilon (exploration rate)
    #[arg(long, default_value_t = defaults::EPSILON)]
    pub epsilon: f64,

    /// Epsilon decay per episode
    #[arg(long, default_value_t = defaults::EPSILON_DECAY)]
    pub epsilon_decay: f64,

    /// Minimum epsilon
    #[arg(long, default_value_t = defaults::MIN_EPSILON)]
    pub min_epsilon: f64,

    /// Planning cadence in episodes (0 disables planning)
    #[arg(long, default_value_t = 1)]
    pub plan_every: usize,

    /// Convergence threshold for planning sweeps
    #[arg(long, default_value_t = defaults::PLAN_THETA)]
    pub plan_theta: f64,

    /// Sweep cap per planning invocation
    #[arg(long, default_value_t = defaults::PLAN_MAX_SWEEPS)]
    pub plan_sweeps: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Separate seed for environment randomness (defaults to seed+1)
    #[arg(long)]
    pub env_seed: Option<u64>,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional CSV file for the per-episode learning curve
    #[arg(long)]
    pub curve: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Number of post-training greedy validation episodes (0 disables)
    #[arg(long, short = 'v', default_value_t = 100)]
    pub validation_episodes: usize,

    /// Suppress the progress bar
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let env_seed = args
        .env_seed
        .or_else(|| args.seed.map(|s| s.wrapping_add(1)));
    let mut env = build_environment(
        args.map,
        args.map_file.as_deref(),
        args.slip,
        args.step_reward,
        env_seed,
    )?;

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let app = App::new();
    let mut agent_config = AgentConfig::new(env.n_states(), env.n_actions())
        .with_learning_rate(args.learning_rate)
        .with_discount_factor(args.discount)
        .with_epsilon(args.epsilon)
        .with_epsilon_decay(args.epsilon_decay)
        .with_min_epsilon(args.min_epsilon);
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }
    let mut agent = app.create_agent(&agent_config)?;

    println!("=== Training Configuration ===");
    println!(
        "Environment: {} ({} states, {} actions, slip {})",
        env.name(),
        env.n_states(),
        env.n_actions(),
        args.slip
    );
    println!("Episodes: {} (max {} steps each)", args.episodes, args.max_steps);
    println!(
        "Alpha: {} | Gamma: {} | Epsilon: {} -> {} (decay {})",
        args.learning_rate, args.discount, args.epsilon, args.min_epsilon, args.epsilon_decay
    );
    if args.plan_every == 0 {
        println!("Planning: disabled");
    } else {
        println!(
            "Planning: every {} episode(s), theta {:e}, up to {} sweeps",
            args.plan_every, args.plan_theta, args.plan_sweeps
        );
    }
    if let Some(seed) = args.seed {
        println!("Seed: {seed}");
    }
    println!();

    let config = TrainingConfig {
        num_episodes: args.episodes,
        max_steps_per_episode: args.max_steps,
        plan_every: args.plan_every,
        plan_theta: args.plan_theta,
        plan_max_sweeps: args.plan_sweeps,
        seed: args.seed,
    };

    let mut pipeline = TrainingPipeline::new(config);
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(curve_path) = &args.curve {
        pipeline = pipeline.with_observer(Box::new(CurveObserver::new(curve_path)?));
    }

    let result = pipeline.run(&mut agent, &mut env)?;

    println!("\n=== Training Complete ===");
    println!("Episodes: {}", result.total_episodes);
    println!("Total steps: {}", result.total_steps);
    println!("Mean return: {:.3}", result.mean_reward);
    println!("Best return: {:.3}", result.best_reward);
    println!("Final epsilon: {:.3}", result.final_epsilon);
    if result.planning_invocations > 0 {
        println!(
            "Planning: {} invocation(s), {} sweep(s) total",
            result.planning_invocations, result.planning_sweeps
        );
    }

    let validation_report = if args.validation_episodes > 0 {
        let eval_config = EvaluationConfig {
            num_episodes: args.validation_episodes,
            max_steps_per_episode: args.max_steps,
        };
        let report = evaluate(&agent, &mut env, &eval_config)?;

        println!("\n=== Greedy Validation ===");
        println!("Episodes: {}", report.total_episodes);
        println!(
            "Completed: {} ({:.1}%)",
            report.completed_episodes,
            report.completion_rate * 100.0
        );
        println!("Mean return: {:.3}", report.mean_reward);
        println!("Mean steps: {:.1}", report.mean_steps);

        Some(report)
    } else {
        None
    };

    if let Some(curve_path) = &args.curve {
        println!("\n✓ Learning curve written to: {}", curve_path.display());
    }

    if let Some(output_path) = &args.output {
        let metadata = TrainingMetadata {
            episodes_trained: Some(result.total_episodes),
            environment: Some(env.name().to_string()),
            seed: args.seed,
            saved_at: None,
        };
        app.save_agent(&agent, metadata, output_path)?;
        println!("✓ Agent saved to: {}", output_path.display());
    }

    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: TrainingStats::from(&result),
            validation: validation_report.as_ref().map(ValidationStats::from),
            environment: env.name().to_string(),
            metadata: SummaryMetadata {
                slip: args.slip,
                learning_rate: args.learning_rate,
                discount_factor: args.discount,
                epsilon: args.epsilon,
                epsilon_decay: args.epsilon_decay,
                min_epsilon: args.min_epsilon,
                plan_every: args.plan_every,
                seed: args.seed,
            },
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
