//! dynaq CLI - Train and evaluate tabular Dyna agents
//!
//! This CLI provides a unified interface for:
//! - Training Dyna agents on grid environments
//! - Evaluating learned greedy policies
//! - Exporting learning curves, summaries, and reports for analysis

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dynaq")]
#[command(version, about = "Tabular Dyna-style reinforcement learning toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Dyna agent on a grid environment
    Train(Box<dynaq::cli::commands::train::TrainArgs>),

    /// Evaluate a trained agent's greedy policy
    Evaluate(dynaq::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => dynaq::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => dynaq::cli::commands::evaluate::execute(args),
    }
}
