//! Train-and-evaluate walkthrough on the classic 4x4 lake.
//!
//! This example trains a Dyna agent on the slippery 4x4 grid, reports the
//! training totals, evaluates the learned greedy policy without exploration,
//! and renders that policy as one arrow per cell.

use dynaq::{
    DynaAgent, Result,
    env::{Cell, GridWorld},
    pipeline::{EvaluationConfig, TrainingConfig, TrainingPipeline, evaluate},
    ports::Environment,
};

fn main() -> Result<()> {
    println!("\n=== Dyna Training Demo ===\n");

    // Classic uniformly slippery lake: the intended move happens one time in
    // three, each perpendicular move likewise.
    let mut env = GridWorld::four_by_four(2.0 / 3.0)?.with_seed(7);
    let mut agent = DynaAgent::new(env.n_states(), env.n_actions(), 0.1, 0.99, 1.0, 0.995, 0.05)?;

    let config = TrainingConfig {
        num_episodes: 2000,
        max_steps_per_episode: 200,
        plan_every: 1,
        plan_theta: 1e-8,
        plan_max_sweeps: 100,
        seed: Some(42),
    };

    println!(
        "Training for {} episodes with planning after every episode...\n",
        config.num_episodes
    );
    let mut pipeline = TrainingPipeline::new(config);
    let result = pipeline.run(&mut agent, &mut env)?;

    println!("Training Results:");
    println!("  Episodes:      {}", result.total_episodes);
    println!("  Steps:         {}", result.total_steps);
    println!("  Mean return:   {:.3}", result.mean_reward);
    println!("  Best return:   {:.1}", result.best_reward);
    println!("  Final epsilon: {:.3}", result.final_epsilon);
    println!(
        "  Planning:      {} invocations, {} sweeps\n",
        result.planning_invocations, result.planning_sweeps
    );

    let eval_config = EvaluationConfig {
        num_episodes: 500,
        max_steps_per_episode: 200,
    };
    let report = evaluate(&agent, &mut env, &eval_config)?;

    println!("Greedy evaluation over {} episodes:", report.total_episodes);
    println!(
        "  Goal reached:  {} ({:.1}%)",
        report.completed_episodes,
        report.completion_rate * 100.0
    );
    println!("  Mean return:   {:.3}", report.mean_reward);
    println!("  Mean steps:    {:.1}\n", report.mean_steps);

    println!("Greedy policy (arrows per cell, H hole, G goal):");
    print_policy(&agent, &env)?;

    Ok(())
}

/// Render the greedy action for every walkable cell.
fn print_policy(agent: &DynaAgent, env: &GridWorld) -> Result<()> {
    const ARROWS: [char; 4] = ['<', 'v', '>', '^'];
    for row in 0..env.n_rows() {
        let mut line = String::with_capacity(env.n_cols() * 2);
        for col in 0..env.n_cols() {
            let state = row * env.n_cols() + col;
            let glyph = match env.cell(state) {
                Some(Cell::Hole) => 'H',
                Some(Cell::Goal) => 'G',
                _ => ARROWS[agent.greedy_action(state)?],
            };
            line.push(glyph);
            line.push(' ');
        }
        println!("  {}", line.trim_end());
    }
    Ok(())
}
