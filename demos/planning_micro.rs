//! Worked example: value iteration over a hand-fed model.
//!
//! This example walks a three-cell corridor through the planner one
//! observation at a time: a deterministic chain first, then a loitering
//! self-loop, then a slip that makes one transition stochastic. Each stage
//! prints the state values and action values so the discount ladder and the
//! probability-weighted backups are visible as plain numbers.

use dynaq::{DynaAgent, Result, Transition};

const GAMMA: f64 = 0.9;

fn main() -> Result<()> {
    println!("Micro Dyna example: three corridor cells and one terminal cell\n");

    // Action 1 advances toward the terminal state 3, action 0 stays put.
    // Only the final step pays. Epsilon is irrelevant here: the walkthrough
    // feeds transitions by hand and never asks the policy for one.
    let mut agent = DynaAgent::new(4, 2, 0.5, GAMMA, 0.0, 1.0, 0.0)?;

    println!("Stage 1: deterministic chain 0 -> 1 -> 2 -> goal");
    let chain = [(0, 1, 0.0, false), (1, 2, 0.0, false), (2, 3, 1.0, true)];
    for (state, next_state, reward, done) in chain {
        agent.observe(
            state,
            1,
            Transition {
                next_state,
                reward,
                done,
            },
        )?;
    }
    let summary = agent.plan(1e-10, 100);
    println!(
        "  value iteration: {} sweeps, final delta {:.2e}, converged = {}",
        summary.sweeps, summary.max_delta, summary.converged
    );
    print_tables(&agent);
    println!("  V steps down by one factor of gamma per cell: 1.0, 0.9, 0.81\n");

    println!("Stage 2: a loitering self-loop at cell 0");
    agent.observe(
        0,
        0,
        Transition {
            next_state: 0,
            reward: 0.0,
            done: false,
        },
    )?;
    agent.plan(1e-10, 100);
    print_tables(&agent);
    println!(
        "  Q(0, stay) backs up gamma * V(0) = {:.4}; advancing still wins\n",
        GAMMA * GAMMA * GAMMA
    );

    println!("Stage 3: a slip makes the first advance stochastic");
    agent.observe(
        0,
        1,
        Transition {
            next_state: 0,
            reward: 0.0,
            done: false,
        },
    )?;
    agent.plan(1e-10, 200);
    print_model_row(&agent, 0);
    print_tables(&agent);
    println!(
        "  V(0) solves V = 0.405 + 0.45 V, so it settles at 81/110 = {:.4}",
        81.0 / 110.0
    );

    Ok(())
}

/// Print V and both Q columns for the three corridor cells.
fn print_tables(agent: &DynaAgent) {
    let q = agent.q_table();
    let v = agent.state_values();
    println!("  state       V   Q(s, stay)   Q(s, advance)");
    for state in 0..3 {
        println!(
            "  {state:>5}  {:>6.4}   {:>10.4}   {:>13.4}",
            v.get(state),
            q.get(state, 0),
            q.get(state, 1),
        );
    }
}

/// Print the estimated outcome distribution for advancing from a cell.
fn print_model_row(agent: &DynaAgent, state: usize) {
    if let Some(outcomes) = agent.model().outcomes(state, 1) {
        let parts: Vec<String> = outcomes
            .iter()
            .map(|o| format!("-> {} with p = {:.2}", o.next_state, o.probability))
            .collect();
        println!("  model row ({state}, advance): {}", parts.join(", "));
    }
}
