//! Grid world environment parsed from ASCII maps.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Error, Result, ports::Environment, types::Transition};

/// Classic 4x4 lake layout.
const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

/// Classic 8x8 lake layout.
const MAP_8X8: [&str; 8] = [
    "SFFFFFFF",
    "FFFFFFFF",
    "FFFHFFFF",
    "FFFFFHFF",
    "FFFHFFFF",
    "FHHFFFHF",
    "FHFFHFHF",
    "FFFHFFFG",
];

/// Number of movement actions; fixed for every grid.
const N_ACTIONS: usize = 4;

/// One cell of a grid map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Where episodes begin. Behaves like frozen ground after the start.
    Start,
    /// Walkable ground.
    Frozen,
    /// Terminal cell with the hole reward.
    Hole,
    /// Terminal cell with the goal reward.
    Goal,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            'S' => Some(Cell::Start),
            'F' => Some(Cell::Frozen),
            'H' => Some(Cell::Hole),
            'G' => Some(Cell::Goal),
            _ => None,
        }
    }

    /// Whether stepping onto this cell ends the episode.
    pub fn is_terminal(self) -> bool {
        matches!(self, Cell::Hole | Cell::Goal)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// A rectangular grid world with slippery movement.
///
/// States are flat indices in row-major order (`row * n_cols + col`). The four
/// actions are `0` = left, `1` = down, `2` = right, `3` = up. Moving into a
/// boundary leaves the position unchanged. With slip probability `slip`, the
/// intended direction executes with probability `1 - slip` and each
/// perpendicular direction with probability `slip / 2`; setting
/// `slip = 2.0 / 3.0` reproduces the classic uniformly slippery lake.
///
/// Rewards default to `1.0` for reaching the goal, `0.0` for falling into a
/// hole, and `0.0` per non-terminal step.
///
/// # Examples
///
/// ```
/// use dynaq::{env::GridWorld, ports::Environment};
///
/// let mut env = GridWorld::four_by_four(0.0)?.with_seed(7);
/// assert_eq!(env.n_states(), 16);
/// assert_eq!(env.n_actions(), 4);
///
/// let start = env.reset();
/// let step = env.step(2)?;
/// assert_eq!(start, 0);
/// assert_eq!(step.next_state, 1);
/// # Ok::<(), dynaq::Error>(())
/// ```
#[derive(Debug)]
pub struct GridWorld {
    cells: Vec<Cell>,
    n_rows: usize,
    n_cols: usize,
    start_state: usize,
    state: usize,
    done: bool,
    slip: f64,
    goal_reward: f64,
    hole_reward: f64,
    step_reward: f64,
    rng: StdRng,
    name: String,
}

impl GridWorld {
    /// Parse a grid from ASCII rows.
    ///
    /// Each row is a string over the alphabet `S` (start), `F` (frozen),
    /// `H` (hole), `G` (goal). Rows must be non-empty, equally wide, and
    /// contain exactly one `S` between them.
    ///
    /// # Errors
    ///
    /// Returns an error if the map is empty, ragged, contains an unknown
    /// character, does not have exactly one start cell, or if `slip` falls
    /// outside `[0.0, 1.0]`.
    pub fn from_map(rows: &[&str], slip: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&slip) {
            return Err(Error::InvalidHyperparameter {
                name: "slip".to_string(),
                value: slip,
                expected: "0.0 <= slip <= 1.0".to_string(),
            });
        }
        if rows.is_empty() {
            return Err(Error::EmptyMap);
        }

        let n_cols = rows[0].chars().count();
        if n_cols == 0 {
            return Err(Error::EmptyMap);
        }

        let mut cells = Vec::with_capacity(rows.len() * n_cols);
        let mut start_state = None;
        let mut start_count = 0;
        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != n_cols {
                return Err(Error::RaggedMap {
                    row,
                    expected: n_cols,
                    found: width,
                });
            }
            for (col, character) in line.chars().enumerate() {
                let cell = Cell::from_char(character).ok_or(Error::InvalidMapCharacter {
                    character,
                    row,
                    col,
                })?;
                if cell == Cell::Start {
                    start_count += 1;
                    start_state = Some(row * n_cols + col);
                }
                cells.push(cell);
            }
        }

        let Some(start_state) = start_state.filter(|_| start_count == 1) else {
            return Err(Error::StartCellCount { found: start_count });
        };

        Ok(GridWorld {
            cells,
            n_rows: rows.len(),
            n_cols,
            start_state,
            state: start_state,
            done: false,
            slip,
            goal_reward: 1.0,
            hole_reward: 0.0,
            step_reward: 0.0,
            rng: build_rng(None),
            name: "grid".to_string(),
        })
    }

    /// The classic 4x4 lake.
    ///
    /// # Errors
    ///
    /// Returns an error if `slip` falls outside `[0.0, 1.0]`.
    pub fn four_by_four(slip: f64) -> Result<Self> {
        let mut env = Self::from_map(&MAP_4X4, slip)?;
        env.name = "4x4".to_string();
        Ok(env)
    }

    /// The classic 8x8 lake.
    ///
    /// # Errors
    ///
    /// Returns an error if `slip` falls outside `[0.0, 1.0]`.
    pub fn eight_by_eight(slip: f64) -> Result<Self> {
        let mut env = Self::from_map(&MAP_8X8, slip)?;
        env.name = "8x8".to_string();
        Ok(env)
    }

    /// Seed the slip randomness for reproducible rollouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Override the reward structure.
    ///
    /// A small negative `step_reward` is the usual way to make shorter
    /// paths preferable when discounting alone is too weak.
    pub fn with_rewards(mut self, goal_reward: f64, hole_reward: f64, step_reward: f64) -> Self {
        self.goal_reward = goal_reward;
        self.hole_reward = hole_reward;
        self.step_reward = step_reward;
        self
    }

    /// Number of rows in the map.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns in the map.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// The cell at a flat state index.
    pub fn cell(&self, state: usize) -> Option<Cell> {
        self.cells.get(state).copied()
    }

    /// State the current episode is in.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Pick the executed direction, slipping perpendicular to `action`.
    ///
    /// In the left/down/right/up ordering the two neighbors of an action
    /// index are exactly its perpendiculars. A dry grid (`slip == 0.0`)
    /// draws no randomness, so deterministic rollouts stay reproducible
    /// no matter how the rng was seeded.
    fn resolve_slip(&mut self, action: usize) -> usize {
        if self.slip <= 0.0 {
            return action;
        }
        let draw = self.rng.random::<f64>();
        if draw < self.slip / 2.0 {
            (action + 3) % N_ACTIONS
        } else if draw < self.slip {
            (action + 1) % N_ACTIONS
        } else {
            action
        }
    }

    /// Apply a direction to the current position, clamping at the edges.
    fn shift(&self, direction: usize) -> usize {
        let row = self.state / self.n_cols;
        let col = self.state % self.n_cols;
        let (row, col) = match direction {
            0 => (row, col.saturating_sub(1)),
            1 => ((row + 1).min(self.n_rows - 1), col),
            2 => (row, (col + 1).min(self.n_cols - 1)),
            _ => (row.saturating_sub(1), col),
        };
        row * self.n_cols + col
    }
}

impl Environment for GridWorld {
    fn n_states(&self) -> usize {
        self.n_rows * self.n_cols
    }

    fn n_actions(&self) -> usize {
        N_ACTIONS
    }

    fn reset(&mut self) -> usize {
        self.state = self.start_state;
        self.done = false;
        self.state
    }

    fn step(&mut self, action: usize) -> Result<Transition> {
        if action >= N_ACTIONS {
            return Err(Error::ActionOutOfRange {
                action,
                n_actions: N_ACTIONS,
            });
        }
        if self.done {
            return Err(Error::InvalidConfiguration {
                message: "episode has ended; call reset before stepping".to_string(),
            });
        }

        let direction = self.resolve_slip(action);
        let next_state = self.shift(direction);
        let (reward, done) = match self.cells[next_state] {
            Cell::Goal => (self.goal_reward, true),
            Cell::Hole => (self.hole_reward, true),
            Cell::Start | Cell::Frozen => (self.step_reward, false),
        };

        self.state = next_state;
        self.done = done;
        Ok(Transition {
            next_state,
            reward,
            done,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_by_four_layout() {
        let mut env = GridWorld::four_by_four(0.0).unwrap();
        assert_eq!(env.n_states(), 16);
        assert_eq!(env.n_actions(), 4);
        assert_eq!(env.reset(), 0, "episodes start on the S cell");
        assert_eq!(env.cell(15), Some(Cell::Goal));
        assert_eq!(env.cell(5), Some(Cell::Hole));
        assert_eq!(env.name(), "4x4");
    }

    #[test]
    fn test_eight_by_eight_layout() {
        let env = GridWorld::eight_by_eight(0.0).unwrap();
        assert_eq!(env.n_states(), 64);
        assert_eq!(env.cell(63), Some(Cell::Goal));
        assert_eq!(env.cell(19), Some(Cell::Hole));
    }

    #[test]
    fn test_rejects_empty_map() {
        assert!(matches!(GridWorld::from_map(&[], 0.0), Err(Error::EmptyMap)));
        assert!(matches!(
            GridWorld::from_map(&["", ""], 0.0),
            Err(Error::EmptyMap)
        ));
    }

    #[test]
    fn test_rejects_ragged_map() {
        let result = GridWorld::from_map(&["SFF", "FG"], 0.0);
        assert!(matches!(
            result,
            Err(Error::RaggedMap {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_character() {
        let result = GridWorld::from_map(&["SF", "XG"], 0.0);
        assert!(matches!(
            result,
            Err(Error::InvalidMapCharacter {
                character: 'X',
                row: 1,
                col: 0
            })
        ));
    }

    #[test]
    fn test_rejects_wrong_start_count() {
        assert!(matches!(
            GridWorld::from_map(&["FF", "FG"], 0.0),
            Err(Error::StartCellCount { found: 0 })
        ));
        assert!(matches!(
            GridWorld::from_map(&["SS", "FG"], 0.0),
            Err(Error::StartCellCount { found: 2 })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_slip() {
        assert!(matches!(
            GridWorld::four_by_four(1.5),
            Err(Error::InvalidHyperparameter { .. })
        ));
        assert!(matches!(
            GridWorld::four_by_four(-0.1),
            Err(Error::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_deterministic_moves_and_edge_bumps() {
        let mut env = GridWorld::four_by_four(0.0).unwrap();
        env.reset();

        // Bumping the top and left edges from the corner stays in place.
        assert_eq!(env.step(3).unwrap().next_state, 0);
        assert_eq!(env.step(0).unwrap().next_state, 0);

        // Right then down walks the expected row-major indices.
        assert_eq!(env.step(2).unwrap().next_state, 1);
        assert_eq!(env.step(1).unwrap().next_state, 5);
    }

    #[test]
    fn test_goal_and_hole_terminate() {
        let mut env = GridWorld::from_map(&["SFG"], 0.0).unwrap();
        env.reset();
        let first = env.step(2).unwrap();
        assert!(!first.done);
        assert_eq!(first.reward, 0.0);
        let second = env.step(2).unwrap();
        assert!(second.done);
        assert_eq!(second.reward, 1.0, "goal pays the goal reward");

        let mut env = GridWorld::from_map(&["SHG"], 0.0).unwrap();
        env.reset();
        let fall = env.step(2).unwrap();
        assert!(fall.done);
        assert_eq!(fall.reward, 0.0, "holes pay the hole reward");
    }

    #[test]
    fn test_custom_rewards() {
        let mut env = GridWorld::from_map(&["SFG"], 0.0)
            .unwrap()
            .with_rewards(10.0, -5.0, -0.1);
        env.reset();
        assert_eq!(env.step(2).unwrap().reward, -0.1);
        assert_eq!(env.step(2).unwrap().reward, 10.0);
    }

    #[test]
    fn test_step_after_terminal_is_rejected() {
        let mut env = GridWorld::from_map(&["SG"], 0.0).unwrap();
        env.reset();
        assert!(env.step(2).unwrap().done);
        assert!(matches!(
            env.step(2),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_action_out_of_range() {
        let mut env = GridWorld::four_by_four(0.0).unwrap();
        env.reset();
        assert!(matches!(
            env.step(4),
            Err(Error::ActionOutOfRange {
                action: 4,
                n_actions: 4
            })
        ));
    }

    #[test]
    fn test_full_slip_only_moves_perpendicular() {
        // With slip = 1.0 the intended direction never executes, so moving
        // right from the center of a 3x3 grid can only land up or down.
        let mut env = GridWorld::from_map(&["FFF", "FSF", "FFF"], 1.0)
            .unwrap()
            .with_seed(11);
        let mut seen_up = false;
        let mut seen_down = false;
        for _ in 0..100 {
            env.reset();
            let step = env.step(2).unwrap();
            match step.next_state {
                1 => seen_up = true,
                7 => seen_down = true,
                other => panic!("slipped to non-perpendicular state {other}"),
            }
        }
        assert!(seen_up && seen_down, "both perpendicular outcomes occur");
    }

    #[test]
    fn test_seeded_rollouts_are_reproducible() {
        let actions = [2, 2, 1, 1, 2, 1, 0, 3, 2, 1];
        let mut first = GridWorld::four_by_four(0.5).unwrap().with_seed(99);
        let mut second = GridWorld::four_by_four(0.5).unwrap().with_seed(99);
        first.reset();
        second.reset();
        for &action in &actions {
            let a = first.step(action);
            let b = second.step(action);
            match (a, b) {
                (Ok(x), Ok(y)) => {
                    assert_eq!(x, y);
                    if x.done {
                        first.reset();
                        second.reset();
                    }
                }
                (a, b) => panic!("seeded runs diverged: {a:?} vs {b:?}"),
            }
        }
    }
}
