//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{fs::File, path::Path};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    dyna::PlanningSummary,
    ports::Observer,
    types::EpisodeSummary,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    episodes: usize,
    total_reward: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            episodes: 0,
            total_reward: 0.0,
        }
    }

    fn message(&self) -> String {
        let mean = if self.episodes > 0 {
            self.total_reward / self.episodes as f64
        } else {
            0.0
        };
        format!("mean return {mean:.3}")
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        self.total_reward += summary.total_reward;

        if let Some(pb) = &self.progress_bar {
            pb.set_position((episode + 1) as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    total_episodes: usize,
    total_steps: usize,
    total_reward: f64,
    best_reward: Option<f64>,
    planning_invocations: usize,
    planning_sweeps: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            total_episodes: 0,
            total_steps: 0,
            total_reward: 0.0,
            best_reward: None,
            planning_invocations: 0,
            planning_sweeps: 0,
        }
    }

    /// Get current mean per-episode return
    pub fn mean_reward(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_reward / self.total_episodes as f64
        }
    }

    /// Get average episode length
    pub fn mean_steps(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.total_episodes as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            total_steps: self.total_steps,
            mean_reward: self.mean_reward(),
            best_reward: self.best_reward.unwrap_or(0.0),
            mean_steps: self.mean_steps(),
            planning_invocations: self.planning_invocations,
            planning_sweeps: self.planning_sweeps,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub total_steps: usize,
    pub mean_reward: f64,
    pub best_reward: f64,
    pub mean_steps: f64,
    pub planning_invocations: usize,
    pub planning_sweeps: usize,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_planning(&mut self, _episode: usize, summary: &PlanningSummary) -> Result<()> {
        self.planning_invocations += 1;
        self.planning_sweeps += summary.sweeps;
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.total_episodes += 1;
        self.total_steps += summary.steps;
        self.total_reward += summary.total_reward;
        self.best_reward = Some(match self.best_reward {
            Some(best) => best.max(summary.total_reward),
            None => summary.total_reward,
        });
        Ok(())
    }
}

/// Curve observer - Streams per-episode rows to a CSV file
///
/// Produces one row per episode with the columns `episode`, `steps`,
/// `total_reward`, and `epsilon`, flushed as episodes finish so a partial
/// file stays readable if training is interrupted.
pub struct CurveObserver {
    writer: csv::Writer<File>,
}

impl CurveObserver {
    /// Create a new curve observer writing to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let writer = csv::Writer::from_path(path)?;
        Ok(Self { writer })
    }
}

impl Observer for CurveObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.writer.serialize(summary)?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
