//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training agents against an environment
//! - Evaluating learned policies greedily
//! - Recording observations during training

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{EvaluationConfig, EvaluationReport, evaluate};
// Re-export observer implementations (adapters)
pub use observers::{CurveObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
