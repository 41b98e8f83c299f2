//! Error types for the dynaq crate

use thiserror::Error;

/// Main error type for the dynaq crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("state {state} is out of range (state space has {n_states} states)")]
    StateOutOfRange { state: usize, n_states: usize },

    #[error("action {action} is out of range (action space has {n_actions} actions)")]
    ActionOutOfRange { action: usize, n_actions: usize },

    #[error("state and action spaces must be non-empty (got {n_states} states, {n_actions} actions)")]
    EmptySpace { n_states: usize, n_actions: usize },

    #[error("invalid hyperparameter {name}={value} (expected {expected})")]
    InvalidHyperparameter {
        name: String,
        value: f64,
        expected: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported snapshot version {found} (this build reads version {supported})")]
    UnsupportedSnapshotVersion { found: u32, supported: u32 },

    #[error("corrupt snapshot: {table} has {found} entries, expected {expected}")]
    SnapshotShapeMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("map has no rows")]
    EmptyMap,

    #[error("map row {row} has width {found}, expected {expected}")]
    RaggedMap {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid map character '{character}' at row {row}, column {col} (expected S, F, H, or G)")]
    InvalidMapCharacter {
        character: char,
        row: usize,
        col: usize,
    },

    #[error("map must contain exactly one start cell 'S', found {found}")]
    StartCellCount { found: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
