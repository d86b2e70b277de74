use thiserror::Error;

/// Problems with the shape or content of matching input
///
/// Every variant is detected before any matching work begins, so a run that
/// fails with one of these has computed nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("score matrix is not square: row {row} has {actual} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("score at ({row}, {col}) is {value}, expected a value in [0, 1]")]
    ScoreOutOfRange { row: usize, col: usize, value: f64 },

    #[error("participant {participant} has unknown gender preference '{label}'")]
    UnknownPreference { participant: usize, label: String },

    #[error("invalid role partition: {0}")]
    InvalidPartition(String),
}

/// Errors that abort a matching run
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] InputError),

    #[error("Matching run cancelled after {proposals} proposals")]
    Cancelled { proposals: usize },

    #[error("Matching run exceeded its proposal budget of {budget}")]
    StepBudgetExceeded { budget: usize },
}
