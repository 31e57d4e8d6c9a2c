//! Error types for the quiz core.
//!
//! Wrong answers, timeouts and lost lives are game rules, not errors. What
//! lives here is malformed data, bad configuration, storage trouble and
//! transitions the run controller does not allow.

use thiserror::Error;

/// A question definition that cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question {id}: match needs 3 to 5 distinct operators, got {count}")]
    OperandCount { id: String, count: usize },

    #[error("question {id}: operator {operator} listed twice")]
    DuplicateOperand { id: String, operator: String },

    #[error("question {id}: prompt must contain exactly one blank marker")]
    BlankMarker { id: String },

    #[error("question {id}: no choices offered")]
    NoChoices { id: String },

    #[error("question {id}: correct choice '{choice}' is not among the offered choices")]
    CorrectChoiceMissing { id: String, choice: String },

    #[error("question {id}: truth table has no rows")]
    EmptyTable { id: String },

    #[error("question {id}: row {row} has {found} inputs, expected {expected}")]
    RowArity {
        id: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("question {id}: row {row} expects the wrong output for its operator")]
    ExpectedOutput { id: String, row: usize },

    #[error("question {id}: fault question needs at least two pairs")]
    TooFewPairs { id: String },

    #[error("question {id}: faulty index {index} out of range for {len} pairs")]
    FaultyIndexOutOfRange { id: String, index: usize, len: usize },

    #[error("question {id}: pair {index} does not match the faulty index")]
    FaultMismatch { id: String, index: usize },
}

/// Persistence surface failures. Never fatal to a run.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("failed to write key '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("failed to encode value for key '{key}'")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A transition was attempted that the current phase does not allow.
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
