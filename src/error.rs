//! Error types for blog statistics.

use thiserror::Error;

/// A specialized `Result` type for statistics and record normalization.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors produced while computing statistics or normalizing input records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The input sequence has no posts.
    #[error("the list of blogs is empty")]
    EmptyInput,

    /// A record could not be turned into a `BlogPost`.
    #[error("malformed blog record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

impl StatsError {
    /// Build a `MalformedRecord` error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        StatsError::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }
}
