use thiserror::Error;

/// Result type local to ceanet-partition.
pub type Result<T> = std::result::Result<T, CeError>;

/// Cost-effectiveness errors: malformed input to the partition algebra.
///
/// Degenerate numeric comparisons (equal-effectiveness ICERs) are *not*
/// errors; see [`crate::icer`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CeError {
    #[error("cost-effectiveness analysis needs at least one candidate")]
    EmptyCandidates,

    #[error("length mismatch for {what}: expected {expected}, got {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("non-finite {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },

    #[error("invalid probability {value} for state {state}")]
    InvalidProbability { state: usize, value: f64 },

    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    #[error("partition divided by zero")]
    DivisionByZero,
}
