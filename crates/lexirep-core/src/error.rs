//! Scheduler error types.
//!
//! These errors represent caller contract violations detected by the memory
//! model: out-of-range numeric fields, unknown ratings, and invalid scheduler
//! configuration. File-backed loaders report through `anyhow` instead.

use thiserror::Error;

/// Errors raised when constructing memory states or schedulers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    /// A rating outside `again | hard | good | easy` (or 1-4).
    #[error("unknown rating: {0}")]
    InvalidRating(String),

    /// Stability must be finite and strictly positive.
    #[error("stability must be a positive finite number, got {0}")]
    InvalidStability(f64),

    /// Difficulty must lie in [1, 10].
    #[error("difficulty must be within [1, 10], got {0}")]
    InvalidDifficulty(f64),

    /// Retrievability must lie in [0, 1].
    #[error("retrievability must be within [0, 1], got {0}")]
    InvalidRetrievability(f64),

    /// Intervals are whole days, at least one.
    #[error("interval must be at least 1 day, got {0}")]
    InvalidInterval(u32),

    /// The model vector has the wrong length or contains unusable values.
    #[error("invalid model parameters: {0}")]
    InvalidParams(String),

    /// Target retention must lie strictly between 0 and 1.
    #[error("request retention must be within (0, 1), got {0}")]
    InvalidRetention(f64),

    /// The interval ceiling must be at least one day.
    #[error("maximum interval must be at least 1 day, got {0}")]
    InvalidMaximumInterval(u32),
}
