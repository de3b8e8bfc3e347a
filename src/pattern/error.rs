//! Errors for pattern scheduling.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    #[error("invalid tempo {0} BPM: must be a positive number")]
    InvalidTempo(f64),
    #[error("pattern of {steps} steps at {bpm} BPM is too long to play")]
    TooLong { steps: usize, bpm: f64 },
}
