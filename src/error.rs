//! The crate-wide error type and input validation helpers.

use std::path::PathBuf;

use thiserror::Error;

use crate::midi::ConfigError;
use crate::pattern::PatternError;
use crate::playback::{InvalidChannel, PlaybackError, TransportError};
use crate::scale::{NoteError, ScaleError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Channel(#[from] InvalidChannel),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid program {0}: must be between 0 and 127")]
    InvalidProgram(u8),
    #[error("unknown sound category '{name}'. Valid options: {valid}")]
    UnknownCategory { name: String, valid: String },
    #[error("invalid duration {0}: must be a finite number of seconds, zero or more")]
    InvalidDuration(f64),
    #[error("invalid note step '{0}': expected note[:velocity[:seconds]]")]
    InvalidStep(String),
    #[error("cannot read {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot encode JSON: {0}")]
    Json(#[source] serde_json::Error),
}

/// Seconds to a [`Duration`](std::time::Duration), rejecting negative and
/// non-finite values.
pub fn seconds(secs: f64) -> Result<std::time::Duration> {
    std::time::Duration::try_from_secs_f64(secs).map_err(|_| Error::InvalidDuration(secs))
}
