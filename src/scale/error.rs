//! Errors for scale lookup and degree resolution.

use thiserror::Error;

/// A scale request that cannot be played. Raised before any note sounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("invalid scale name '{name}'. Valid options: {valid}")]
    UnknownScale { name: String, valid: String },
    #[error("invalid root note '{0}'. Valid options: A, B, C, D, E, F, G (with optional # or b)")]
    InvalidRoot(String),
    #[error("octave {0} puts the root outside the MIDI range")]
    OctaveOutOfRange(i32),
    #[error("scale degree {degree} is out of range: the scale has {available} notes")]
    DegreeOutOfRange { degree: i32, available: usize },
    #[error("scale degree {degree} gives note {note}, outside the MIDI range")]
    NoteOutOfRange { degree: i32, note: i32 },
}

