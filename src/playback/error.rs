//! Transport and playback errors.

use thiserror::Error;

/// The MIDI output could not be opened or refused a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no MIDI output ports available")]
    NoPorts,
    #[error("MIDI port matching '{0}' not found")]
    PortNotFound(String),
    #[error("invalid port index {index}: {available} ports available")]
    InvalidPortIndex { index: usize, available: usize },
    #[error("MIDI init: {0}")]
    Init(String),
    #[error("MIDI connect: {0}")]
    Connect(String),
    #[error("MIDI send: {0}")]
    Send(String),
    #[error("MIDI output not connected")]
    NotConnected,
}

/// Playback stopped because the sink failed mid-stream.
///
/// Steps already sent stay sent; notes triggered in the failing step were
/// released before this error was returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("playback aborted after {completed_steps} completed steps: {source}")]
pub struct PlaybackError {
    pub completed_steps: usize,
    pub events_played: usize,
    pub source: TransportError,
}
