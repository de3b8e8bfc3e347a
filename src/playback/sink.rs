//! The note sink seam between the playback driver and a MIDI transport.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, trace};

use super::error::TransportError;

/// A MIDI channel, 1–16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MidiChannel(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid MIDI channel {0}: must be between 1 and 16")]
pub struct InvalidChannel(pub u8);

impl MidiChannel {
    pub fn new(channel: u8) -> Result<Self, InvalidChannel> {
        if (1..=16).contains(&channel) {
            Ok(Self(channel))
        } else {
            Err(InvalidChannel(channel))
        }
    }

    /// The 1-based channel number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// The 0-based channel nibble used on the wire.
    pub fn index(self) -> u8 {
        self.0 - 1
    }
}

impl Default for MidiChannel {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for MidiChannel {
    type Error = InvalidChannel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MidiChannel> for u8 {
    fn from(channel: MidiChannel) -> u8 {
        channel.0
    }
}

impl fmt::Display for MidiChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something that can start and stop notes.
///
/// `note` is 0–127 and `velocity` 1–127; the driver guarantees both.
pub trait NoteSink {
    fn trigger_note(
        &mut self,
        note: u8,
        velocity: u8,
        channel: MidiChannel,
    ) -> Result<(), TransportError>;

    fn release_note(&mut self, note: u8, channel: MidiChannel) -> Result<(), TransportError>;
}

impl<S: NoteSink + ?Sized> NoteSink for &mut S {
    fn trigger_note(
        &mut self,
        note: u8,
        velocity: u8,
        channel: MidiChannel,
    ) -> Result<(), TransportError> {
        (**self).trigger_note(note, velocity, channel)
    }

    fn release_note(&mut self, note: u8, channel: MidiChannel) -> Result<(), TransportError> {
        (**self).release_note(note, channel)
    }
}

impl<S: NoteSink + ?Sized> NoteSink for Box<S> {
    fn trigger_note(
        &mut self,
        note: u8,
        velocity: u8,
        channel: MidiChannel,
    ) -> Result<(), TransportError> {
        (**self).trigger_note(note, velocity, channel)
    }

    fn release_note(&mut self, note: u8, channel: MidiChannel) -> Result<(), TransportError> {
        (**self).release_note(note, channel)
    }
}

/// A system real-time message of the MIDI clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMessage {
    Start,
    Pulse,
    Stop,
}

impl ClockMessage {
    /// The single status byte sent on the wire.
    pub fn status(self) -> u8 {
        match self {
            ClockMessage::Start => 0xFA,
            ClockMessage::Pulse => 0xF8,
            ClockMessage::Stop => 0xFC,
        }
    }
}

/// A sink that also accepts program changes and clock messages.
pub trait DeviceSink: NoteSink {
    /// Switch the program (sample) on `channel`. `program` is 0–127.
    fn program_change(&mut self, program: u8, channel: MidiChannel) -> Result<(), TransportError>;

    fn clock(&mut self, message: ClockMessage) -> Result<(), TransportError>;
}

impl<S: DeviceSink + ?Sized> DeviceSink for &mut S {
    fn program_change(&mut self, program: u8, channel: MidiChannel) -> Result<(), TransportError> {
        (**self).program_change(program, channel)
    }

    fn clock(&mut self, message: ClockMessage) -> Result<(), TransportError> {
        (**self).clock(message)
    }
}

impl<S: DeviceSink + ?Sized> DeviceSink for Box<S> {
    fn program_change(&mut self, program: u8, channel: MidiChannel) -> Result<(), TransportError> {
        (**self).program_change(program, channel)
    }

    fn clock(&mut self, message: ClockMessage) -> Result<(), TransportError> {
        (**self).clock(message)
    }
}

/// A sink that only logs. Used for dry runs without a device.
#[derive(Debug, Default)]
pub struct LogSink {
    triggered: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes triggered so far.
    pub fn triggered(&self) -> usize {
        self.triggered
    }
}

impl NoteSink for LogSink {
    fn trigger_note(
        &mut self,
        note: u8,
        velocity: u8,
        channel: MidiChannel,
    ) -> Result<(), TransportError> {
        self.triggered += 1;
        info!(note, velocity, channel = channel.number(), "note on");
        Ok(())
    }

    fn release_note(&mut self, note: u8, channel: MidiChannel) -> Result<(), TransportError> {
        info!(note, channel = channel.number(), "note off");
        Ok(())
    }
}

impl DeviceSink for LogSink {
    fn program_change(&mut self, program: u8, channel: MidiChannel) -> Result<(), TransportError> {
        info!(program, channel = channel.number(), "program change");
        Ok(())
    }

    fn clock(&mut self, message: ClockMessage) -> Result<(), TransportError> {
        match message {
            ClockMessage::Pulse => trace!("clock pulse"),
            other => info!(message = ?other, "clock"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_bounds() {
        assert!(MidiChannel::new(0).is_err());
        assert!(MidiChannel::new(17).is_err());
        assert_eq!(MidiChannel::new(1).unwrap().index(), 0);
        assert_eq!(MidiChannel::new(16).unwrap().index(), 15);
        assert_eq!(MidiChannel::default().number(), 1);
    }

    #[test]
    fn channel_serde() {
        let ch: MidiChannel = serde_yaml::from_str("10").unwrap();
        assert_eq!(ch.number(), 10);
        assert!(serde_yaml::from_str::<MidiChannel>("0").is_err());
        assert_eq!(serde_yaml::to_string(&ch).unwrap().trim(), "10");
    }

    #[test]
    fn log_sink_counts_triggers() {
        let mut sink = LogSink::new();
        let ch = MidiChannel::default();
        sink.trigger_note(36, 100, ch).unwrap();
        sink.release_note(36, ch).unwrap();
        let boxed: &mut dyn NoteSink = &mut sink;
        boxed.trigger_note(38, 60, ch).unwrap();
        assert_eq!(sink.triggered(), 2);
    }

    #[test]
    fn clock_status_bytes() {
        assert_eq!(ClockMessage::Start.status(), 0xFA);
        assert_eq!(ClockMessage::Pulse.status(), 0xF8);
        assert_eq!(ClockMessage::Stop.status(), 0xFC);
    }

    #[test]
    fn boxed_device_sink_is_a_note_sink() {
        let mut sink: Box<dyn DeviceSink> = Box::new(LogSink::new());
        let ch = MidiChannel::default();
        sink.program_change(5, ch).unwrap();
        sink.clock(ClockMessage::Start).unwrap();
        sink.trigger_note(36, 100, ch).unwrap();
        sink.release_note(36, ch).unwrap();
    }
}
