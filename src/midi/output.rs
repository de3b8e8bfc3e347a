//! MIDI output — opens a port on the sampler and sends notes, program
//! changes and clock.

use midir::{MidiOutput, MidiOutputConnection};
use tracing::{debug, info};

use crate::playback::{ClockMessage, DeviceSink, MidiChannel, NoteSink, TransportError};

const CLIENT_NAME: &str = "kopad";

/// Substrings that identify the sampler's port when none is requested.
const DEVICE_HINTS: [&str; 4] = ["ko", "ko-ii", "ep-133", "teenage"];

/// How to pick an output port.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PortSelector {
    /// Exact name first, then case-insensitive substring.
    Name(String),
    Index(usize),
    /// The first port that looks like the sampler, else the first port.
    #[default]
    Auto,
}

impl PortSelector {
    /// A name wins over an index; neither means auto-detect.
    pub fn from_options(name: Option<String>, index: Option<usize>) -> Self {
        match (name, index) {
            (Some(name), _) => PortSelector::Name(name),
            (None, Some(index)) => PortSelector::Index(index),
            (None, None) => PortSelector::Auto,
        }
    }
}

/// Pick a port from `names` according to `selector`.
pub fn select_port(names: &[String], selector: &PortSelector) -> Result<usize, TransportError> {
    if names.is_empty() {
        return Err(TransportError::NoPorts);
    }

    match selector {
        PortSelector::Name(wanted) => names
            .iter()
            .position(|n| n == wanted)
            .or_else(|| {
                let wanted = wanted.to_lowercase();
                names.iter().position(|n| n.to_lowercase().contains(&wanted))
            })
            .ok_or_else(|| TransportError::PortNotFound(wanted.clone())),
        PortSelector::Index(index) if *index < names.len() => Ok(*index),
        PortSelector::Index(index) => Err(TransportError::InvalidPortIndex {
            index: *index,
            available: names.len(),
        }),
        PortSelector::Auto => Ok(names
            .iter()
            .position(|n| {
                let n = n.to_lowercase();
                DEVICE_HINTS.iter().any(|hint| n.contains(hint))
            })
            .unwrap_or(0)),
    }
}

/// Names of all MIDI output ports.
pub fn list_ports() -> Result<Vec<String>, TransportError> {
    let midi_out =
        MidiOutput::new(CLIENT_NAME).map_err(|e| TransportError::Init(e.to_string()))?;
    Ok(midi_out
        .ports()
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect())
}

/// An open connection to one output port.
pub struct MidiOut {
    connection: Option<MidiOutputConnection>,
    port_name: String,
}

impl MidiOut {
    pub fn connect(selector: &PortSelector) -> Result<Self, TransportError> {
        let midi_out =
            MidiOutput::new(CLIENT_NAME).map_err(|e| TransportError::Init(e.to_string()))?;

        let ports = midi_out.ports();
        let names: Vec<String> = ports
            .iter()
            .map(|p| {
                midi_out
                    .port_name(p)
                    .unwrap_or_else(|_| "unknown".to_string())
            })
            .collect();

        let index = select_port(&names, selector)?;
        let port_name = names[index].clone();
        let connection = midi_out
            .connect(&ports[index], "kopad-out")
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        info!(port = %port_name, "connected to MIDI port");
        Ok(Self {
            connection: Some(connection),
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Close the port. Later sends fail with [`TransportError::NotConnected`].
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            info!(port = %self.port_name, "disconnected from MIDI port");
        }
    }

    fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        let connection = self
            .connection
            .as_mut()
            .ok_or(TransportError::NotConnected)?;
        connection
            .send(message)
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

impl Drop for MidiOut {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl NoteSink for MidiOut {
    fn trigger_note(
        &mut self,
        note: u8,
        velocity: u8,
        channel: MidiChannel,
    ) -> Result<(), TransportError> {
        debug!(note, velocity, channel = channel.number(), "note on");
        self.send(&note_on(channel, note, velocity))
    }

    fn release_note(&mut self, note: u8, channel: MidiChannel) -> Result<(), TransportError> {
        debug!(note, channel = channel.number(), "note off");
        self.send(&note_off(channel, note))
    }
}

impl DeviceSink for MidiOut {
    fn program_change(&mut self, program: u8, channel: MidiChannel) -> Result<(), TransportError> {
        info!(program, channel = channel.number(), "program change");
        self.send(&program_change_message(channel, program))
    }

    fn clock(&mut self, message: ClockMessage) -> Result<(), TransportError> {
        self.send(&[message.status()])
    }
}

fn note_on(channel: MidiChannel, note: u8, velocity: u8) -> [u8; 3] {
    [0x90 | channel.index(), note & 0x7F, velocity & 0x7F]
}

fn note_off(channel: MidiChannel, note: u8) -> [u8; 3] {
    [0x80 | channel.index(), note & 0x7F, 0]
}

fn program_change_message(channel: MidiChannel, program: u8) -> [u8; 2] {
    [0xC0 | channel.index(), program & 0x7F]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_ports() {
        assert_eq!(
            select_port(&[], &PortSelector::Auto),
            Err(TransportError::NoPorts)
        );
    }

    #[test]
    fn exact_name_beats_substring() {
        let ports = names(&["EP-133 MIDI 2", "EP-133"]);
        assert_eq!(
            select_port(&ports, &PortSelector::Name("EP-133".into())),
            Ok(1)
        );
    }

    #[test]
    fn substring_is_case_insensitive() {
        let ports = names(&["IAC Bus 1", "EP-133 K.O. II"]);
        assert_eq!(
            select_port(&ports, &PortSelector::Name("ep-133".into())),
            Ok(1)
        );
        assert_eq!(
            select_port(&ports, &PortSelector::Name("nope".into())),
            Err(TransportError::PortNotFound("nope".into()))
        );
    }

    #[test]
    fn index_is_bounds_checked() {
        let ports = names(&["a", "b"]);
        assert_eq!(select_port(&ports, &PortSelector::Index(1)), Ok(1));
        assert_eq!(
            select_port(&ports, &PortSelector::Index(2)),
            Err(TransportError::InvalidPortIndex { index: 2, available: 2 })
        );
    }

    #[test]
    fn auto_prefers_the_sampler() {
        let ports = names(&["IAC Bus 1", "Teenage Engineering EP-133"]);
        assert_eq!(select_port(&ports, &PortSelector::Auto), Ok(1));
        let ports = names(&["IAC Bus 1", "Midi Through"]);
        assert_eq!(select_port(&ports, &PortSelector::Auto), Ok(0));
    }

    #[test]
    fn selector_from_options() {
        assert_eq!(
            PortSelector::from_options(Some("ko".into()), Some(3)),
            PortSelector::Name("ko".into())
        );
        assert_eq!(PortSelector::from_options(None, Some(3)), PortSelector::Index(3));
        assert_eq!(PortSelector::from_options(None, None), PortSelector::Auto);
    }

    #[test]
    fn wire_messages() {
        let ch = MidiChannel::new(10).unwrap();
        assert_eq!(note_on(ch, 36, 100), [0x99, 36, 100]);
        assert_eq!(note_off(ch, 36), [0x89, 36, 0]);
        assert_eq!(note_on(MidiChannel::default(), 60, 127), [0x90, 60, 127]);
    }

    #[test]
    fn program_change_wire_message() {
        assert_eq!(program_change_message(MidiChannel::default(), 0), [0xC0, 0]);
        let ch = MidiChannel::new(16).unwrap();
        assert_eq!(program_change_message(ch, 127), [0xCF, 127]);
    }
}
