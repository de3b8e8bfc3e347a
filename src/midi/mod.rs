//! MIDI output to the sampler, and the settings that pick the port.

pub mod config;
pub mod output;

pub use config::{Config, ConfigError};
pub use output::{list_ports, select_port, MidiOut, PortSelector};
