//! Configuration — device selection and playback defaults loaded from ~/.kopad/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::playback::MidiChannel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Settings loaded from YAML. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred output port (exact name or substring). None = auto-detect.
    pub device_name: Option<String>,
    /// Output port by index, used when no name is set.
    pub port_index: Option<usize>,
    pub midi_channel: MidiChannel,
    pub bpm: f64,
    /// Octave scales start in when none is given.
    pub octave: i32,
    pub velocity: u8,
    /// Note hold time in seconds.
    pub note_duration: f64,
    /// Silence between sequential notes in seconds.
    pub note_gap: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_name: None,
            port_index: None,
            midi_channel: MidiChannel::default(),
            bpm: 120.0,
            octave: 3,
            velocity: 100,
            note_duration: 0.2,
            note_gap: 0.0,
        }
    }
}

impl Config {
    /// The standard location, `~/.kopad/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::home_dir()?.join(".kopad").join("config.yaml"))
    }

    /// Load config from the standard path.
    /// Returns None if the file doesn't exist or can't be parsed (graceful fallback).
    pub fn load() -> Option<Self> {
        let content = std::fs::read_to_string(Self::default_path()?).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Load config from an explicit path. Unlike [`Config::load`], a
    /// missing or malformed file is an error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.device_name.is_none());
        assert_eq!(config.midi_channel.number(), 1);
        assert_eq!(config.octave, 3);
        assert_eq!(config.velocity, 100);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_name: \"EP-133\"\nmidi_channel: 10\nbpm: 96").unwrap();

        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.device_name.as_deref(), Some("EP-133"));
        assert_eq!(config.midi_channel.number(), 10);
        assert_eq!(config.bpm, 96.0);
        assert_eq!(config.note_duration, 0.2);
        assert!(config.port_index.is_none());
    }

    #[test]
    fn bad_channel_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "midi_channel: 17").unwrap();
        assert!(matches!(
            Config::from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_path(dir.path().join("nope.yaml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn serialize_deserialize() {
        let config = Config {
            port_index: Some(2),
            ..Config::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_does_not_panic() {
        // ~/.kopad/config.yaml may or may not exist here
        let _ = Config::load();
    }
}
