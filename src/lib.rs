//! kopad — text drum patterns and scale sequences played as MIDI on the
//! EP-133 K.O. II pad sampler.

pub mod controller;
pub mod error;
pub mod library;
pub mod midi;
pub mod pad;
pub mod pattern;
pub mod playback;
pub mod reference;
pub mod scale;

pub use controller::{Controller, NoteInput};
pub use error::{Error, Result};
