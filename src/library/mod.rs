//! Static lookup tables: factory sounds, default pad assignment, instrument
//! aliases and scale intervals.

pub mod kit;
pub mod scales;
pub mod sounds;

pub use kit::{DefaultKit, PHYSICAL_ROWS};
pub use scales::{scale_pattern, ScalePattern, SCALE_PATTERNS};
pub use sounds::{Sound, SoundCategory, SoundLibrary};

/// The read-only tables a resolver needs, bundled.
#[derive(Debug, Clone, Copy)]
pub struct Library {
    pub sounds: SoundLibrary,
    pub kit: DefaultKit,
}

impl Library {
    pub fn builtin() -> Self {
        Self {
            sounds: SoundLibrary::builtin(),
            kit: DefaultKit,
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::builtin()
    }
}
