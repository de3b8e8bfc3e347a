//! Real-time playback against a [`NoteSink`].

pub mod clock;
pub mod driver;
pub mod error;
pub mod pacer;
pub mod session;
pub mod sink;

pub use clock::{pulse_count, pulse_interval, run_clock, ClockReport, PULSES_PER_QUARTER};
pub use driver::{play_notes, play_pattern, play_timeline, NoteSpec, PlaybackReport};
pub use error::{PlaybackError, TransportError};
pub use pacer::{Pacer, ThreadPacer};
pub use session::Session;
pub use sink::{ClockMessage, DeviceSink, InvalidChannel, LogSink, MidiChannel, NoteSink};
