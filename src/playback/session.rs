//! Playback session — the sink, pacing and channel one playback runs against.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::pacer::{Pacer, ThreadPacer};
use super::sink::{MidiChannel, NoteSink};

/// Everything a playback needs besides the notes themselves.
///
/// A session owns its sink exclusively, so two playbacks can never
/// interleave on the same output.
pub struct Session<S, P = ThreadPacer> {
    sink: S,
    pacer: P,
    channel: MidiChannel,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: NoteSink> Session<S, ThreadPacer> {
    /// A session that sleeps in real time on MIDI channel 1.
    pub fn new(sink: S) -> Self {
        Self::with_pacer(sink, ThreadPacer)
    }
}

impl<S: NoteSink, P: Pacer> Session<S, P> {
    pub fn with_pacer(sink: S, pacer: P) -> Self {
        Self {
            sink,
            pacer,
            channel: MidiChannel::default(),
            cancel: None,
        }
    }

    pub fn with_channel(mut self, channel: MidiChannel) -> Self {
        self.channel = channel;
        self
    }

    /// Stop between steps once `flag` becomes true.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn channel(&self) -> MidiChannel {
        self.channel
    }

    pub fn set_channel(&mut self, channel: MidiChannel) {
        self.channel = channel;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub(crate) fn parts(&mut self) -> (&mut S, &mut P, MidiChannel) {
        (&mut self.sink, &mut self.pacer, self.channel)
    }
}
