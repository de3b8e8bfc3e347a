//! Real-time pacing.

use std::thread;
use std::time::Duration;

/// Blocks the playback thread between trigger and release and across rests.
pub trait Pacer {
    fn wait(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}
