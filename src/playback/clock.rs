//! MIDI clock — Start, then 24 pulses per quarter note, then Stop.
//!
//! Lets the sampler's sequencer follow an external tempo. Pulses are paced
//! through the session's [`Pacer`], so tests run on a virtual clock.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use super::error::PlaybackError;
use super::pacer::Pacer;
use super::session::Session;
use super::sink::{ClockMessage, DeviceSink};
use crate::error::Result;
use crate::pattern::PatternError;

/// Clock pulses per quarter note.
pub const PULSES_PER_QUARTER: f64 = 24.0;

/// What a clock run sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClockReport {
    pub bpm: f64,
    pub pulses: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "secs")]
    pub elapsed: Duration,
    pub cancelled: bool,
}

fn secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl fmt::Display for ClockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent {} clock pulses at {} BPM in {:.2}s",
            self.pulses,
            self.bpm,
            self.elapsed.as_secs_f64()
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

/// Time between two pulses at `bpm`.
pub fn pulse_interval(bpm: f64) -> Result<Duration, PatternError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(PatternError::InvalidTempo(bpm));
    }
    Duration::try_from_secs_f64(60.0 / bpm / PULSES_PER_QUARTER)
        .map_err(|_| PatternError::InvalidTempo(bpm))
}

/// Whole pulses that fit in `duration` at `bpm`.
pub fn pulse_count(bpm: f64, duration: Duration) -> u64 {
    (duration.as_secs_f64() * bpm * PULSES_PER_QUARTER / 60.0).floor() as u64
}

/// Send Start, `pulse_count(bpm, duration)` pulses each followed by one
/// interval, then Stop.
///
/// Stop is sent even when a pulse fails or the run is cancelled.
pub fn run_clock<S: DeviceSink, P: Pacer>(
    session: &mut Session<S, P>,
    bpm: f64,
    duration: Duration,
) -> Result<ClockReport> {
    let interval = pulse_interval(bpm)?;
    let pulses = pulse_count(bpm, duration);
    let start = Instant::now();
    let mut report = ClockReport {
        bpm,
        ..ClockReport::default()
    };

    let failed = |sent: u64, source| PlaybackError {
        completed_steps: usize::try_from(sent).unwrap_or(usize::MAX),
        events_played: 0,
        source,
    };

    session
        .parts()
        .0
        .clock(ClockMessage::Start)
        .map_err(|e| failed(0, e))?;

    for _ in 0..pulses {
        if session.is_cancelled() {
            info!(sent = report.pulses, "clock cancelled");
            report.cancelled = true;
            break;
        }
        let (sink, pacer, _) = session.parts();
        if let Err(e) = sink.clock(ClockMessage::Pulse) {
            warn!(error = %e, "clock pulse failed, sending stop");
            let _ = sink.clock(ClockMessage::Stop);
            return Err(failed(report.pulses, e).into());
        }
        report.pulses += 1;
        pacer.wait(interval);
    }

    session
        .parts()
        .0
        .clock(ClockMessage::Stop)
        .map_err(|e| failed(report.pulses, e))?;

    report.elapsed = start.elapsed();
    info!(bpm, pulses = report.pulses, "clock finished");
    Ok(report)
}
