//! Playback driver — walks a timeline and drives the sink in real time.
//!
//! Every group runs the same cycle: trigger all of its notes, hold for one
//! step, release them. Steps with no group are held as silence so the
//! rhythm survives. The hold is the only place the driver blocks.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use super::error::{PlaybackError, TransportError};
use super::pacer::Pacer;
use super::session::Session;
use super::sink::{MidiChannel, NoteSink};
use crate::pattern::{span, CompiledPattern, Timeline};

/// What a finished (or cancelled) playback did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaybackReport {
    /// Groups or sequence slots that ran their full cycle.
    pub steps_played: usize,
    /// Notes triggered.
    pub events_played: usize,
    /// References that resolved, with their notes, in line order.
    pub recognized: Vec<(String, u8)>,
    /// References that fell back to the kick pad.
    pub unresolved: Vec<String>,
    #[serde(rename = "elapsed_secs", serialize_with = "secs")]
    pub elapsed: Duration,
    /// Stopped early by the session's cancel flag.
    pub cancelled: bool,
}

fn secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl fmt::Display for PlaybackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "played {} notes over {} steps in {:.2}s",
            self.events_played,
            self.steps_played,
            self.elapsed.as_secs_f64()
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        if !self.unresolved.is_empty() {
            write!(
                f,
                "\nthese references were not recognized and defaulted to kick: {}",
                self.unresolved.join(", ")
            )?;
        }
        Ok(())
    }
}

/// One note of a sequential pattern. `note == None` is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteSpec {
    pub note: Option<u8>,
    pub velocity: u8,
    pub duration: Duration,
}

impl NoteSpec {
    /// A note with its velocity clamped to 1–127.
    pub fn note(note: u8, velocity: u8, duration: Duration) -> Self {
        Self {
            note: Some(note.min(127)),
            velocity: velocity.clamp(1, 127),
            duration,
        }
    }

    pub fn rest(duration: Duration) -> Self {
        Self {
            note: None,
            velocity: 0,
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.note.is_none()
    }
}

/// Trigger `notes` together, hold, then release them.
///
/// If a trigger fails, the notes already triggered are released before
/// the error is returned. Releases are attempted for every note even if
/// one fails; the first failure wins.
fn play_group<S, P>(
    sink: &mut S,
    pacer: &mut P,
    channel: MidiChannel,
    notes: &[(u8, u8)],
    hold: Duration,
) -> Result<(), TransportError>
where
    S: NoteSink + ?Sized,
    P: Pacer + ?Sized,
{
    for (i, &(note, velocity)) in notes.iter().enumerate() {
        if let Err(e) = sink.trigger_note(note, velocity, channel) {
            warn!(note, error = %e, "trigger failed, releasing held notes");
            release_all(sink, channel, &notes[..i]);
            return Err(e);
        }
    }

    pacer.wait(hold);

    match release_all(sink, channel, notes) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn release_all<S: NoteSink + ?Sized>(
    sink: &mut S,
    channel: MidiChannel,
    notes: &[(u8, u8)],
) -> Option<TransportError> {
    let mut first = None;
    for &(note, _) in notes {
        if let Err(e) = sink.release_note(note, channel) {
            warn!(note, error = %e, "release failed");
            first.get_or_insert(e);
        }
    }
    first
}

/// Play a scheduled timeline on the session's channel.
///
/// On a transport failure the remaining steps are abandoned and the error
/// reports how many groups completed.
pub fn play_timeline<S: NoteSink, P: Pacer>(
    session: &mut Session<S, P>,
    timeline: &Timeline,
) -> Result<PlaybackReport, PlaybackError> {
    let start = Instant::now();
    let step = timeline.step_duration;
    let mut report = PlaybackReport::default();
    let mut cursor = 0usize;
    debug!(
        steps = timeline.length,
        duration = ?timeline.duration(),
        "playing timeline"
    );

    for group in &timeline.groups {
        if session.is_cancelled() {
            info!(step = group.step, "playback cancelled");
            report.cancelled = true;
            break;
        }

        let (sink, pacer, channel) = session.parts();
        let rests = group.step.saturating_sub(cursor);
        if rests > 0 {
            pacer.wait(span(step, rests).unwrap_or(Duration::MAX));
        }

        let notes: Vec<(u8, u8)> = group.events.iter().map(|e| (e.note, e.velocity)).collect();
        debug!(step = group.step, notes = notes.len(), "step");
        play_group(sink, pacer, channel, &notes, step).map_err(|source| PlaybackError {
            completed_steps: report.steps_played,
            events_played: report.events_played,
            source,
        })?;

        report.steps_played += 1;
        report.events_played += notes.len();
        cursor = group.step + 1;
    }

    if !report.cancelled && cursor < timeline.length {
        let (_, pacer, _) = session.parts();
        pacer.wait(span(step, timeline.length - cursor).unwrap_or(Duration::MAX));
    }

    report.elapsed = start.elapsed();
    info!(
        events = report.events_played,
        steps = report.steps_played,
        "timeline finished"
    );
    Ok(report)
}

/// Play a compiled drum pattern, carrying its resolution results into the
/// report.
pub fn play_pattern<S: NoteSink, P: Pacer>(
    session: &mut Session<S, P>,
    pattern: &CompiledPattern,
) -> Result<PlaybackReport, PlaybackError> {
    let mut report = play_timeline(session, &pattern.timeline)?;
    report.recognized = pattern.parsed.recognized();
    report.unresolved = pattern.parsed.unresolved.clone();
    if !report.unresolved.is_empty() {
        warn!(
            unresolved = %report.unresolved.join(", "),
            "references not recognized, played on kick"
        );
    }
    Ok(report)
}

/// Play notes one after another, each held for its own duration, with
/// `gap` of silence between consecutive notes.
pub fn play_notes<S: NoteSink, P: Pacer>(
    session: &mut Session<S, P>,
    notes: &[NoteSpec],
    gap: Duration,
) -> Result<PlaybackReport, PlaybackError> {
    let start = Instant::now();
    let mut report = PlaybackReport::default();

    for (i, spec) in notes.iter().enumerate() {
        if session.is_cancelled() {
            info!(index = i, "sequence cancelled");
            report.cancelled = true;
            break;
        }

        let (sink, pacer, channel) = session.parts();
        if i > 0 {
            pacer.wait(gap);
        }

        match spec.note {
            Some(note) => {
                play_group(sink, pacer, channel, &[(note, spec.velocity)], spec.duration)
                    .map_err(|source| PlaybackError {
                        completed_steps: report.steps_played,
                        events_played: report.events_played,
                        source,
                    })?;
                report.events_played += 1;
            }
            None => pacer.wait(spec.duration),
        }
        report.steps_played += 1;
    }

    report.elapsed = start.elapsed();
    Ok(report)
}
