//! Step scheduler — merges parallel pattern lines into one ordered timeline.

use std::time::Duration;

use super::error::PatternError;
use super::parser::PatternLine;

/// Steps per beat: every step is a sixteenth note.
pub const STEPS_PER_BEAT: f64 = 4.0;

/// One note to trigger at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub step: usize,
    pub note: u8,
    pub velocity: u8,
}

/// All events that start together at one step, in source-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepGroup {
    pub step: usize,
    pub events: Vec<StepEvent>,
}

/// The merged, time-ordered result of scheduling a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Non-empty groups in increasing step order.
    pub groups: Vec<StepGroup>,
    /// Total number of steps, including trailing rests.
    pub length: usize,
    pub step_duration: Duration,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of note events across all groups.
    pub fn event_count(&self) -> usize {
        self.groups.iter().map(|g| g.events.len()).sum()
    }

    /// Nominal playing time of the whole timeline.
    pub fn duration(&self) -> Duration {
        span(self.step_duration, self.length).unwrap_or(Duration::MAX)
    }
}

/// Length of one sixteenth-note step at `bpm`.
pub fn step_duration(bpm: f64) -> Result<Duration, PatternError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(PatternError::InvalidTempo(bpm));
    }
    Duration::try_from_secs_f64(60.0 / bpm / STEPS_PER_BEAT)
        .map_err(|_| PatternError::InvalidTempo(bpm))
}

/// `steps` consecutive steps of length `step`, or `None` on overflow.
pub fn span(step: Duration, steps: usize) -> Option<Duration> {
    u32::try_from(steps).ok().and_then(|n| step.checked_mul(n))
}

/// Merge `lines` into a [`Timeline`] at `bpm`.
///
/// Step `s` collects every line's hit at index `s`. Lines shorter than the
/// longest simply stop contributing; they do not wrap.
pub fn schedule(lines: &[PatternLine], bpm: f64) -> Result<Timeline, PatternError> {
    let step_duration = step_duration(bpm)?;
    let length = lines.iter().map(PatternLine::len).max().unwrap_or(0);
    if span(step_duration, length).is_none() {
        return Err(PatternError::TooLong { steps: length, bpm });
    }

    let mut groups = Vec::new();
    for step in 0..length {
        let events: Vec<StepEvent> = lines
            .iter()
            .filter_map(|line| {
                let velocity = line.steps.get(step)?.outcome.velocity()?;
                Some(StepEvent {
                    step,
                    note: line.note,
                    velocity,
                })
            })
            .collect();
        if !events.is_empty() {
            groups.push(StepGroup { step, events });
        }
    }

    Ok(Timeline {
        groups,
        length,
        step_duration,
    })
}
