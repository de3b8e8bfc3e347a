//! Scale engine — named scales as note lists, pad layouts and degree
//! sequences.
//!
//! Scales span two octaves upward from `root` in `octave` (C4 = 60).
//! Everything is validated before a note is sent: an unknown scale, a bad
//! root or an out-of-range degree fails the whole request.

pub mod error;
pub mod note;

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::info;

pub use error::ScaleError;
pub use note::{note_name, parse_note_name, parse_pitch_class, NoteError};

use crate::error::Error;
use crate::library::{scale_pattern, ScalePattern, SCALE_PATTERNS};
use crate::pad::{PadChannel, PadRef, PadSlot};
use crate::playback::{play_notes, NoteSink, NoteSpec, Pacer, PlaybackReport, Session};

/// Octaves generated above the root.
const OCTAVES: i32 = 2;

/// Pads a scale is laid out on, lowest note first. FX is left alone.
pub const SCALE_PAD_ORDER: [PadSlot; 11] = [
    PadSlot::Dot,
    PadSlot::Zero,
    PadSlot::Num(1),
    PadSlot::Num(2),
    PadSlot::Num(3),
    PadSlot::Num(4),
    PadSlot::Num(5),
    PadSlot::Num(6),
    PadSlot::Num(7),
    PadSlot::Num(8),
    PadSlot::Num(9),
];

/// A scale rooted at a concrete note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    pattern: &'static ScalePattern,
    base: u8,
    notes: Vec<u8>,
}

impl Scale {
    pub fn new(name: &str, root: &str, octave: i32) -> Result<Self, ScaleError> {
        let pattern = scale_pattern(name).ok_or_else(|| ScaleError::UnknownScale {
            name: name.to_string(),
            valid: SCALE_PATTERNS
                .iter()
                .map(|p| p.name)
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        let pitch_class =
            parse_pitch_class(root).map_err(|_| ScaleError::InvalidRoot(root.to_string()))?;

        let base = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|n| n.checked_add(i32::from(pitch_class)))
            .and_then(|n| u8::try_from(n).ok())
            .filter(|n| *n <= 127)
            .ok_or(ScaleError::OctaveOutOfRange(octave))?;

        let notes = (0..OCTAVES)
            .flat_map(|o| {
                pattern
                    .intervals
                    .iter()
                    .map(move |&step| i32::from(base) + i32::from(step) + 12 * o)
            })
            .filter_map(|n| u8::try_from(n).ok().filter(|n| *n <= 127))
            .collect();

        Ok(Self {
            pattern,
            base,
            notes,
        })
    }

    pub fn name(&self) -> &'static str {
        self.pattern.name
    }

    pub fn description(&self) -> &'static str {
        self.pattern.description
    }

    /// The root note in the requested octave.
    pub fn root_note(&self) -> u8 {
        self.base
    }

    /// Ascending notes, two octaves, anything above 127 dropped.
    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    /// The note for a 1-based scale degree. `0` is a rest; negative
    /// degrees step down from the root, so `-1` is the scale step below it.
    pub fn degree_note(&self, degree: i32) -> Result<Option<u8>, ScaleError> {
        let available = self.notes.len();
        let out_of_range = ScaleError::DegreeOutOfRange { degree, available };

        if degree == 0 {
            return Ok(None);
        }
        if degree > 0 {
            return self
                .notes
                .get(degree as usize - 1)
                .copied()
                .map(Some)
                .ok_or(out_of_range);
        }
        if degree.unsigned_abs() as usize > available {
            return Err(out_of_range);
        }

        let steps = self.pattern.intervals.len() as i32;
        let octave = degree.div_euclid(steps);
        let step = self.pattern.intervals[degree.rem_euclid(steps) as usize];
        let note = i32::from(self.base) + i32::from(step) + 12 * octave;
        u8::try_from(note)
            .map(Some)
            .map_err(|_| ScaleError::NoteOutOfRange { degree, note })
    }

    /// Lay the scale out on `channel`'s pads, lowest note on `.`.
    pub fn pads(&self, channel: PadChannel) -> BTreeMap<PadRef, u8> {
        SCALE_PAD_ORDER
            .iter()
            .zip(&self.notes)
            .map(|(&slot, &note)| (PadRef::new(channel, slot), note))
            .collect()
    }
}

/// Notes of `name` rooted at `root` in `octave`.
pub fn scale_notes(name: &str, root: &str, octave: i32) -> Result<Vec<u8>, ScaleError> {
    Ok(Scale::new(name, root, octave)?.notes)
}

/// Which note each pad of `channel` plays for the scale.
pub fn map_to_pads(
    channel: PadChannel,
    name: &str,
    root: &str,
    octave: i32,
) -> Result<BTreeMap<PadRef, u8>, ScaleError> {
    Ok(Scale::new(name, root, octave)?.pads(channel))
}

/// Resolve every degree up front; one bad degree rejects the sequence.
pub fn resolve_degrees(scale: &Scale, degrees: &[i32]) -> Result<Vec<Option<u8>>, ScaleError> {
    degrees.iter().map(|&d| scale.degree_note(d)).collect()
}

/// A sequence of scale degrees to play on one pad channel.
#[derive(Debug, Clone, Copy)]
pub struct ScaleSequence<'a> {
    pub channel: PadChannel,
    pub scale: &'a str,
    pub root: &'a str,
    pub octave: i32,
    pub degrees: &'a [i32],
    pub velocity: u8,
    /// Hold time of each note; rests last as long.
    pub duration: Duration,
    /// Silence between consecutive degrees.
    pub gap: Duration,
}

/// Play `sequence` one note at a time.
pub fn play_sequence<S: NoteSink, P: Pacer>(
    session: &mut Session<S, P>,
    sequence: &ScaleSequence<'_>,
) -> Result<PlaybackReport, Error> {
    let scale = Scale::new(sequence.scale, sequence.root, sequence.octave)?;
    let notes: Vec<NoteSpec> = resolve_degrees(&scale, sequence.degrees)?
        .into_iter()
        .map(|note| match note {
            Some(n) => NoteSpec::note(n, sequence.velocity, sequence.duration),
            None => NoteSpec::rest(sequence.duration),
        })
        .collect();

    info!(
        scale = scale.name(),
        root = sequence.root,
        octave = sequence.octave,
        channel = %sequence.channel,
        degrees = notes.len(),
        "playing scale sequence"
    );
    Ok(play_notes(session, &notes, sequence.gap)?)
}

/// Help text for scale mode.
pub fn scale_help() -> &'static str {
    "\
Scale mode: play melodies from scale degrees on a keys-mode channel.

Set the channel to keys mode on the device and pick the same scale there,
then:

  kopad scales                          list scales
  kopad scale-map A minor C             which note each pad plays
  kopad scale-play A major G 1 2 3 4 5 4 3 2 1

Scales: major, minor, dorian, phrygian, lydian, mixolydian, locrian,
major_pentatonic, minor_pentatonic, blues, chromatic.

Roots are pitch classes: C, C#, Db, ... B. Octave 3 is the default (C3 = 48);
use --octave to move it.

Degrees:
  1        the root
  2, 3...  further up the scale (two octaves are available)
  0        rest
  -1, -2   below the root

Options: --velocity (1-127), --duration (seconds each note is held),
--gap (seconds of silence between notes).

Example, a blues riff in E:
  kopad scale-play A blues E 1 3 4 3 1 0 5 4 3 5 1 --duration 0.15 --gap 0.05
"
}
