//! Note names — "C2", "Eb4", "F#3" to MIDI note numbers and back.

use thiserror::Error;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("invalid pitch class '{0}': expected A-G with optional # or b")]
    InvalidPitchClass(String),
    #[error("invalid note name '{0}': expected e.g. C3, F#4, Eb2")]
    InvalidName(String),
    #[error("note {0} is out of MIDI range (0-127)")]
    OutOfRange(i32),
}

/// Split a leading pitch class off `s`, returning its semitone offset from
/// C (-1 for `Cb` up to 12 for `B#`) and the rest of the string. The letter
/// is case-insensitive.
fn split_pitch_class(s: &str) -> Option<(i32, &str)> {
    let mut chars = s.chars();
    let base: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, rest) = if let Some(r) = rest.strip_prefix('#') {
        (1, r)
    } else if let Some(r) = rest.strip_prefix('b') {
        (-1, r)
    } else {
        (0, rest)
    };

    Some((base + accidental, rest))
}

/// Parse a bare pitch class such as `C`, `f#` or `Eb` to its semitone,
/// 0–11. `Cb` and `B#` wrap around the octave.
pub fn parse_pitch_class(name: &str) -> Result<u8, NoteError> {
    match split_pitch_class(name.trim()) {
        Some((semitone, "")) => Ok(semitone.rem_euclid(12) as u8),
        _ => Err(NoteError::InvalidPitchClass(name.to_string())),
    }
}

/// Parse a note name into a MIDI note number.
///
/// Format: `<letter><optional accidental><octave>`, octave -1 to 9,
/// C4 = middle C = 60.
pub fn parse_note_name(name: &str) -> Result<u8, NoteError> {
    let invalid = || NoteError::InvalidName(name.to_string());
    let (semitone, octave) = split_pitch_class(name.trim()).ok_or_else(invalid)?;
    let octave: i32 = octave.parse().map_err(|_| invalid())?;

    // C-1 = 0; Cb4 is B3, not B4
    let midi = (octave + 1) * 12 + semitone;
    u8::try_from(midi)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or(NoteError::OutOfRange(midi))
}

/// The name of a MIDI note, sharps only: 60 → "C4", 61 → "C#4".
pub fn note_name(note: u8) -> String {
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", NOTE_NAMES[usize::from(note % 12)], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c() {
        assert_eq!(parse_note_name("C4"), Ok(60));
        assert_eq!(parse_note_name("c4"), Ok(60));
    }

    #[test]
    fn accidentals() {
        assert_eq!(parse_note_name("Eb2"), Ok(39));
        assert_eq!(parse_note_name("F#3"), Ok(54));
        assert_eq!(parse_note_name("Bb3"), Ok(58));
        assert_eq!(parse_note_name("Cb4"), Ok(59));
        assert_eq!(parse_note_name("B#3"), Ok(60));
    }

    #[test]
    fn range_ends() {
        assert_eq!(parse_note_name("C-1"), Ok(0));
        assert_eq!(parse_note_name("G9"), Ok(127));
        assert_eq!(parse_note_name("G#9"), Err(NoteError::OutOfRange(128)));
        assert_eq!(parse_note_name("Cb-1"), Err(NoteError::OutOfRange(-1)));
    }

    #[test]
    fn malformed_names() {
        assert!(matches!(parse_note_name(""), Err(NoteError::InvalidName(_))));
        assert!(matches!(parse_note_name("X4"), Err(NoteError::InvalidName(_))));
        assert!(matches!(parse_note_name("C"), Err(NoteError::InvalidName(_))));
        assert!(matches!(parse_note_name("C#x"), Err(NoteError::InvalidName(_))));
    }

    #[test]
    fn pitch_classes() {
        assert_eq!(parse_pitch_class("C"), Ok(0));
        assert_eq!(parse_pitch_class("f#"), Ok(6));
        assert_eq!(parse_pitch_class("Eb"), Ok(3));
        assert_eq!(parse_pitch_class("Cb"), Ok(11));
        assert_eq!(parse_pitch_class("B#"), Ok(0));
        assert!(parse_pitch_class("H").is_err());
        assert!(parse_pitch_class("C4").is_err());
        assert!(parse_pitch_class("").is_err());
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(127), "G9");
        for n in 0..=127u8 {
            assert_eq!(parse_note_name(&note_name(n)), Ok(n));
        }
    }
}
