//! Scale interval table.

/// A named scale: semitone offsets from the root within one octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalePattern {
    pub name: &'static str,
    pub intervals: &'static [u8],
    pub description: &'static str,
}

pub const SCALE_PATTERNS: &[ScalePattern] = &[
    ScalePattern {
        name: "major",
        intervals: &[0, 2, 4, 5, 7, 9, 11],
        description: "Major scale (W-W-H-W-W-W-H)",
    },
    ScalePattern {
        name: "minor",
        intervals: &[0, 2, 3, 5, 7, 8, 10],
        description: "Natural minor scale (W-H-W-W-H-W-W)",
    },
    ScalePattern {
        name: "dorian",
        intervals: &[0, 2, 3, 5, 7, 9, 10],
        description: "Dorian mode (W-H-W-W-W-H-W)",
    },
    ScalePattern {
        name: "phrygian",
        intervals: &[0, 1, 3, 5, 7, 8, 10],
        description: "Phrygian mode (H-W-W-W-H-W-W)",
    },
    ScalePattern {
        name: "lydian",
        intervals: &[0, 2, 4, 6, 7, 9, 11],
        description: "Lydian mode (W-W-W-H-W-W-H)",
    },
    ScalePattern {
        name: "mixolydian",
        intervals: &[0, 2, 4, 5, 7, 9, 10],
        description: "Mixolydian mode (W-W-H-W-W-H-W)",
    },
    ScalePattern {
        name: "locrian",
        intervals: &[0, 1, 3, 5, 6, 8, 10],
        description: "Locrian mode (H-W-W-H-W-W-W)",
    },
    ScalePattern {
        name: "major_pentatonic",
        intervals: &[0, 2, 4, 7, 9],
        description: "Major pentatonic scale (major without 4th and 7th)",
    },
    ScalePattern {
        name: "minor_pentatonic",
        intervals: &[0, 3, 5, 7, 10],
        description: "Minor pentatonic scale (minor without 2nd and 6th)",
    },
    ScalePattern {
        name: "blues",
        intervals: &[0, 3, 5, 6, 7, 10],
        description: "Blues scale (minor pentatonic + flat 5th)",
    },
    ScalePattern {
        name: "chromatic",
        intervals: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        description: "Chromatic scale (all 12 semitones)",
    },
];

/// Look up a scale by name, ignoring case. `major pentatonic` and
/// `major-pentatonic` are accepted for `major_pentatonic`.
pub fn scale_pattern(name: &str) -> Option<&'static ScalePattern> {
    let key = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    SCALE_PATTERNS.iter().find(|p| p.name == key)
}
