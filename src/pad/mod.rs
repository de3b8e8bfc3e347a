//! Pad layout — the fixed mapping between pad labels and MIDI note numbers.
//!
//! The device exposes four channels (A–D) of twelve pads each. Every channel
//! occupies one octave of note numbers starting at 36, 48, 60 and 72, and the
//! pads within a channel are numbered in the order `. 0 FX 1 2 3 4 5 6 7 8 9`:
//!
//! ```text
//! +----+----+----+
//! | A7 | A8 | A9 |   45 46 47
//! | A4 | A5 | A6 |   42 43 44
//! | A1 | A2 | A3 |   39 40 41
//! | A. | A0 | FX |   36 37 38
//! +----+----+----+
//! ```
//!
//! [`pad_to_note`] and [`note_to_pad`] are inverse pure functions over the 48
//! valid pads and the note range 36–83.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Lowest note number of the pad range (pad `A.`).
pub const FIRST_PAD_NOTE: u8 = 36;

/// Highest note number of the pad range (pad `D9`).
pub const LAST_PAD_NOTE: u8 = 83;

/// Pads per channel.
pub const PADS_PER_CHANNEL: u8 = 12;

/// One of the four pad banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PadChannel {
    A,
    B,
    C,
    D,
}

impl PadChannel {
    pub const ALL: [PadChannel; 4] = [PadChannel::A, PadChannel::B, PadChannel::C, PadChannel::D];

    /// Note number of the channel's `.` pad.
    pub fn base_note(self) -> u8 {
        match self {
            PadChannel::A => 36,
            PadChannel::B => 48,
            PadChannel::C => 60,
            PadChannel::D => 72,
        }
    }

    /// Parse a channel letter, ignoring case.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(PadChannel::A),
            'B' => Some(PadChannel::B),
            'C' => Some(PadChannel::C),
            'D' => Some(PadChannel::D),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PadChannel::A => 'A',
            PadChannel::B => 'B',
            PadChannel::C => 'C',
            PadChannel::D => 'D',
        }
    }
}

impl fmt::Display for PadChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for PadChannel {
    type Err = PadParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_letter(c).ok_or_else(|| PadParseError(s.to_string())),
            _ => Err(PadParseError(s.to_string())),
        }
    }
}

/// A pad position within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PadSlot {
    /// Bottom-left pad, labelled `.`.
    Dot,
    /// Bottom-middle pad, labelled `0`.
    Zero,
    /// Bottom-right pad, labelled `FX`.
    Fx,
    /// Numbered pads 1–9.
    Num(u8),
}

impl PadSlot {
    /// All twelve slots in note order.
    pub const ALL: [PadSlot; 12] = [
        PadSlot::Dot,
        PadSlot::Zero,
        PadSlot::Fx,
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

    /// Offset of this slot from the channel's base note (0–11).
    ///
    /// Returns `None` for a numbered slot outside 1–9.
    pub fn offset(self) -> Option<u8> {
        match self {
            PadSlot::Dot => Some(0),
            PadSlot::Zero => Some(1),
            PadSlot::Fx => Some(2),
            PadSlot::Num(n @ 1..=9) => Some(n + 2),
            PadSlot::Num(_) => None,
        }
    }

    /// Inverse of [`PadSlot::offset`].
    pub fn from_offset(offset: u8) -> Option<Self> {
        PadSlot::ALL.get(offset as usize).copied()
    }

    /// Parse the slot part of a pad label (`.`, `0`, `FX`, `1`–`9`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "." => Some(PadSlot::Dot),
            "0" => Some(PadSlot::Zero),
            _ if s.eq_ignore_ascii_case("fx") => Some(PadSlot::Fx),
            _ => match s.as_bytes() {
                [d @ b'1'..=b'9'] => Some(PadSlot::Num(d - b'0')),
                _ => None,
            },
        }
    }
}

impl fmt::Display for PadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadSlot::Dot => write!(f, "."),
            PadSlot::Zero => write!(f, "0"),
            PadSlot::Fx => write!(f, "FX"),
            PadSlot::Num(n) => write!(f, "{n}"),
        }
    }
}

/// A physical pad: channel plus slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadRef {
    pub channel: PadChannel,
    pub slot: PadSlot,
}

impl PadRef {
    pub fn new(channel: PadChannel, slot: PadSlot) -> Self {
        Self { channel, slot }
    }

    /// Parse a pad label matching `[A-D](\.|0|FX|[1-9])`, channel letter case-insensitive.
    pub fn parse(label: &str) -> Option<Self> {
        let mut chars = label.chars();
        let channel = PadChannel::from_letter(chars.next()?)?;
        let slot = PadSlot::parse(chars.as_str())?;
        Some(Self { channel, slot })
    }

    /// The note number this pad sends.
    pub fn note(self) -> Option<u8> {
        pad_to_note(self)
    }

    /// All 48 pads in note order.
    pub fn all() -> impl Iterator<Item = PadRef> {
        PadChannel::ALL
            .into_iter()
            .flat_map(|ch| PadSlot::ALL.into_iter().map(move |slot| PadRef::new(ch, slot)))
    }
}

impl fmt::Display for PadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.channel, self.slot)
    }
}

impl FromStr for PadRef {
    type Err = PadParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| PadParseError(s.to_string()))
    }
}

impl Serialize for PadRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A string that is not a valid pad or channel label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid pad label '{0}': expected A-D followed by '.', '0', 'FX' or 1-9")]
pub struct PadParseError(pub String);

/// Map a pad to its note number: `base(channel) + offset(slot)`.
pub fn pad_to_note(pad: PadRef) -> Option<u8> {
    pad.slot.offset().map(|offset| pad.channel.base_note() + offset)
}

/// Map a note number back to its pad. Notes outside 36–83 have no pad.
pub fn note_to_pad(note: u8) -> Option<PadRef> {
    if !(FIRST_PAD_NOTE..=LAST_PAD_NOTE).contains(&note) {
        return None;
    }
    let index = note - FIRST_PAD_NOTE;
    let channel = PadChannel::ALL[(index / PADS_PER_CHANNEL) as usize];
    let slot = PadSlot::from_offset(index % PADS_PER_CHANNEL)?;
    Some(PadRef::new(channel, slot))
}

/// Help text for pad labels, their notes and the default kit.
pub fn pad_help() -> &'static str {
    "\
Pads: four channels (A-D) of twelve pads, laid out like this on the device:

  +----+----+----+
  | A7 | A8 | A9 |   top row
  | A4 | A5 | A6 |
  | A1 | A2 | A3 |
  | A. | A0 | FX |   bottom row
  +----+----+----+

Each channel covers one octave of MIDI notes, in the order . 0 FX 1-9:

  A  36-47 (C2-B2)    A. 36  A0 37  AFX 38  A1 39 ... A9 47
  B  48-59 (C3-B3)    B. 48  B0 49  ...
  C  60-71 (C4-B4)    C. 60  C0 61  ...
  D  72-83 (C5-B5)    D. 72  D0 73  ...

Three numbers describe a pad: its label (A5), the note it sends (43) and
the factory sound loaded on it (200, NT HH CLOSED).

Default kit:
  A  drums and percussion: kicks and claps at the bottom, snares and hats
     in the middle, percussion and cymbals on top
  B  bass
  C  melodic and synth sounds
  D  not assigned

Patterns can name pads directly, which keeps working if sounds move:

  x...x...x...x...  # A.
  ....x.......x...  # A2
  x.x.x.x.x.x.x.x.  # A5

See `kopad pads` for every default assignment and `kopad categories` /
`kopad sounds <category>` to browse the library.
"
}
