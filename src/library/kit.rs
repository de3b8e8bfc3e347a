//! Default kit — which factory sound sits on which pad, and the instrument
//! aliases that name those pads.

use crate::pad::{PadChannel, PadRef, PadSlot};

/// Physical row order, top to bottom.
pub const PHYSICAL_ROWS: [[PadSlot; 3]; 4] = [
    [PadSlot::Num(7), PadSlot::Num(8), PadSlot::Num(9)],
    [PadSlot::Num(4), PadSlot::Num(5), PadSlot::Num(6)],
    [PadSlot::Num(1), PadSlot::Num(2), PadSlot::Num(3)],
    [PadSlot::Dot, PadSlot::Zero, PadSlot::Fx],
];

/// Sound ids per channel, laid out like [`PHYSICAL_ROWS`].
const DEFAULT_ASSIGNMENT: [(PadChannel, [[u16; 3]; 4]); 3] = [
    (
        PadChannel::A,
        [[343, 235, 247], [317, 200, 218], [100, 114, 130], [1, 21, 300]],
    ),
    (
        PadChannel::B,
        [[445, 450, 455], [430, 435, 440], [415, 420, 425], [400, 405, 410]],
    ),
    (
        PadChannel::C,
        [[545, 550, 555], [530, 353, 540], [515, 520, 525], [500, 505, 510]],
    ),
];

/// Normalized alias → pad slot on channel A.
const INSTRUMENT_ALIASES: &[(&str, PadSlot)] = &[
    ("kick", PadSlot::Dot),
    ("bd", PadSlot::Dot),
    ("bassdrum", PadSlot::Dot),
    ("snare", PadSlot::Num(2)),
    ("sd", PadSlot::Num(2)),
    ("clap", PadSlot::Num(3)),
    ("cp", PadSlot::Num(3)),
    ("lowtom", PadSlot::Num(4)),
    ("hihat", PadSlot::Num(5)),
    ("hh", PadSlot::Num(5)),
    ("chh", PadSlot::Num(5)),
    ("closedhihat", PadSlot::Num(5)),
    ("closedhat", PadSlot::Num(5)),
    ("midtom", PadSlot::Num(6)),
    ("hightom", PadSlot::Num(7)),
    ("perc", PadSlot::Num(7)),
    ("percussion", PadSlot::Num(7)),
    ("openhihat", PadSlot::Num(8)),
    ("openhat", PadSlot::Num(8)),
    ("ohh", PadSlot::Num(8)),
    ("ride", PadSlot::Num(8)),
    ("crash", PadSlot::Num(9)),
    ("cymbal", PadSlot::Num(9)),
];

/// Read-only view of the factory pad assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKit;

impl DefaultKit {
    /// The sound assigned to a pad, if the channel has a default assignment.
    pub fn sound_at(&self, pad: PadRef) -> Option<u16> {
        let (_, rows) = DEFAULT_ASSIGNMENT
            .iter()
            .find(|(channel, _)| *channel == pad.channel)?;
        PHYSICAL_ROWS.iter().zip(rows).find_map(|(slots, ids)| {
            slots
                .iter()
                .position(|slot| *slot == pad.slot)
                .map(|col| ids[col])
        })
    }

    /// The first pad (channel order, then top-to-bottom rows) holding `sound_id`.
    pub fn pad_for_sound(&self, sound_id: u16) -> Option<PadRef> {
        DEFAULT_ASSIGNMENT.iter().find_map(|(channel, rows)| {
            PHYSICAL_ROWS.iter().zip(rows).find_map(|(slots, ids)| {
                ids.iter()
                    .position(|id| *id == sound_id)
                    .map(|col| PadRef::new(*channel, slots[col]))
            })
        })
    }

    /// Channels that carry a default assignment.
    pub fn channels(&self) -> impl Iterator<Item = PadChannel> {
        DEFAULT_ASSIGNMENT.iter().map(|(channel, _)| *channel)
    }

    /// The default pad for an instrument alias such as `kick`, `Hi-Hat` or `open hat`.
    pub fn instrument_pad(&self, alias: &str) -> Option<PadRef> {
        let key = normalize_alias(alias);
        INSTRUMENT_ALIASES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, slot)| PadRef::new(PadChannel::A, *slot))
    }
}

fn normalize_alias(alias: &str) -> String {
    alias
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
