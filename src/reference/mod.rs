//! Trigger references — the instrument named in a pattern line's comment.
//!
//! A reference may be a note number, a pad label, an instrument alias or a
//! factory sound name. [`TriggerReference::classify`] decides which one a
//! token denotes, trying those four readings in that order. [`Resolver`]
//! turns the result into a note number and falls back to the kick pad when
//! nothing matches, so one bad reference never stops a pattern.

use std::fmt;

use tracing::{debug, warn};

use crate::library::{Library, Sound};
use crate::pad::{pad_to_note, PadRef};

/// Note used for references that cannot be resolved (pad `A.`).
pub const DEFAULT_NOTE: u8 = 36;

/// What a reference token denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerReference {
    /// A literal note number, 0–127.
    NoteNumber(u8),
    /// A pad label such as `A.` or `c7`.
    Pad(PadRef),
    /// An instrument alias and the pad it defaults to.
    Instrument { alias: String, pad: PadRef },
    /// A factory sound, matched by name.
    Sound(Sound),
}

impl TriggerReference {
    /// Classify a token. The first reading that matches wins:
    /// note number, pad label, instrument alias, sound name.
    pub fn classify(token: &str, library: &Library) -> Option<Self> {
        let token = strip_quotes(token.trim());
        if token.is_empty() {
            return None;
        }

        if token.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(n) = token.parse::<u8>().ok().filter(|n| *n <= 127) {
                return Some(TriggerReference::NoteNumber(n));
            }
        }

        if let Some(pad) = PadRef::parse(token) {
            return Some(TriggerReference::Pad(pad));
        }

        if let Some(pad) = library.kit.instrument_pad(token) {
            return Some(TriggerReference::Instrument {
                alias: token.to_string(),
                pad,
            });
        }

        library.sounds.find_by_name(token).map(TriggerReference::Sound)
    }

    /// The note this reference triggers. A sound that sits on no pad in the
    /// default kit has no note.
    pub fn note(&self, library: &Library) -> Option<u8> {
        match self {
            TriggerReference::NoteNumber(n) => Some(*n),
            TriggerReference::Pad(pad) => pad_to_note(*pad),
            TriggerReference::Instrument { pad, .. } => pad_to_note(*pad),
            TriggerReference::Sound(sound) => library
                .kit
                .pad_for_sound(sound.id)
                .and_then(pad_to_note),
        }
    }
}

impl fmt::Display for TriggerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerReference::NoteNumber(n) => write!(f, "note {n}"),
            TriggerReference::Pad(pad) => write!(f, "pad {pad}"),
            TriggerReference::Instrument { alias, pad } => write!(f, "{alias} (pad {pad})"),
            TriggerReference::Sound(sound) => write!(f, "sound {} #{}", sound.name, sound.id),
        }
    }
}

/// Outcome of resolving one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub note: u8,
    /// `false` when the note is the [`DEFAULT_NOTE`] fallback.
    pub recognized: bool,
    /// The classified reference, kept even when it yielded no note.
    pub reference: Option<TriggerReference>,
}

/// Resolves reference tokens against the lookup tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    library: Library,
}

impl Resolver {
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Resolve a token to a note. Never fails: unknown tokens give
    /// [`DEFAULT_NOTE`] with `recognized == false`.
    pub fn resolve(&self, token: &str) -> Resolution {
        let reference = TriggerReference::classify(token, &self.library);
        match reference.as_ref().and_then(|r| r.note(&self.library)) {
            Some(note) => {
                debug!(token, note, "resolved trigger reference");
                Resolution {
                    note,
                    recognized: true,
                    reference,
                }
            }
            None => {
                match &reference {
                    Some(r) => warn!(token, "{r} is not on any pad, defaulting to kick"),
                    None => warn!(token, "unrecognized reference, defaulting to kick"),
                }
                Resolution {
                    note: DEFAULT_NOTE,
                    recognized: false,
                    reference,
                }
            }
        }
    }
}

/// Pull the reference token out of a pattern-line comment: the first quoted
/// string if there is one, otherwise the first word.
pub fn extract_reference(comment: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(start) = comment.find(quote) {
            let rest = &comment[start + 1..];
            if let Some(len) = rest.find(quote).filter(|len| *len > 0) {
                return &rest[..len];
            }
        }
    }
    comment.split_whitespace().next().unwrap_or("")
}

fn strip_quotes(token: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = token
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(token: &str) -> Resolution {
        Resolver::default().resolve(token)
    }

    #[test]
    fn note_numbers_resolve_directly() {
        assert_eq!(resolve("36").note, 36);
        assert_eq!(resolve("0").note, 0);
        assert_eq!(resolve("127").note, 127);
        assert!(resolve("42").recognized);
    }

    #[test]
    fn out_of_range_number_falls_back() {
        let r = resolve("200");
        assert_eq!(r.note, DEFAULT_NOTE);
        assert!(!r.recognized);
    }

    #[test]
    fn signed_numbers_are_not_note_numbers() {
        assert!(!resolve("+40").recognized);
        assert!(!resolve("-1").recognized);
    }

    #[test]
    fn pad_labels() {
        assert_eq!(resolve("A.").note, 36);
        assert_eq!(resolve("b.").note, 48);
        assert_eq!(resolve("AFX").note, 38);
        assert_eq!(resolve("A9").note, 47);
        assert_eq!(resolve("D9").note, 83);
    }

    #[test]
    fn number_wins_over_other_readings() {
        let r = resolve("47");
        assert_eq!(r.reference, Some(TriggerReference::NoteNumber(47)));
    }

    #[test]
    fn instrument_aliases_use_default_pads() {
        assert_eq!(resolve("kick").note, 36);
        assert_eq!(resolve("snare").note, 40);
        assert_eq!(resolve("hi-hat").note, 43);
        assert_eq!(resolve("\"open hat\"").note, 46);
    }

    #[test]
    fn sound_names_map_through_their_pad() {
        // MICRO KICK sits on A.
        let r = resolve("\"MICRO KICK\"");
        assert_eq!(r.note, 36);
        assert!(r.recognized);
        // NT HH CLOSED sits on A5.
        assert_eq!(resolve("nt hh closed").note, 43);
        // PLING CHORD sits on C7.
        assert_eq!(resolve("PLING CHORD").note, 69);
    }

    #[test]
    fn partial_sound_names() {
        // "RIMSHOT" → "NT RIMSHOT" (shortest), which sits on A3.
        let r = resolve("rimshot");
        assert_eq!(r.note, 41);
        assert!(matches!(r.reference, Some(TriggerReference::Sound(s)) if s.id == 130));
    }

    #[test]
    fn sound_without_pad_is_unrecognized() {
        let r = resolve("\"NT KICK B\"");
        assert_eq!(r.note, DEFAULT_NOTE);
        assert!(!r.recognized);
        assert!(matches!(r.reference, Some(TriggerReference::Sound(_))));
    }

    #[test]
    fn unknown_reference_defaults_to_kick() {
        let r = resolve("NOTSOUND");
        assert_eq!(r.note, DEFAULT_NOTE);
        assert!(!r.recognized);
        assert_eq!(r.reference, None);
    }

    #[test]
    fn empty_reference_is_unrecognized() {
        assert!(!resolve("").recognized);
        assert!(!resolve("\"\"").recognized);
    }

    #[test]
    fn extract_prefers_quoted_text() {
        assert_eq!(extract_reference("\"MICRO KICK\" main"), "MICRO KICK");
        assert_eq!(extract_reference("'NT SNARE' backbeat"), "NT SNARE");
        assert_eq!(extract_reference("kick (bottom left pad)"), "kick");
        assert_eq!(extract_reference("  A5  "), "A5");
        assert_eq!(extract_reference(""), "");
    }

    #[test]
    fn classify_display() {
        let lib = Library::builtin();
        let r = TriggerReference::classify("a0", &lib).unwrap();
        assert_eq!(r.to_string(), "pad A0");
    }
}
