//! The command surface — typed commands over one playback session.
//!
//! Read-only commands answer from the lookup tables and never touch the
//! sink. Playback commands return a [`PlaybackReport`]; unrecognized
//! pattern references are reported, never raised.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::library::{Library, Sound, PHYSICAL_ROWS, SCALE_PATTERNS};
use crate::pad::{pad_help, PadChannel, PadRef};
use crate::pattern::{self, pattern_help};
use crate::playback::{
    self, ClockReport, DeviceSink, MidiChannel, NoteSink, NoteSpec, Pacer, PlaybackReport,
    Session, ThreadPacer,
};
use crate::reference::Resolver;
use crate::scale::{
    self, note_name, parse_note_name, scale_help, NoteError, Scale, ScaleSequence,
};

/// A note given as a number (`36`) or a name (`C3`, `F#4`, `Eb2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteInput {
    Number(u8),
    Name(String),
}

impl NoteInput {
    pub fn note(&self) -> Result<u8, NoteError> {
        match self {
            NoteInput::Number(n) if *n <= 127 => Ok(*n),
            NoteInput::Number(n) => Err(NoteError::OutOfRange(i32::from(*n))),
            NoteInput::Name(name) => parse_note_name(name),
        }
    }
}

impl FromStr for NoteInput {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let n: i32 = s.parse().map_err(|_| NoteError::InvalidName(s.to_string()))?;
            return u8::try_from(n)
                .ok()
                .filter(|n| *n <= 127)
                .map(NoteInput::Number)
                .ok_or(NoteError::OutOfRange(n));
        }
        parse_note_name(s)?;
        Ok(NoteInput::Name(s.to_string()))
    }
}

impl fmt::Display for NoteInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteInput::Number(n) => write!(f, "{n}"),
            NoteInput::Name(name) => f.write_str(name),
        }
    }
}

/// Parse one step of a sequential pattern, `note[:velocity[:seconds]]`,
/// e.g. `C4`, `38:80` or `E4:100:0.5`. Missing fields take the defaults.
pub fn parse_note_step(text: &str, velocity: u8, duration: Duration) -> Result<NoteSpec> {
    let mut fields = text.trim().split(':');
    let note: NoteInput = fields.next().unwrap_or_default().parse()?;
    let velocity = match fields.next() {
        Some(v) => v
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::InvalidStep(text.to_string()))?,
        None => velocity,
    };
    let duration = match fields.next() {
        Some(d) => crate::error::seconds(
            d.trim()
                .parse()
                .map_err(|_| Error::InvalidStep(text.to_string()))?,
        )?,
        None => duration,
    };
    if fields.next().is_some() {
        return Err(Error::InvalidStep(text.to_string()));
    }
    Ok(NoteSpec::note(note.note()?, velocity, duration))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: &'static str,
    pub sounds: usize,
}

/// One pad of the default kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PadAssignment {
    pub pad: PadRef,
    pub note: u8,
    pub sound_id: u16,
    /// The factory name, or `Unknown (<id>)`.
    pub sound_name: String,
    pub category: Option<&'static str>,
}

/// A channel's pads in physical rows, top row first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelLayout {
    pub channel: char,
    pub rows: Vec<Vec<PadAssignment>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleInfo {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PadNote {
    pub note: u8,
    pub note_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleMapping {
    pub scale: &'static str,
    pub root: String,
    pub octave: i32,
    pub channel: char,
    pub pads: BTreeMap<PadRef, PadNote>,
}

/// Commands against one sink.
pub struct Controller<S, P = ThreadPacer> {
    session: Session<S, P>,
    resolver: Resolver,
}

impl<S: NoteSink> Controller<S, ThreadPacer> {
    pub fn new(sink: S) -> Self {
        Self::with_session(Session::new(sink))
    }
}

impl<S: NoteSink, P: Pacer> Controller<S, P> {
    pub fn with_session(session: Session<S, P>) -> Self {
        Self {
            session,
            resolver: Resolver::new(Library::builtin()),
        }
    }

    pub fn session(&self) -> &Session<S, P> {
        &self.session
    }

    pub fn library(&self) -> &Library {
        self.resolver.library()
    }

    /// Run `f` on `channel` if given, restoring the session channel after.
    fn on_channel<T>(
        &mut self,
        channel: Option<MidiChannel>,
        f: impl FnOnce(&mut Session<S, P>) -> Result<T>,
    ) -> Result<T> {
        let previous = self.session.channel();
        if let Some(channel) = channel {
            self.session.set_channel(channel);
        }
        let result = f(&mut self.session);
        self.session.set_channel(previous);
        result
    }

    /// Play one note. `channel` overrides the session channel for this call only.
    pub fn play_note(
        &mut self,
        note: &NoteInput,
        velocity: u8,
        duration: Duration,
        channel: Option<MidiChannel>,
    ) -> Result<PlaybackReport> {
        let spec = NoteSpec::note(note.note()?, velocity, duration);
        self.on_channel(channel, |session| {
            Ok(playback::play_notes(session, &[spec], Duration::ZERO)?)
        })
    }

    /// Play notes back to back, each with its own velocity and hold time.
    pub fn play_pattern(
        &mut self,
        notes: &[NoteSpec],
        channel: Option<MidiChannel>,
    ) -> Result<PlaybackReport> {
        self.on_channel(channel, |session| {
            Ok(playback::play_notes(session, notes, Duration::ZERO)?)
        })
    }

    /// Parse, schedule and play a text drum pattern at `bpm`.
    pub fn play_drum_pattern(&mut self, text: &str, bpm: f64) -> Result<PlaybackReport> {
        let compiled = pattern::compile(text, bpm, &self.resolver)?;
        Ok(playback::play_pattern(&mut self.session, &compiled)?)
    }

    pub fn play_scale_sequence(&mut self, sequence: &ScaleSequence<'_>) -> Result<PlaybackReport> {
        scale::play_sequence(&mut self.session, sequence)
    }

    pub fn list_sound_categories(&self) -> Vec<CategorySummary> {
        self.library()
            .sounds
            .categories()
            .map(|c| CategorySummary {
                name: c.name,
                sounds: c.sounds.len(),
            })
            .collect()
    }

    pub fn list_sounds_in_category(&self, category: &str) -> Result<Vec<Sound>> {
        let sounds = self.library().sounds;
        let found = sounds.category(category).ok_or_else(|| Error::UnknownCategory {
            name: category.to_string(),
            valid: sounds.category_names().join(", "),
        })?;
        Ok(found
            .sounds
            .iter()
            .map(|&(id, name)| Sound {
                id,
                name,
                category: found.name,
            })
            .collect())
    }

    pub fn default_pad_configuration(&self) -> Vec<ChannelLayout> {
        let library = self.library();
        library
            .kit
            .channels()
            .map(|channel| ChannelLayout {
                channel: channel.letter(),
                rows: PHYSICAL_ROWS
                    .iter()
                    .map(|row| {
                        row.iter()
                            .filter_map(|&slot| {
                                let pad = PadRef::new(channel, slot);
                                let sound_id = library.kit.sound_at(pad)?;
                                let sound = library.sounds.sound(sound_id);
                                Some(PadAssignment {
                                    pad,
                                    note: pad.note()?,
                                    sound_id,
                                    sound_name: sound.map_or_else(
                                        || format!("Unknown ({sound_id})"),
                                        |s| s.name.to_string(),
                                    ),
                                    category: sound.map(|s| s.category),
                                })
                            })
                            .collect()
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn list_available_scales(&self) -> Vec<ScaleInfo> {
        SCALE_PATTERNS
            .iter()
            .map(|p| ScaleInfo {
                name: p.name,
                description: p.description,
            })
            .collect()
    }

    /// Which note each pad of `channel` plays for the scale.
    pub fn scale_mapping(
        &self,
        channel: PadChannel,
        scale: &str,
        root: &str,
        octave: i32,
    ) -> Result<ScaleMapping> {
        let resolved = Scale::new(scale, root, octave)?;
        Ok(ScaleMapping {
            scale: resolved.name(),
            root: root.trim().to_string(),
            octave,
            channel: channel.letter(),
            pads: resolved
                .pads(channel)
                .into_iter()
                .map(|(pad, note)| {
                    (
                        pad,
                        PadNote {
                            note,
                            note_name: note_name(note),
                        },
                    )
                })
                .collect(),
        })
    }

    pub fn pattern_help(&self) -> &'static str {
        pattern_help()
    }

    pub fn pad_configuration_help(&self) -> &'static str {
        pad_help()
    }

    pub fn scale_mode_help(&self) -> &'static str {
        scale_help()
    }
}

impl<S: DeviceSink, P: Pacer> Controller<S, P> {
    /// Switch the sample on the session channel, or on `channel` for this call only.
    pub fn program_change(&mut self, program: u8, channel: Option<MidiChannel>) -> Result<()> {
        if program > 127 {
            return Err(Error::InvalidProgram(program));
        }
        self.on_channel(channel, |session| {
            let (sink, _, channel) = session.parts();
            Ok(sink.program_change(program, channel)?)
        })
    }

    /// Drive the device's tempo with MIDI clock for `duration`.
    pub fn send_clock(&mut self, bpm: f64, duration: Duration) -> Result<ClockReport> {
        playback::run_clock(&mut self.session, bpm, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternError;
    use crate::playback::LogSink;

    struct NoWait;

    impl Pacer for NoWait {
        fn wait(&mut self, _: Duration) {}
    }

    fn controller() -> Controller<LogSink, NoWait> {
        Controller::with_session(Session::with_pacer(LogSink::new(), NoWait))
    }

    #[test]
    fn note_input_parsing() {
        assert_eq!("36".parse::<NoteInput>(), Ok(NoteInput::Number(36)));
        assert_eq!("C3".parse::<NoteInput>().unwrap().note(), Ok(48));
        assert_eq!("f#4".parse::<NoteInput>().unwrap().note(), Ok(66));
        assert_eq!("128".parse::<NoteInput>(), Err(NoteError::OutOfRange(128)));
        assert!("H2".parse::<NoteInput>().is_err());
    }

    #[test]
    fn note_steps() {
        let hold = Duration::from_millis(200);
        assert_eq!(
            parse_note_step("C4", 90, hold).unwrap(),
            NoteSpec::note(60, 90, hold)
        );
        assert_eq!(
            parse_note_step("38:200", 90, hold).unwrap(),
            NoteSpec::note(38, 127, hold)
        );
        assert_eq!(
            parse_note_step("E4:64:0.5", 90, hold).unwrap(),
            NoteSpec::note(64, 64, Duration::from_millis(500))
        );
        assert!(matches!(parse_note_step("C4:loud", 90, hold), Err(Error::InvalidStep(_))));
        assert!(matches!(parse_note_step("C4:1:-1", 90, hold), Err(Error::InvalidDuration(_))));
        assert!(matches!(parse_note_step("C4:1:1:1", 90, hold), Err(Error::InvalidStep(_))));
        assert!(matches!(parse_note_step("Z9", 90, hold), Err(Error::Note(_))));
    }

    #[test]
    fn channel_override_is_restored() {
        let mut c = controller();
        let ten = MidiChannel::new(10).unwrap();
        let report = c
            .play_note(&NoteInput::Number(60), 100, Duration::from_millis(1), Some(ten))
            .unwrap();
        assert_eq!(report.events_played, 1);
        assert_eq!(c.session().channel().number(), 1);
    }

    #[test]
    fn unknown_category_names_valid_ones() {
        let err = controller().list_sounds_in_category("polka").unwrap_err();
        match err {
            Error::UnknownCategory { valid, .. } => assert!(valid.contains("Kicks")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn category_lookup_ignores_case() {
        let sounds = controller().list_sounds_in_category("kicks").unwrap();
        assert!(!sounds.is_empty());
        assert!(sounds.iter().all(|s| s.category == "Kicks"));
    }

    #[test]
    fn pad_configuration_rows_run_top_to_bottom() {
        let layout = controller().default_pad_configuration();
        assert_eq!(layout.len(), 3);
        let a = &layout[0];
        assert_eq!(a.channel, 'A');
        assert_eq!(a.rows.len(), 4);
        let top: Vec<String> = a.rows[0].iter().map(|p| p.pad.to_string()).collect();
        assert_eq!(top, vec!["A7", "A8", "A9"]);
        let bottom = &a.rows[3];
        assert_eq!(bottom[0].pad.to_string(), "A.");
        assert_eq!(bottom[0].note, 36);
        assert_eq!(bottom[0].sound_id, 1);
    }

    #[test]
    fn scale_mapping_names_notes() {
        let mapping = controller()
            .scale_mapping(PadChannel::A, "major", "C", 4)
            .unwrap();
        let dot = &mapping.pads[&PadRef::parse("A.").unwrap()];
        assert_eq!(dot.note, 60);
        assert_eq!(dot.note_name, "C4");
        assert_eq!(mapping.pads.len(), 11);
    }

    #[test]
    fn scales_are_listed_in_table_order() {
        let scales = controller().list_available_scales();
        assert_eq!(scales.len(), 11);
        assert_eq!(scales[0].name, "major");
    }

    #[test]
    fn drum_pattern_reports_unresolved() {
        let mut c = controller();
        let report = c
            .play_drum_pattern("x...  # kick\n..x.  # NOTSOUND", 120.0)
            .unwrap();
        assert_eq!(report.events_played, 2);
        assert_eq!(report.unresolved, vec!["NOTSOUND".to_string()]);
        assert_eq!(c.session().sink().triggered(), 2);
    }

    #[test]
    fn program_change_is_validated() {
        let mut c = controller();
        c.program_change(12, None).unwrap();
        c.program_change(127, Some(MidiChannel::new(3).unwrap())).unwrap();
        assert!(matches!(
            c.program_change(128, None),
            Err(Error::InvalidProgram(128))
        ));
        assert_eq!(c.session().channel().number(), 1);
    }

    #[test]
    fn clock_rejects_bad_tempo() {
        let mut c = controller();
        let report = c.send_clock(120.0, Duration::from_millis(500)).unwrap();
        assert_eq!(report.pulses, 24);
        assert!(matches!(
            c.send_clock(0.0, Duration::from_secs(1)),
            Err(Error::Pattern(PatternError::InvalidTempo(_)))
        ));
    }

    #[test]
    fn help_texts() {
        let c = controller();
        assert!(c.pattern_help().contains("v<n>"));
        assert!(c.pad_configuration_help().contains("A. 36"));
        assert!(c.scale_mode_help().contains("minor_pentatonic"));
    }

    #[test]
    fn bad_tempo_is_rejected() {
        assert!(matches!(
            controller().play_drum_pattern("x...  # kick", 0.0),
            Err(Error::Pattern(_))
        ));
        let mut c = controller();
        assert!(matches!(
            c.play_drum_pattern("x...  # kick", 1e-19),
            Err(Error::Pattern(PatternError::InvalidTempo(_)))
        ));
        assert_eq!(c.session().sink().triggered(), 0);
    }
}
