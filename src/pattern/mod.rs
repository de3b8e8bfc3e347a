//! Pattern notation — text → steps → resolved lines → merged timeline.
//!
//! ```text
//! x...x...x...x...  # kick
//! ....x.......x...  # A2
//! x.o.3.5.7.9.v127  # "NT HH CLOSED"
//! ```
//!
//! The lexer, parser and scheduler are pure; nothing here touches MIDI.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod schedule;
pub mod velocity;

pub use error::PatternError;
pub use lexer::{tokenize, Step};
pub use parser::{parse_pattern, ParsedPattern, PatternLine};
pub use schedule::{schedule, span, step_duration, StepEvent, StepGroup, Timeline};
pub use velocity::{decode, StepOutcome, VELOCITY_HIGH, VELOCITY_LOW};

use crate::reference::Resolver;

/// A parsed and scheduled pattern, ready for playback.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub parsed: ParsedPattern,
    pub timeline: Timeline,
}

/// Parse and schedule pattern text at `bpm`.
pub fn compile(text: &str, bpm: f64, resolver: &Resolver) -> Result<CompiledPattern, PatternError> {
    let parsed = parse_pattern(text, resolver);
    let timeline = schedule(&parsed.lines, bpm)?;
    Ok(CompiledPattern { parsed, timeline })
}

/// Help text for the pattern notation.
pub fn pattern_help() -> &'static str {
    "\
Pattern notation: one instrument per line, one character per sixteenth note.

  x X      hit, velocity 100
  o O      soft hit, velocity 60
  1-9      velocity from 14 (1) to 126 (9)
  v<n>     exact velocity, 1-3 digits (v64, v127); one step
  .        rest (any other character is also a rest)

Everything after '#' names what to play:

  # 36             MIDI note number
  # A.  # B3  # CFX  pad label
  # kick  # snare  # hi-hat  # \"open hat\"   instrument alias
  # \"MICRO KICK\"  # \"NT SNARE\"   sound name (partial names match)

Unrecognized references play on the kick pad (A., note 36) and are reported.

Example:
  x...x...x...x...  # kick
  ....x.......x...  # snare
  x.o.x.o.x.o.x.o.  # hi-hat
"
}
