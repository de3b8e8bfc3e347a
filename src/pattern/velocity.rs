//! Velocity decoding for pattern symbols.
//!
//! | Symbol        | Velocity                         |
//! |---------------|----------------------------------|
//! | `x` `X`       | 100                              |
//! | `o` `O`       | 60                               |
//! | `1`–`9`       | `round(d * 126 / 9)`: 14 … 126   |
//! | `v` + 1–3 digits | the digits, clamped to 1–127  |
//! | anything else | rest                             |

/// Velocity of `x` / `X`.
pub const VELOCITY_HIGH: u8 = 100;

/// Velocity of `o` / `O`.
pub const VELOCITY_LOW: u8 = 60;

/// Longest digit run accepted after `v`.
const MAX_EXACT_DIGITS: usize = 3;

/// What one pattern step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Hit(u8),
    Rest,
}

impl StepOutcome {
    pub fn velocity(self) -> Option<u8> {
        match self {
            StepOutcome::Hit(v) => Some(v),
            StepOutcome::Rest => None,
        }
    }

    pub fn is_rest(self) -> bool {
        matches!(self, StepOutcome::Rest)
    }
}

/// Velocity for a scaled digit 1–9.
pub fn scaled_velocity(digit: u8) -> u8 {
    let v = (digit as f64 * 126.0 / 9.0).round();
    v.clamp(1.0, 127.0) as u8
}

/// Decode the symbol starting at `pos` in `symbols`.
///
/// Returns the outcome and how many characters it consumed. Every symbol is
/// one character except `v<digits>`, which takes `v` plus up to three digits.
/// A `v` with no digit after it is a one-character rest.
pub fn decode(symbols: &[char], pos: usize) -> (StepOutcome, usize) {
    let Some(&ch) = symbols.get(pos) else {
        return (StepOutcome::Rest, 0);
    };

    match ch {
        'x' | 'X' => (StepOutcome::Hit(VELOCITY_HIGH), 1),
        'o' | 'O' => (StepOutcome::Hit(VELOCITY_LOW), 1),
        '1'..='9' => (StepOutcome::Hit(scaled_velocity(ch as u8 - b'0')), 1),
        'v' => {
            let digits = symbols[pos + 1..]
                .iter()
                .take(MAX_EXACT_DIGITS)
                .take_while(|c| c.is_ascii_digit())
                .count();
            if digits == 0 {
                return (StepOutcome::Rest, 1);
            }
            let value = symbols[pos + 1..pos + 1 + digits]
                .iter()
                .fold(0u32, |acc, c| acc * 10 + (*c as u32 - '0' as u32));
            (StepOutcome::Hit(value.clamp(1, 127) as u8), 1 + digits)
        }
        _ => (StepOutcome::Rest, 1),
    }
}
