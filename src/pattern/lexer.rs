//! Pattern lexer — splits a symbol run into rhythmic steps.
//!
//! Steps are counted by decoded symbol, not by character: `v64` is three
//! characters but one step.

use super::velocity::{decode, StepOutcome};

/// One decoded step of a pattern line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Ordinal position among the line's steps.
    pub index: usize,
    pub outcome: StepOutcome,
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    index: usize,
}

impl Lexer {
    pub fn new(symbols: &str) -> Self {
        Self {
            chars: symbols.chars().collect(),
            pos: 0,
            index: 0,
        }
    }

    /// Decode the whole run.
    pub fn tokenize(mut self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.chars.len());
        while let Some(step) = self.next_step() {
            steps.push(step);
        }
        steps
    }

    fn next_step(&mut self) -> Option<Step> {
        if self.pos >= self.chars.len() {
            return None;
        }
        let (outcome, consumed) = decode(&self.chars, self.pos);
        self.pos += consumed.max(1);
        let step = Step {
            index: self.index,
            outcome,
        };
        self.index += 1;
        Some(step)
    }
}

/// Tokenize one symbol run.
pub fn tokenize(symbols: &str) -> Vec<Step> {
    Lexer::new(symbols).tokenize()
}
