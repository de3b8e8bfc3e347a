//! Pattern parser — multi-line pattern text to resolved [`PatternLine`]s.
//!
//! Each line is `<symbols>  # <reference>`. Lines without a comment still play
//! if they contain a hit, on the default kick pad.

use crate::reference::{extract_reference, Resolution, Resolver, DEFAULT_NOTE};

use super::lexer::{tokenize, Step};

/// Label used for lines that carry no reference comment.
pub const DEFAULT_LABEL: &str = "kick (default)";

/// One instrument line, tokenized and resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLine {
    /// 1-based line number in the source text.
    pub line_number: usize,
    pub steps: Vec<Step>,
    pub note: u8,
    /// Reference token as written (quotes stripped), or [`DEFAULT_LABEL`].
    pub label: String,
    /// `None` for lines without a comment.
    pub resolution: Option<Resolution>,
}

impl PatternLine {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn recognized(&self) -> bool {
        self.resolution.as_ref().map_or(true, |r| r.recognized)
    }
}

/// A parsed pattern plus the references that fell back to the kick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPattern {
    pub lines: Vec<PatternLine>,
    pub unresolved: Vec<String>,
}

impl ParsedPattern {
    /// `(label, note)` for every line whose reference resolved.
    pub fn recognized(&self) -> Vec<(String, u8)> {
        self.lines
            .iter()
            .filter(|l| l.resolution.as_ref().is_some_and(|r| r.recognized))
            .map(|l| (l.label.clone(), l.note))
            .collect()
    }
}

/// Parse pattern text, resolving each line's reference with `resolver`.
pub fn parse_pattern(text: &str, resolver: &Resolver) -> ParsedPattern {
    let mut parsed = ParsedPattern::default();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once('#') {
            Some((symbols, comment)) => {
                let token = extract_reference(comment.trim());
                let resolution = resolver.resolve(token);
                if !resolution.recognized {
                    let name = if token.is_empty() { comment.trim() } else { token };
                    parsed.unresolved.push(name.to_string());
                }
                parsed.lines.push(PatternLine {
                    line_number: i + 1,
                    steps: tokenize(symbols.trim()),
                    note: resolution.note,
                    label: token.to_string(),
                    resolution: Some(resolution),
                });
            }
            None => {
                let steps = tokenize(line);
                if steps.iter().all(|s| s.outcome.is_rest()) {
                    continue;
                }
                parsed.lines.push(PatternLine {
                    line_number: i + 1,
                    steps,
                    note: DEFAULT_NOTE,
                    label: DEFAULT_LABEL.to_string(),
                    resolution: None,
                });
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::velocity::StepOutcome;

    fn parse(text: &str) -> ParsedPattern {
        parse_pattern(text, &Resolver::default())
    }

    #[test]
    fn mixed_references() {
        let p = parse(
            "x...x...x...x...  # A.\n\
             ....x.......x...  # 40\n\
             x.x.x.x.x.x.x.x.  # hi-hat\n\
             ......x.........  # \"NT RIDE\"\n",
        );
        let notes: Vec<u8> = p.lines.iter().map(|l| l.note).collect();
        // NT RIDE sits on A8.
        assert_eq!(notes, vec![36, 40, 43, 46]);
        assert!(p.unresolved.is_empty());
        assert_eq!(p.lines[3].label, "NT RIDE");
    }

    #[test]
    fn unresolved_line_still_plays_on_kick() {
        let p = parse("x.x.  # NOTSOUND\n..x.  # snare");
        assert_eq!(p.lines.len(), 2);
        assert_eq!(p.lines[0].note, DEFAULT_NOTE);
        assert!(!p.lines[0].recognized());
        assert_eq!(p.unresolved, vec!["NOTSOUND".to_string()]);
        assert_eq!(p.recognized(), vec![("snare".to_string(), 40)]);
    }

    #[test]
    fn comment_takes_first_word() {
        let p = parse("x...  # kick (bottom left)");
        assert_eq!(p.lines[0].label, "kick");
        assert_eq!(p.lines[0].note, 36);
    }

    #[test]
    fn blank_lines_skipped_and_numbers_kept() {
        let p = parse("\n\n  x...  # A1\n\n..x.  # A2\n");
        assert_eq!(p.lines.len(), 2);
        assert_eq!(p.lines[0].line_number, 3);
        assert_eq!(p.lines[1].line_number, 5);
    }

    #[test]
    fn uncommented_hit_line_defaults_to_kick() {
        let p = parse("x...o...");
        assert_eq!(p.lines.len(), 1);
        assert_eq!(p.lines[0].note, DEFAULT_NOTE);
        assert_eq!(p.lines[0].label, DEFAULT_LABEL);
        assert!(p.lines[0].recognized());
        assert!(p.unresolved.is_empty());
    }

    #[test]
    fn uncommented_rest_line_is_ignored() {
        let p = parse("........\n----");
        assert!(p.lines.is_empty());
    }

    #[test]
    fn empty_comment_is_unresolved() {
        let p = parse("x...  #   ");
        assert_eq!(p.lines.len(), 1);
        assert_eq!(p.unresolved, vec![String::new()]);
    }

    #[test]
    fn symbols_are_tokenized_per_line() {
        let p = parse("v64.x  # snare");
        let outcomes: Vec<StepOutcome> = p.lines[0].steps.iter().map(|s| s.outcome).collect();
        assert_eq!(
            outcomes,
            vec![StepOutcome::Hit(64), StepOutcome::Rest, StepOutcome::Hit(100)]
        );
    }
}
