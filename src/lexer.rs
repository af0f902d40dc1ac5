//! Hand-written scanner for the terms of a linear expression.
//!
//! A term is `sign? digits? '.'? digits? variable`, with whitespace allowed after
//! the sign and between the coefficient and the variable. Everything that does not
//! start a term is skipped one byte at a time, so leftover text such as constants,
//! operators or typos never stops the scan.

use serde::{Deserialize, Serialize};

/// Which spellings count as a variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariablePattern {
    /// One ASCII letter followed by zero or more digits (`x`, `y2`, `x10`).
    #[default]
    Standard,
    /// `x` followed by at least one digit (`x1`, `x2`, ...).
    Indexed,
}

impl VariablePattern {
    /// Byte length of the variable name starting at `at`, if one starts there.
    fn match_variable(self, bytes: &[u8], at: usize) -> Option<usize> {
        let first = *bytes.get(at)?;
        let accepted = match self {
            VariablePattern::Standard => first.is_ascii_alphabetic(),
            VariablePattern::Indexed => first == b'x',
        };
        if !accepted {
            return None;
        }
        let digits = bytes[at + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        match self {
            VariablePattern::Indexed if digits == 0 => None,
            _ => Some(1 + digits),
        }
    }
}

/// Sign written in front of a term; `Implicit` when there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Implicit,
    Plus,
    Minus,
}

/// One term as it appears in the text, before any numeric interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermToken<'a> {
    /// Leading `+`/`-`, if any.
    pub sign: Sign,
    /// Digits and decimal point of the coefficient, empty when omitted.
    pub magnitude: &'a str,
    /// Variable name as written, matched by the scanner's [`VariablePattern`].
    pub variable: &'a str,
}

/// Iterator over the terms of `text`, leftmost first.
pub struct Scanner<'a> {
    text: &'a str,
    pattern: VariablePattern,
    position: usize,
}

pub fn scan(text: &str, pattern: VariablePattern) -> Scanner<'_> {
    Scanner {
        text,
        pattern,
        position: 0,
    }
}

/// Variable names in order of appearance, duplicates included.
pub fn variables(text: &str, pattern: VariablePattern) -> impl Iterator<Item = &str> {
    scan(text, pattern).map(|token| token.variable)
}

impl<'a> Scanner<'a> {
    fn skip_whitespace(bytes: &[u8], mut at: usize) -> usize {
        while bytes.get(at).is_some_and(u8::is_ascii_whitespace) {
            at += 1;
        }
        at
    }

    // Tries to read a whole term starting exactly at `start`.
    fn term_at(&self, start: usize) -> Option<(TermToken<'a>, usize)> {
        let bytes = self.text.as_bytes();
        if !bytes[start].is_ascii() {
            return None;
        }
        let mut at = start;
        let sign = match bytes[at] {
            b'+' => Sign::Plus,
            b'-' => Sign::Minus,
            _ => Sign::Implicit,
        };
        if sign != Sign::Implicit {
            at = Self::skip_whitespace(bytes, at + 1);
        }
        let magnitude_start = at;
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        if bytes.get(at) == Some(&b'.') {
            at += 1;
            while bytes.get(at).is_some_and(u8::is_ascii_digit) {
                at += 1;
            }
        }
        let magnitude = &self.text[magnitude_start..at];
        at = Self::skip_whitespace(bytes, at);
        let length = self.pattern.match_variable(bytes, at)?;
        let token = TermToken {
            sign,
            magnitude,
            variable: &self.text[at..at + length],
        };
        Some((token, at + length))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = TermToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.text.len() {
            match self.term_at(self.position) {
                Some((token, end)) => {
                    self.position = end;
                    return Some(token);
                }
                None => self.position += 1,
            }
        }
        None
    }
}
