//! Reference range parsing and single-value classification.

use clinical_core::{RangeBound, SeverityTier};

use crate::record::parse_decimal;

/// Parse a `"min-max"` reference range such as `"70-110"` or `"36.1 - 37.2"`.
///
/// Grammar: `ws* NUMBER ws* '-' ws* NUMBER ws* UNIT?`, where `NUMBER` is
/// `DIGIT+ ('.' DIGIT*)?`. The unit suffix may carry digits (`"70-110 mg/dL"`,
/// `"3.5-5.0 x10^9/L"`) but must not continue the range or hold a second one.
/// Anything else yields `None`.
pub fn parse_range(text: &str) -> Option<RangeBound> {
    let mut cursor = Cursor::new(text);
    let (min, max) = cursor.min_max()?;

    let unit = cursor.remainder().trim_start();
    if unit.starts_with(['-', '.']) || holds_range(unit) {
        return None;
    }

    RangeBound::new(min, max)
}

fn holds_range(text: &str) -> bool {
    text.char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .any(|(start, _)| Cursor::new(&text[start..]).min_max().is_some())
}

/// Classify a measured value against an inclusive bound.
pub fn classify_value(value: Option<f64>, bound: Option<&RangeBound>) -> SeverityTier {
    let (Some(value), Some(bound)) = (value, bound) else {
        return SeverityTier::Unknown;
    };
    if !value.is_finite() {
        return SeverityTier::Unknown;
    }

    if bound.contains(value) {
        SeverityTier::Normal
    } else if value < bound.min {
        SeverityTier::Low
    } else {
        SeverityTier::High
    }
}

/// Classify a textual value against a textual range; any parse failure is `Unknown`.
pub fn classify_text(value: &str, range: &str) -> SeverityTier {
    let bound = parse_range(range);
    classify_value(parse_decimal(value), bound.as_ref())
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        if self.skip_digits() == 0 {
            return None;
        }
        if self.eat(b'.') {
            self.skip_digits();
        }
        let token = self.text[start..self.pos].trim_end_matches('.');
        token.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// `ws* NUMBER ws* '-' ws* NUMBER`, leaving the cursor after the second number.
    fn min_max(&mut self) -> Option<(f64, f64)> {
        self.skip_whitespace();
        let min = self.number()?;
        self.skip_whitespace();
        if !self.eat(b'-') {
            return None;
        }
        self.skip_whitespace();
        let max = self.number()?;
        Some((min, max))
    }

    fn remainder(&self) -> &'a str {
        &self.text[self.pos..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_trailing_dot_numbers() {
        let mut cursor = Cursor::new("5.-7");
        assert_eq!(cursor.number(), Some(5.0));
        assert!(cursor.eat(b'-'));
        assert_eq!(cursor.number(), Some(7.0));
        assert_eq!(cursor.remainder(), "");
    }

    #[test]
    fn second_range_is_found_anywhere_in_unit() {
        assert!(holds_range(", 3-4"));
        assert!(holds_range("(ref 10 - 20)"));
        assert!(!holds_range(" x10^9/L"));
        assert!(!holds_range(" mg/dL"));
    }

    #[test]
    fn cursor_rejects_leading_dot() {
        let mut cursor = Cursor::new(".5");
        assert_eq!(cursor.number(), None);
    }
}
