//! Stack registers and the keypad entry line.

use platform::config::INPUT_LINE_LEN;

use crate::error::NumericError;
use crate::numeric::{self, DisplayText, Notice};
use crate::settings::{CalculatorSettings, NumericBase};

/// One stack level: value plus its cached display text.
#[derive(Debug, Clone, PartialEq)]
pub struct Register {
    value: f64,
    text: DisplayText,
    displayed: bool,
}

impl Register {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            text: DisplayText::new(),
            displayed: false,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the value; the cached text is stale until [`Register::refresh`].
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.text.clear();
        self.displayed = false;
    }

    /// Re-format the cached text if it is stale.
    pub fn refresh(&mut self, settings: &CalculatorSettings) -> Option<Notice> {
        if !self.text.is_empty() {
            return None;
        }
        let formatted = numeric::format(self.value, settings);
        self.text = formatted.text;
        formatted.notice
    }

    /// Drop the cached text (e.g. after a base or precision change).
    pub fn invalidate(&mut self) {
        self.text.clear();
        self.displayed = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the current text has reached the LCD.
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn mark_displayed(&mut self) {
        self.displayed = true;
    }

    /// The register moved to another stack level; its text must be redrawn.
    pub fn mark_moved(&mut self) {
        self.displayed = false;
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Uncommitted operand text as typed on the keypad.
///
/// Never empty while it exists: an edit that would empty it ends the entry
/// instead (see [`InputLine::backspace`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    text: heapless::String<INPUT_LINE_LEN>,
    has_exponent: bool,
}

impl InputLine {
    /// Start a line with `first`.
    pub fn start(first: &str) -> Result<Self, NumericError> {
        let mut line = Self {
            text: heapless::String::new(),
            has_exponent: false,
        };
        line.push_str(first)?;
        Ok(line)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn has_exponent(&self) -> bool {
        self.has_exponent
    }

    /// Parse the line in `base`.
    pub fn value(&self, base: NumericBase) -> Result<f64, NumericError> {
        numeric::parse(&self.text, base)
    }

    fn push_str(&mut self, s: &str) -> Result<(), NumericError> {
        self.text.push_str(s).map_err(|_| NumericError::TooLong)
    }

    /// Append a digit character (`0-9`, or `A-F` in hex).
    pub fn push_digit(&mut self, digit: char) -> Result<(), NumericError> {
        self.text.push(digit).map_err(|_| NumericError::TooLong)
    }

    /// Append the decimal point; refused after the exponent or a second time.
    pub fn push_point(&mut self) -> Result<(), NumericError> {
        if self.has_exponent || self.text.contains('.') {
            return Err(NumericError::InvalidNumber);
        }
        self.push_str(".")
    }

    /// Append the exponent marker; refused a second time.
    pub fn push_exponent(&mut self) -> Result<(), NumericError> {
        if self.has_exponent {
            return Err(NumericError::InvalidNumber);
        }
        self.push_str("E")?;
        self.has_exponent = true;
        Ok(())
    }

    /// Toggle the exponent sign while an exponent is being typed, otherwise
    /// the mantissa sign.
    pub fn toggle_sign(&mut self) -> Result<(), NumericError> {
        let mut rebuilt: heapless::String<INPUT_LINE_LEN> = heapless::String::new();
        if self.has_exponent {
            let (mantissa, exp) = self.text.split_once('E').unwrap_or((self.text.as_str(), ""));
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(rest) => ("", rest),
                None => ("-", exp.strip_prefix('+').unwrap_or(exp)),
            };
            for part in [mantissa, "E", sign, digits] {
                rebuilt.push_str(part).map_err(|_| NumericError::TooLong)?;
            }
        } else {
            let (sign, body) = match self.text.strip_prefix('-') {
                Some(rest) => ("", rest),
                None => ("-", self.text.as_str()),
            };
            for part in [sign, body] {
                rebuilt.push_str(part).map_err(|_| NumericError::TooLong)?;
            }
        }
        self.text = rebuilt;
        Ok(())
    }

    /// Remove the last character. Returns `false` when the line would become
    /// empty (or hold only a sign), meaning the entry should end.
    pub fn backspace(&mut self) -> bool {
        if let Some(removed) = self.text.pop() {
            if removed == 'E' {
                self.has_exponent = false;
            }
        }
        !(self.text.is_empty() || self.text.as_str() == "-")
    }
}

/// Which representation of X is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Entry {
    /// The keypad line; register X still holds the previous value
    Pending(InputLine),
    /// Register X
    #[default]
    Committed,
}

impl Entry {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_text_cache() {
        let settings = CalculatorSettings::default();
        let mut r = Register::new(2.0);
        assert_eq!(r.text(), "");
        assert_eq!(r.refresh(&settings), None);
        assert_eq!(r.text(), "2.0000");
        r.mark_displayed();
        r.set(3.0);
        assert!(!r.is_displayed());
        assert_eq!(r.text(), "");
    }

    #[test]
    fn test_input_line_point_once() {
        let mut line = InputLine::start("1").unwrap();
        line.push_point().unwrap();
        assert_eq!(line.push_point(), Err(NumericError::InvalidNumber));
        line.push_digit('5').unwrap();
        assert_eq!(line.as_str(), "1.5");
    }

    #[test]
    fn test_input_line_sign_toggles() {
        let mut line = InputLine::start("12").unwrap();
        line.toggle_sign().unwrap();
        assert_eq!(line.as_str(), "-12");
        line.push_exponent().unwrap();
        line.push_digit('3').unwrap();
        line.toggle_sign().unwrap();
        assert_eq!(line.as_str(), "-12E-3");
        line.toggle_sign().unwrap();
        assert_eq!(line.as_str(), "-12E3");
    }

    #[test]
    fn test_input_line_backspace_ends_entry() {
        let mut line = InputLine::start("1").unwrap();
        line.push_exponent().unwrap();
        assert!(line.has_exponent());
        assert!(line.backspace());
        assert!(!line.has_exponent());
        assert!(!line.backspace());
    }

    #[test]
    fn test_input_line_length_limit() {
        let mut line = InputLine::start("1").unwrap();
        for _ in 1..INPUT_LINE_LEN {
            line.push_digit('9').unwrap();
        }
        assert_eq!(line.push_digit('9'), Err(NumericError::TooLong));
    }
}
