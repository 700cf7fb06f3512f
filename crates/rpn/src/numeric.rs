//! Operand parsing and display formatting.
//!
//! Decimal grammar: optional leading `-`, a mantissa of digits with at most one
//! `.` and at least one digit, then optionally `E`, an optional sign and one or
//! more digits. Hex grammar: one or more of `0-9A-F`.
//!
//! Scientific output always has the shape `d.dddE±x`, so anything [`format`]
//! prints in a decimal base parses back under the decimal grammar.

use core::fmt::Write;

use platform::config::DISPLAY_TEXT_LEN;

use crate::error::NumericError;
use crate::settings::{CalculatorSettings, DisplayFormat, NumericBase};

/// Formatted register text.
pub type DisplayText = heapless::String<DISPLAY_TEXT_LEN>;

/// Magnitudes at or above this switch fixed-point display to scientific.
pub const FIX_LIMIT: f64 = 1e10;

/// Hex display covers magnitudes strictly below 2^31 - 1.
pub const HEX_LIMIT: f64 = 2_147_483_647.0;

/// Help notification raised while formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// Value too large for fixed point; shown in scientific
    ScientificFallback,
    /// Value too large for hex; shown in scientific
    HexOverflow,
}

impl Notice {
    /// Text for the LCD help line.
    pub const fn text(self) -> &'static str {
        match self {
            Self::ScientificFallback => "Sci: value >1E10",
            Self::HexOverflow => "Sci: hex >31 bit",
        }
    }
}

/// Result of [`format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: DisplayText,
    pub notice: Option<Notice>,
}

/// Parse operand text in `base`.
///
/// # Errors
///
/// [`NumericError::InvalidNumber`] when the text breaks the grammar,
/// [`NumericError::ValueOutOfRange`] when it parses to Inf or NaN.
pub fn parse(text: &str, base: NumericBase) -> Result<f64, NumericError> {
    let value = match base {
        NumericBase::Decimal => parse_decimal(text)?,
        NumericBase::Hex => parse_hex(text)?,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumericError::ValueOutOfRange)
    }
}

fn parse_decimal(text: &str) -> Result<f64, NumericError> {
    check_decimal(text)?;
    text.parse::<f64>().map_err(|_| NumericError::InvalidNumber)
}

fn check_decimal(text: &str) -> Result<(), NumericError> {
    let body = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match body.split_once('E') {
        Some((m, e)) => (m, Some(e)),
        None => (body, None),
    };

    let mut seen_digit = false;
    let mut seen_point = false;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return Err(NumericError::InvalidNumber),
        }
    }
    if !seen_digit {
        return Err(NumericError::InvalidNumber);
    }

    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NumericError::InvalidNumber);
        }
    }
    Ok(())
}

fn parse_hex(text: &str) -> Result<f64, NumericError> {
    if text.is_empty() {
        return Err(NumericError::InvalidNumber);
    }
    let mut value = 0.0_f64;
    for c in text.chars() {
        let digit = match c {
            '0'..='9' | 'A'..='F' => c.to_digit(16).ok_or(NumericError::InvalidNumber)?,
            _ => return Err(NumericError::InvalidNumber),
        };
        value = value * 16.0 + f64::from(digit);
    }
    Ok(value)
}

/// Format `value` for display under `settings`.
pub fn format(value: f64, settings: &CalculatorSettings) -> Formatted {
    // Never show "-0".
    let value = if value == 0.0 { 0.0 } else { value };
    let eng = settings.eng_precision.get();

    match settings.base {
        NumericBase::Hex if libm::fabs(value) < HEX_LIMIT => Formatted {
            text: hex(value),
            notice: None,
        },
        NumericBase::Hex => Formatted {
            text: scientific(value, eng),
            notice: Some(Notice::HexOverflow),
        },
        NumericBase::Decimal => match settings.format {
            DisplayFormat::Eng => Formatted {
                text: scientific(value, eng),
                notice: None,
            },
            DisplayFormat::Fix if libm::fabs(value) >= FIX_LIMIT => Formatted {
                text: scientific(value, eng),
                notice: Some(Notice::ScientificFallback),
            },
            DisplayFormat::Fix => Formatted {
                text: fixed(value, settings.fix_precision.get()),
                notice: None,
            },
        },
    }
}

// Output lengths: fixed at most 21 bytes (sign, 10 integer digits, point, 9
// decimals), scientific at most 17, hex at most 11. All fit DisplayText.

fn fixed(value: f64, precision: u8) -> DisplayText {
    let mut text = DisplayText::new();
    let _ = write!(text, "{:.*}", usize::from(precision), value);
    text
}

fn scientific(value: f64, precision: u8) -> DisplayText {
    let mut raw = DisplayText::new();
    let _ = write!(raw, "{:.*E}", usize::from(precision), value);

    let mut text = DisplayText::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        let _ = text.push(c);
        if c == 'E' && chars.peek().is_some_and(|n| *n != '-') {
            let _ = text.push('+');
        }
    }
    text
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // magnitude < 2^31 - 1
fn hex(value: f64) -> DisplayText {
    let magnitude = libm::trunc(libm::fabs(value)) as u32;
    let mut text = DisplayText::new();
    let sign = if value < 0.0 && magnitude != 0 { "-" } else { "" };
    let _ = write!(text, "{sign}0x{magnitude:X}");
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::Precision;

    fn settings(base: NumericBase, format: DisplayFormat, fix: u8, eng: u8) -> CalculatorSettings {
        CalculatorSettings {
            base,
            format,
            fix_precision: Precision::new(fix),
            eng_precision: Precision::new(eng),
            ..CalculatorSettings::default()
        }
    }

    #[test]
    fn test_parse_scientific_decimal() {
        assert_eq!(parse("3.14E+2", NumericBase::Decimal), Ok(314.0));
        assert_eq!(parse("-2.5E-1", NumericBase::Decimal), Ok(-0.25));
        assert_eq!(parse(".5", NumericBase::Decimal), Ok(0.5));
        assert_eq!(parse("7.", NumericBase::Decimal), Ok(7.0));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse("FF", NumericBase::Hex), Ok(255.0));
        assert_eq!(parse("0", NumericBase::Hex), Ok(0.0));
        assert_eq!(parse("1A2B", NumericBase::Hex), Ok(6699.0));
    }

    #[test]
    fn test_parse_rejects_bad_decimal() {
        for bad in ["", "-", ".", "1.2.3", "1E", "1E+", "1E2E3", "1E2.5", "E5", "12a", "1e5", "--1", "+1"] {
            assert_eq!(
                parse(bad, NumericBase::Decimal),
                Err(NumericError::InvalidNumber),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        for bad in ["", "ff", "G", "1.0", "-1", "0x10"] {
            assert_eq!(parse(bad, NumericBase::Hex), Err(NumericError::InvalidNumber));
        }
    }

    #[test]
    fn test_parse_overflow_is_out_of_range() {
        assert_eq!(
            parse("1E999", NumericBase::Decimal),
            Err(NumericError::ValueOutOfRange)
        );
    }

    #[test]
    fn test_format_fix() {
        let s = settings(NumericBase::Decimal, DisplayFormat::Fix, 2, 3);
        let f = format(3.14159, &s);
        assert_eq!(f.text.as_str(), "3.14");
        assert_eq!(f.notice, None);
        assert_eq!(format(-0.0, &s).text.as_str(), "0.00");
    }

    #[test]
    fn test_format_fix_falls_back_to_scientific() {
        let s = settings(NumericBase::Decimal, DisplayFormat::Fix, 2, 3);
        let f = format(12_345_678_901.0, &s);
        assert_eq!(f.text.as_str(), "1.235E+10");
        assert_eq!(f.notice, Some(Notice::ScientificFallback));
        assert!(format(9_999_999_999.0, &s).notice.is_none());
    }

    #[test]
    fn test_format_eng_always_scientific() {
        let s = settings(NumericBase::Decimal, DisplayFormat::Eng, 2, 3);
        assert_eq!(format(314.0, &s).text.as_str(), "3.140E+2");
        assert_eq!(format(-0.00125, &s).text.as_str(), "-1.250E-3");
        assert_eq!(format(0.0, &s).text.as_str(), "0.000E+0");
    }

    #[test]
    fn test_format_hex() {
        let s = settings(NumericBase::Hex, DisplayFormat::Fix, 2, 3);
        assert_eq!(format(255.0, &s).text.as_str(), "0xFF");
        assert_eq!(format(-26.7, &s).text.as_str(), "-0x1A");
        let big = format(4_294_967_296.0, &s);
        assert_eq!(big.text.as_str(), "4.295E+9");
        assert_eq!(big.notice, Some(Notice::HexOverflow));
        assert_eq!(format(HEX_LIMIT, &s).notice, Some(Notice::HexOverflow));
    }

    #[test]
    fn test_scientific_text_reparses() {
        let s = settings(NumericBase::Decimal, DisplayFormat::Eng, 2, 5);
        for v in [1.0, -7.25e-12, 6.02214e23, 0.5] {
            let text = format(v, &s).text;
            let back = parse(&text, NumericBase::Decimal).unwrap();
            assert!((back - v).abs() <= v.abs() * 1e-5, "{v} -> {text} -> {back}");
        }
    }
}
