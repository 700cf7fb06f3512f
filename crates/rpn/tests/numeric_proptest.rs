//! Property-based tests for the operand codec.
//! Verifies invariants hold for ALL grammar-conforming inputs, not just fixed examples.

#![allow(clippy::unwrap_used, clippy::panic)]

use platform::Precision;
use rpn::{format, parse, CalculatorSettings, DisplayFormat, NumericBase};

fn settings(format: DisplayFormat, fix: u8, eng: u8) -> CalculatorSettings {
    CalculatorSettings {
        base: NumericBase::Decimal,
        format,
        fix_precision: Precision::new(fix),
        eng_precision: Precision::new(eng),
        ..CalculatorSettings::default()
    }
}

/// Largest error display rounding may introduce for `v` under `s`.
fn display_tolerance(v: f64, s: &CalculatorSettings) -> f64 {
    let scientific = s.format == DisplayFormat::Eng || v.abs() >= rpn::numeric::FIX_LIMIT;
    let slack = 1e-12 * v.abs().max(1.0);
    if scientific {
        v.abs() * 10f64.powi(-i32::from(s.eng_precision.get())) + slack
    } else {
        0.5 * 10f64.powi(-i32::from(s.fix_precision.get())) + slack
    }
}

proptest::proptest! {
    /// parse(format(parse(s))) reproduces the value within display precision.
    #[test]
    fn decimal_round_trip_within_precision(
        s in "-?[0-9]{1,7}(\\.[0-9]{0,5})?(E[+-]?[0-9]{1,2})?",
        fix in 0u8..=9,
        eng in 1u8..=9,
        eng_mode in proptest::bool::ANY,
    ) {
        let mode = if eng_mode { DisplayFormat::Eng } else { DisplayFormat::Fix };
        let cfg = settings(mode, fix, eng);
        let v = parse(&s, NumericBase::Decimal).unwrap();
        let text = format(v, &cfg).text;
        let back = parse(&text, NumericBase::Decimal)
            .unwrap_or_else(|e| panic!("{text:?} (from {s:?}) did not re-parse: {e:?}"));
        let tol = display_tolerance(v, &cfg);
        assert!((back - v).abs() <= tol, "{s:?} -> {v} -> {text:?} -> {back} (tol {tol})");
    }

    /// No input, in either base, parses to Inf or NaN.
    #[test]
    fn parse_never_yields_non_finite(s in "\\PC{0,24}", hex in proptest::bool::ANY) {
        let base = if hex { NumericBase::Hex } else { NumericBase::Decimal };
        if let Ok(v) = parse(&s, base) {
            assert!(v.is_finite(), "{s:?} parsed to {v}");
        }
    }

    /// Huge exponents are rejected as out of range, never returned.
    #[test]
    fn huge_exponent_is_out_of_range(m in 1u32..=9, e in 309u32..=999) {
        let s = format!("{m}E{e}");
        assert_eq!(parse(&s, NumericBase::Decimal), Err(rpn::NumericError::ValueOutOfRange));
    }

    /// Hex text of any u32 parses to that value.
    #[test]
    fn hex_matches_integer_value(n in 0u32..=u32::MAX) {
        let s = format!("{n:X}");
        assert_eq!(parse(&s, NumericBase::Hex), Ok(f64::from(n)));
    }

    /// Hex display re-parses (after stripping "0x") to the truncated magnitude.
    #[test]
    fn hex_display_round_trip(n in 0u32..2_147_483_647) {
        let cfg = CalculatorSettings { base: NumericBase::Hex, ..CalculatorSettings::default() };
        let text = format(f64::from(n), &cfg).text;
        let digits = text.strip_prefix("0x").unwrap();
        assert_eq!(parse(digits, NumericBase::Hex), Ok(f64::from(n)));
    }
}
