//! Type system enforcement tests for the calculator's domain newtypes.
//! These newtypes keep out-of-range indices out of the register bank and the
//! audio tick configuration.

#![allow(clippy::unwrap_used)]

// ── MemorySlot ───────────────────────────────────────────────────────────────

#[test]
fn memory_slot_accepts_full_range() {
    use platform::MemorySlot;
    assert!(MemorySlot::new(0).is_ok());
    assert!(MemorySlot::new(42).is_ok());
    assert!(MemorySlot::new(99).is_ok());
}

#[test]
fn memory_slot_rejects_100() {
    use platform::MemorySlot;
    let err = MemorySlot::new(100).unwrap_err();
    assert_eq!(err.value, 100);
    assert_eq!(err.max, 99);
}

#[test]
fn memory_slot_is_one_byte() {
    use platform::MemorySlot;
    assert_eq!(core::mem::size_of::<MemorySlot>(), 1);
}

#[test]
fn memory_slot_count_matches_config() {
    use platform::MemorySlot;
    assert_eq!(MemorySlot::COUNT, platform::config::MEMORY_SLOTS);
    assert_eq!(usize::from(MemorySlot::MAX) + 1, MemorySlot::COUNT);
}

// ── Precision ────────────────────────────────────────────────────────────────

#[test]
fn precision_new_clamps_over_9() {
    use platform::Precision;
    assert_eq!(Precision::new(15).get(), 9);
    assert_eq!(Precision::new(3).get(), 3);
}

#[test]
fn precision_try_new_rejects_over_9() {
    use platform::Precision;
    assert!(Precision::try_new(10).is_err());
    assert!(Precision::try_new(9).is_ok());
    assert!(Precision::try_new(0).is_ok());
}

#[test]
fn precision_cycle_wraps_to_zero() {
    use platform::Precision;
    assert_eq!(Precision::new(8).cycle().get(), 9);
    assert_eq!(Precision::new(9).cycle().get(), 0);
}

#[test]
fn precision_fits_in_a_nibble() {
    use platform::Precision;
    assert!(Precision::MAX < 16);
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_accepts_common_wav_rates() {
    use platform::SampleRateHz;
    for hz in [8_000, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000] {
        assert!(SampleRateHz::new(hz).is_ok(), "{hz} Hz should be accepted");
    }
}

#[test]
fn sample_rate_rejects_below_minimum() {
    use platform::SampleRateHz;
    assert!(SampleRateHz::new(3_999).is_err());
    assert!(SampleRateHz::new(0).is_err());
}

#[test]
fn sample_rate_rejects_above_maximum() {
    use platform::SampleRateHz;
    let err = SampleRateHz::new(96_000).unwrap_err();
    assert_eq!(err.min, 4_000);
    assert_eq!(err.max, 48_000);
}

#[test]
fn sample_rate_period() {
    use platform::SampleRateHz;
    assert_eq!(SampleRateHz::new(8_000).unwrap().period_micros(), 125);
    assert_eq!(SampleRateHz::new(44_100).unwrap().period_micros(), 22);
}

// ── OutOfRangeError ──────────────────────────────────────────────────────────

#[test]
fn out_of_range_error_displays_bounds() {
    use platform::MemorySlot;
    let err = MemorySlot::new(200).unwrap_err();
    assert_eq!(err.to_string(), "200 outside 0..=99");
}
