//! Audio output abstraction

/// Fixed-rate sample output (PWM DAC on the board).
///
/// `write_sample` is called from the fixed-rate consumer tick, once per tick,
/// so implementations must not block or allocate.
pub trait AudioOutput {
    /// Arm the fixed-rate trigger at `tick_hz` and enable the output stage
    fn start(&mut self, tick_hz: u32);

    /// Emit one signed 16-bit sample
    fn write_sample(&mut self, sample: i16);

    /// Disarm the trigger and park the output at mid-scale
    fn stop(&mut self);
}

/// Map a signed 16-bit sample onto an unsigned PWM duty of `bits` resolution.
///
/// `bits` is clamped to 1..=16.
#[must_use]
#[allow(clippy::cast_sign_loss)] // offset by 0x8000 first: value is always in 0..=0xFFFF
#[allow(clippy::cast_possible_truncation)] // shifted right by (16 - bits): fits u16
pub fn sample_to_duty(sample: i16, bits: u8) -> u16 {
    let bits = bits.clamp(1, 16);
    let unsigned = (i32::from(sample).wrapping_add(0x8000)) as u32;
    (unsigned >> (16_u8.saturating_sub(bits))) as u16
}

#[cfg(test)]
mod tests {
    use super::sample_to_duty;

    #[test]
    fn test_duty_midscale_for_silence() {
        assert_eq!(sample_to_duty(0, 10), 512);
    }

    #[test]
    fn test_duty_extremes() {
        assert_eq!(sample_to_duty(i16::MIN, 10), 0);
        assert_eq!(sample_to_duty(i16::MAX, 10), 1023);
        assert_eq!(sample_to_duty(i16::MAX, 16), u16::MAX);
    }
}
