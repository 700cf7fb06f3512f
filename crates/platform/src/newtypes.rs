//! Domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `MemorySlot`: named-memory index, 0–99
//! - `Precision`: digits after the point for fixed/engineering display, 0–9
//! - `SampleRateHz`: validates the 4000–48000 Hz range the PWM output can tick at

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("{value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

fn in_range(value: u32, min: u32, max: u32) -> Result<(), OutOfRangeError> {
    if value < min || value > max {
        Err(OutOfRangeError { value, min, max })
    } else {
        Ok(())
    }
}

// ── MemorySlot ───────────────────────────────────────────────────────────────

/// Index of a named-memory slot.
///
/// Wraps a `u8` with the invariant `value < MemorySlot::COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct MemorySlot(u8);

impl MemorySlot {
    /// Number of named-memory slots.
    pub const COUNT: usize = crate::config::MEMORY_SLOTS;

    /// Highest valid slot index.
    #[allow(clippy::cast_possible_truncation)] // COUNT is 100
    pub const MAX: u8 = (Self::COUNT - 1) as u8;

    /// Create a `MemorySlot`, rejecting indices past [`MemorySlot::MAX`].
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `index > 99`.
    pub fn new(index: u8) -> Result<Self, OutOfRangeError> {
        in_range(u32::from(index), 0, u32::from(Self::MAX))?;
        Ok(Self(index))
    }

    /// Return the slot index.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Return the slot index as a `usize` for array access.
    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

// ── Precision ────────────────────────────────────────────────────────────────

/// Digits shown after the decimal point.
///
/// Stored in a 4-bit field of the settings blob, so the range is 0–9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Precision(u8);

impl Precision {
    /// Largest supported precision.
    pub const MAX: u8 = 9;

    /// Create a `Precision`, clamping values above 9 to 9.
    #[must_use]
    pub fn new(digits: u8) -> Self {
        Self(digits.min(Self::MAX))
    }

    /// Create a `Precision`, returning an error if `digits > 9`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `digits > 9`.
    pub fn try_new(digits: u8) -> Result<Self, OutOfRangeError> {
        in_range(u32::from(digits), 0, u32::from(Self::MAX))?;
        Ok(Self(digits))
    }

    /// Return the number of digits.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Next precision, wrapping from 9 back to 0 (setup menu stepping).
    #[must_use]
    pub fn cycle(self) -> Self {
        if self.0 >= Self::MAX {
            Self(0)
        } else {
            Self(self.0.saturating_add(1))
        }
    }
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the audio tick timer supports.
///
/// Valid range: 4000–48000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate.
    pub const MIN_HZ: u32 = 4_000;

    /// Maximum supported sample rate.
    pub const MAX_HZ: u32 = 48_000;

    /// Create a `SampleRateHz`, returning an error if out of 4000–48000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 4000` or `hz > 48000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        in_range(hz, Self::MIN_HZ, Self::MAX_HZ)?;
        Ok(Self(hz))
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Tick period in microseconds, rounded down.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // divisor is >= MIN_HZ
    pub fn period_micros(self) -> u64 {
        1_000_000 / u64::from(self.0)
    }
}
