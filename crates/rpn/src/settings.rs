//! Runtime calculator configuration.
//!
//! Every field packs into a 4-bit nibble (or a mask word) of the persisted
//! settings blob; the `*_nibble` conversions are the single source of truth for
//! those encodings.

use platform::Precision;

/// Radix used for operand entry and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericBase {
    #[default]
    Decimal,
    Hex,
}

/// Decimal display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayFormat {
    /// Fixed point at the fix precision, scientific above 1e10
    #[default]
    Fix,
    /// Always scientific at the engineering precision
    Eng,
}

/// Unit of trigonometric arguments and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

/// How chatty help notifications are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verbosity {
    /// No help notifications
    Silent,
    /// Warnings only (format fallbacks)
    #[default]
    Normal,
    /// Warnings plus hints (mode names, key prompts)
    Verbose,
}

/// Inactivity timeouts selectable for a mode timer, in seconds (0 = never).
pub const TIMEOUT_TABLE_SECS: [u32; 8] = [0, 30, 60, 120, 300, 600, 1_800, 3_600];

/// Index into [`TIMEOUT_TABLE_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeout(u8);

impl Timeout {
    /// Never time out.
    pub const NEVER: Self = Self(0);

    /// Timeout at `index` of the table, if valid.
    pub fn from_index(index: u8) -> Option<Self> {
        (usize::from(index) < TIMEOUT_TABLE_SECS.len()).then_some(Self(index))
    }

    /// Table index (the persisted nibble).
    pub fn index(self) -> u8 {
        self.0
    }

    /// Timeout in seconds, or `None` for "never".
    pub fn seconds(self) -> Option<u32> {
        TIMEOUT_TABLE_SECS
            .get(usize::from(self.0))
            .copied()
            .filter(|s| *s != 0)
    }

    /// Next table entry, wrapping to "never".
    #[must_use]
    pub fn cycle(self) -> Self {
        Self::from_index(self.0.saturating_add(1)).unwrap_or(Self::NEVER)
    }

    /// Previous table entry, wrapping to the longest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // table has 8 entries
    pub fn cycle_back(self) -> Self {
        match self.0.checked_sub(1) {
            Some(i) => Self(i),
            None => Self(TIMEOUT_TABLE_SECS.len().saturating_sub(1) as u8),
        }
    }
}

/// Which mode timer governs a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerKind {
    Calculator,
    Meter,
    Clock,
    Music,
}

/// Per-mode inactivity timers before the device sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeTimers {
    pub calculator: Timeout,
    pub meter: Timeout,
    pub clock: Timeout,
    pub music: Timeout,
}

impl ModeTimers {
    /// Timer for `kind`.
    pub fn get(&self, kind: TimerKind) -> Timeout {
        match kind {
            TimerKind::Calculator => self.calculator,
            TimerKind::Meter => self.meter,
            TimerKind::Clock => self.clock,
            TimerKind::Music => self.music,
        }
    }

    /// Mutable timer for `kind`.
    pub fn get_mut(&mut self, kind: TimerKind) -> &mut Timeout {
        match kind {
            TimerKind::Calculator => &mut self.calculator,
            TimerKind::Meter => &mut self.meter,
            TimerKind::Clock => &mut self.clock,
            TimerKind::Music => &mut self.music,
        }
    }
}

impl Default for ModeTimers {
    fn default() -> Self {
        Self {
            calculator: Timeout(4), // 5 min
            meter: Timeout(5),      // 10 min
            clock: Timeout::NEVER,
            music: Timeout::NEVER,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculatorSettings {
    pub base: NumericBase,
    pub format: DisplayFormat,
    pub fix_precision: Precision,
    pub eng_precision: Precision,
    pub angle: AngleUnit,
    pub verbosity: Verbosity,
    pub timers: ModeTimers,
    /// Index of the active mode, 0..=7 (Calculator is 0)
    pub mode: u8,
    /// Universal key filter, one bit per key id; persisted as two `u32` words
    pub key_filter: u64,
}

impl CalculatorSettings {
    /// Highest valid mode index.
    pub const MAX_MODE: u8 = 7;

    /// Key filter with every key enabled.
    pub const ALL_KEYS: u64 = u64::MAX;

    /// Low and high words of the key filter.
    #[allow(clippy::cast_possible_truncation)] // intentional split into halves
    pub fn key_filter_words(&self) -> [u32; 2] {
        [self.key_filter as u32, (self.key_filter >> 32) as u32]
    }

    /// Rebuild the key filter from its two words.
    pub fn set_key_filter_words(&mut self, words: [u32; 2]) {
        let [low, high] = words;
        self.key_filter = u64::from(low) | (u64::from(high) << 32);
    }
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            base: NumericBase::Decimal,
            format: DisplayFormat::Fix,
            fix_precision: Precision::new(4),
            eng_precision: Precision::new(3),
            angle: AngleUnit::Degrees,
            verbosity: Verbosity::Normal,
            timers: ModeTimers::default(),
            mode: 0,
            key_filter: Self::ALL_KEYS,
        }
    }
}

// ── Nibble encodings ─────────────────────────────────────────────────────────

impl NumericBase {
    /// Flip between decimal and hex.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Decimal => Self::Hex,
            Self::Hex => Self::Decimal,
        }
    }
}

/// Base/format flags nibble: bit 0 = hex base, bit 1 = engineering format.
pub fn base_format_nibble(base: NumericBase, format: DisplayFormat) -> u8 {
    let hex = u8::from(base == NumericBase::Hex);
    let eng = u8::from(format == DisplayFormat::Eng);
    hex | (eng << 1)
}

/// Inverse of [`base_format_nibble`]; `None` for values above 3.
pub fn base_format_from_nibble(nibble: u8) -> Option<(NumericBase, DisplayFormat)> {
    if nibble > 3 {
        return None;
    }
    let base = if nibble & 1 != 0 {
        NumericBase::Hex
    } else {
        NumericBase::Decimal
    };
    let format = if nibble & 2 != 0 {
        DisplayFormat::Eng
    } else {
        DisplayFormat::Fix
    };
    Some((base, format))
}

impl AngleUnit {
    pub fn nibble(self) -> u8 {
        match self {
            Self::Degrees => 0,
            Self::Radians => 1,
        }
    }

    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0 => Some(Self::Degrees),
            1 => Some(Self::Radians),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }
}

impl Verbosity {
    pub fn nibble(self) -> u8 {
        match self {
            Self::Silent => 0,
            Self::Normal => 1,
            Self::Verbose => 2,
        }
    }

    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0 => Some(Self::Silent),
            1 => Some(Self::Normal),
            2 => Some(Self::Verbose),
            _ => None,
        }
    }

    /// Next level, wrapping to `Silent`.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Silent => Self::Normal,
            Self::Normal => Self::Verbose,
            Self::Verbose => Self::Silent,
        }
    }
}
