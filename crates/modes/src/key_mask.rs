//! Key-filter bitmasks.
//!
//! Bit `n` enables the key whose [`KeyId::index`] is `n`. The universal mask
//! is the persisted baseline; each mode narrows it to the keys it handles,
//! and a pending error narrows it further to [`KeyMask::ACKNOWLEDGE`].

use platform::KeyId;

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMask(u64);

/// Keys every mode answers to.
const COMMON: KeyMask = KeyMask::of(&[KeyId::Mode, KeyId::Shift, KeyId::Sleep, KeyId::Back]);

/// Up/Down lists.
const LIST: KeyMask = COMMON.union(KeyMask::of(&[KeyId::Up, KeyId::Down, KeyId::Enter]));

impl KeyMask {
    pub const ALL: Self = Self(u64::MAX);
    pub const NONE: Self = Self(0);
    /// Keys that dismiss an error.
    pub const ACKNOWLEDGE: Self = Self::of(&[KeyId::Enter, KeyId::Back]);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Mask with exactly `keys` enabled.
    #[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // const loop, i < len
    pub const fn of(keys: &[KeyId]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < keys.len() {
            bits |= 1u64 << keys[i].index();
            i += 1;
        }
        Self(bits)
    }

    pub fn contains(self, key: KeyId) -> bool {
        self.0.checked_shr(u32::from(key.index())).unwrap_or(0) & 1 != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[must_use]
    pub fn with(self, key: KeyId) -> Self {
        self.union(Self::of(&[key]))
    }

    #[must_use]
    pub fn without(self, key: KeyId) -> Self {
        Self(self.0 & !Self::of(&[key]).0)
    }

    /// Keys `mode` handles. The calculator handles everything.
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Calculator => Self::ALL,
            Mode::Clock => COMMON,
            Mode::Meter | Mode::Ohms => COMMON.union(Self::of(&[KeyId::Enter])),
            Mode::Alarm => LIST.union(Self::of(&[KeyId::ChangeSign])),
            Mode::FileList | Mode::Setup | Mode::MusicList => LIST,
        }
    }
}

impl Default for KeyMask {
    fn default() -> Self {
        Self::ALL
    }
}
