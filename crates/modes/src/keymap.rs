//! Key dispatch table: (key, shift, mode) → [`Command`].
//!
//! Shifted lookups fall back to the unshifted binding when a key has no
//! shifted meaning in that mode, so e.g. Shift+Digit still types a digit.

use platform::KeyId;
use rpn::{BinaryOp, UnaryOp};

use crate::key_mask::KeyMask;
use crate::mode::Mode;

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Digit 0..=15 for the entry line (or a memory slot digit after STO/RCL)
    Digit(u8),
    Point,
    Exponent,
    ChangeSign,
    Enter,
    Backspace,
    Binary(BinaryOp),
    Unary(UnaryOp),
    Swap,
    RollDown,
    ClearX,
    ClearStack,
    LastX,
    Pi,
    /// Begin a two-digit STO slot entry
    Store,
    /// Begin a two-digit RCL slot entry
    Recall,
    ClearMemory,
    ToggleBase,
    ToggleFormat,
    ToggleAngle,
    /// Latch the shift state for the next key
    Shift,
    NextMode,
    Setup,
    Sleep,
    Up,
    Down,
    Select,
    /// Leave the current mode (stop playback first in MusicList)
    Cancel,
    ToggleArmed,
}

/// Shift latch state at the time of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftState {
    #[default]
    Off,
    On,
}

/// Set of modes a binding applies in, one bit per mode index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModeSet(u8);

impl ModeSet {
    const ALL: Self = Self(0xFF);
    const CALC: Self = Self::of(&[Mode::Calculator]);
    const NOT_CALC: Self = Self(!Self::CALC.0);
    const LISTS: Self = Self::of(&[Mode::Alarm, Mode::FileList, Mode::Setup, Mode::MusicList]);
    const METERS: Self = Self::of(&[Mode::Meter, Mode::Ohms]);
    const ALARM: Self = Self::of(&[Mode::Alarm]);

    #[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // const loop, i < len
    const fn of(modes: &[Mode]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < modes.len() {
            bits |= 1 << modes[i].index();
            i += 1;
        }
        Self(bits)
    }

    fn contains(self, mode: Mode) -> bool {
        self.0.checked_shr(u32::from(mode.index())).unwrap_or(0) & 1 != 0
    }
}

struct Binding {
    key: KeyId,
    shift: ShiftState,
    modes: ModeSet,
    command: Command,
}

const fn bind(key: KeyId, shift: ShiftState, modes: ModeSet, command: Command) -> Binding {
    Binding {
        key,
        shift,
        modes,
        command,
    }
}

use Command as C;
use ShiftState::{Off, On};

#[rustfmt::skip]
static BINDINGS: &[Binding] = &[
    // ── Everywhere ──────────────────────────────────────────────────────
    bind(KeyId::Mode,       Off, ModeSet::ALL, C::NextMode),
    bind(KeyId::Mode,       On,  ModeSet::ALL, C::Setup),
    bind(KeyId::Shift,      Off, ModeSet::ALL, C::Shift),
    bind(KeyId::Sleep,      Off, ModeSet::ALL, C::Sleep),
    // ── Calculator entry ────────────────────────────────────────────────
    bind(KeyId::Digit0,     Off, ModeSet::CALC, C::Digit(0)),
    bind(KeyId::Digit1,     Off, ModeSet::CALC, C::Digit(1)),
    bind(KeyId::Digit2,     Off, ModeSet::CALC, C::Digit(2)),
    bind(KeyId::Digit3,     Off, ModeSet::CALC, C::Digit(3)),
    bind(KeyId::Digit4,     Off, ModeSet::CALC, C::Digit(4)),
    bind(KeyId::Digit5,     Off, ModeSet::CALC, C::Digit(5)),
    bind(KeyId::Digit6,     Off, ModeSet::CALC, C::Digit(6)),
    bind(KeyId::Digit7,     Off, ModeSet::CALC, C::Digit(7)),
    bind(KeyId::Digit8,     Off, ModeSet::CALC, C::Digit(8)),
    bind(KeyId::Digit9,     Off, ModeSet::CALC, C::Digit(9)),
    bind(KeyId::HexA,       Off, ModeSet::CALC, C::Digit(10)),
    bind(KeyId::HexB,       Off, ModeSet::CALC, C::Digit(11)),
    bind(KeyId::HexC,       Off, ModeSet::CALC, C::Digit(12)),
    bind(KeyId::HexD,       Off, ModeSet::CALC, C::Digit(13)),
    bind(KeyId::HexE,       Off, ModeSet::CALC, C::Digit(14)),
    bind(KeyId::HexF,       Off, ModeSet::CALC, C::Digit(15)),
    bind(KeyId::Point,      Off, ModeSet::CALC, C::Point),
    bind(KeyId::Point,      On,  ModeSet::CALC, C::ToggleBase),
    bind(KeyId::Exponent,   Off, ModeSet::CALC, C::Exponent),
    bind(KeyId::Exponent,   On,  ModeSet::CALC, C::ToggleFormat),
    bind(KeyId::ChangeSign, Off, ModeSet::CALC, C::ChangeSign),
    bind(KeyId::ChangeSign, On,  ModeSet::CALC, C::Unary(UnaryOp::Abs)),
    bind(KeyId::Enter,      Off, ModeSet::CALC, C::Enter),
    bind(KeyId::Enter,      On,  ModeSet::CALC, C::LastX),
    bind(KeyId::Back,       Off, ModeSet::CALC, C::Backspace),
    bind(KeyId::Back,       On,  ModeSet::CALC, C::ClearStack),
    // ── Calculator operations ───────────────────────────────────────────
    bind(KeyId::Add,        Off, ModeSet::CALC, C::Binary(BinaryOp::Add)),
    bind(KeyId::Subtract,   Off, ModeSet::CALC, C::Binary(BinaryOp::Subtract)),
    bind(KeyId::Multiply,   Off, ModeSet::CALC, C::Binary(BinaryOp::Multiply)),
    bind(KeyId::Divide,     Off, ModeSet::CALC, C::Binary(BinaryOp::Divide)),
    bind(KeyId::Power,      Off, ModeSet::CALC, C::Binary(BinaryOp::Power)),
    bind(KeyId::Power,      On,  ModeSet::CALC, C::Binary(BinaryOp::Root)),
    bind(KeyId::Sin,        Off, ModeSet::CALC, C::Unary(UnaryOp::Sin)),
    bind(KeyId::Sin,        On,  ModeSet::CALC, C::Unary(UnaryOp::Asin)),
    bind(KeyId::Cos,        Off, ModeSet::CALC, C::Unary(UnaryOp::Cos)),
    bind(KeyId::Cos,        On,  ModeSet::CALC, C::Unary(UnaryOp::Acos)),
    bind(KeyId::Tan,        Off, ModeSet::CALC, C::Unary(UnaryOp::Tan)),
    bind(KeyId::Tan,        On,  ModeSet::CALC, C::Unary(UnaryOp::Atan)),
    bind(KeyId::Sqrt,       Off, ModeSet::CALC, C::Unary(UnaryOp::Sqrt)),
    bind(KeyId::Sqrt,       On,  ModeSet::CALC, C::Unary(UnaryOp::Square)),
    bind(KeyId::Reciprocal, Off, ModeSet::CALC, C::Unary(UnaryOp::Reciprocal)),
    bind(KeyId::Reciprocal, On,  ModeSet::CALC, C::Unary(UnaryOp::IntPart)),
    bind(KeyId::Log,        Off, ModeSet::CALC, C::Unary(UnaryOp::Log10)),
    bind(KeyId::Log,        On,  ModeSet::CALC, C::Unary(UnaryOp::Exp10)),
    bind(KeyId::Ln,         Off, ModeSet::CALC, C::Unary(UnaryOp::Ln)),
    bind(KeyId::Ln,         On,  ModeSet::CALC, C::Unary(UnaryOp::Exp)),
    bind(KeyId::Factorial,  Off, ModeSet::CALC, C::Unary(UnaryOp::Factorial)),
    bind(KeyId::Pi,         Off, ModeSet::CALC, C::Pi),
    bind(KeyId::Swap,       Off, ModeSet::CALC, C::Swap),
    bind(KeyId::Swap,       On,  ModeSet::CALC, C::ToggleAngle),
    bind(KeyId::RollDown,   Off, ModeSet::CALC, C::RollDown),
    bind(KeyId::RollDown,   On,  ModeSet::CALC, C::ClearX),
    bind(KeyId::Store,      Off, ModeSet::CALC, C::Store),
    bind(KeyId::Store,      On,  ModeSet::CALC, C::ClearMemory),
    bind(KeyId::Recall,     Off, ModeSet::CALC, C::Recall),
    // ── Other modes ─────────────────────────────────────────────────────
    bind(KeyId::Back,       Off, ModeSet::NOT_CALC, C::Cancel),
    bind(KeyId::Up,         Off, ModeSet::LISTS,    C::Up),
    bind(KeyId::Down,       Off, ModeSet::LISTS,    C::Down),
    bind(KeyId::Enter,      Off, ModeSet::LISTS,    C::Select),
    bind(KeyId::Enter,      Off, ModeSet::METERS,   C::Select),
    bind(KeyId::ChangeSign, Off, ModeSet::ALARM,    C::ToggleArmed),
];

fn find(key: KeyId, shift: ShiftState, mode: Mode) -> Option<Command> {
    BINDINGS
        .iter()
        .find(|b| b.key == key && b.shift == shift && b.modes.contains(mode))
        .map(|b| b.command)
}

/// Resolve a key press. `None` means the key does nothing in `mode`.
pub fn lookup(key: KeyId, shift: ShiftState, mode: Mode) -> Option<Command> {
    match shift {
        ShiftState::Off => find(key, ShiftState::Off, mode),
        ShiftState::On => {
            find(key, ShiftState::On, mode).or_else(|| find(key, ShiftState::Off, mode))
        }
    }
}

/// Every key bound to something in `mode`.
pub fn bound_keys(mode: Mode) -> KeyMask {
    BINDINGS
        .iter()
        .filter(|b| b.modes.contains(mode))
        .fold(KeyMask::NONE, |mask, b| mask.with(b.key))
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_in_calculator() {
        assert_eq!(lookup(KeyId::Digit7, Off, Mode::Calculator), Some(C::Digit(7)));
        assert_eq!(lookup(KeyId::HexF, Off, Mode::Calculator), Some(C::Digit(15)));
        assert_eq!(lookup(KeyId::Digit7, Off, Mode::Clock), None);
    }

    #[test]
    fn test_shift_selects_inverse() {
        assert_eq!(
            lookup(KeyId::Sin, On, Mode::Calculator),
            Some(C::Unary(UnaryOp::Asin))
        );
        assert_eq!(
            lookup(KeyId::Power, On, Mode::Calculator),
            Some(C::Binary(BinaryOp::Root))
        );
    }

    #[test]
    fn test_shift_falls_back_to_plain_binding() {
        assert_eq!(lookup(KeyId::Digit3, On, Mode::Calculator), Some(C::Digit(3)));
        assert_eq!(lookup(KeyId::Up, On, Mode::FileList), Some(C::Up));
    }

    #[test]
    fn test_same_key_differs_by_mode() {
        assert_eq!(lookup(KeyId::Enter, Off, Mode::Calculator), Some(C::Enter));
        assert_eq!(lookup(KeyId::Enter, Off, Mode::MusicList), Some(C::Select));
        assert_eq!(lookup(KeyId::Back, Off, Mode::Calculator), Some(C::Backspace));
        assert_eq!(lookup(KeyId::Back, Off, Mode::Setup), Some(C::Cancel));
        assert_eq!(lookup(KeyId::Mode, On, Mode::Meter), Some(C::Setup));
    }

    #[test]
    fn test_mode_masks_cover_bindings() {
        for mode in Mode::ALL {
            let bound = bound_keys(mode);
            let mask = KeyMask::for_mode(mode);
            assert_eq!(
                bound.intersect(mask),
                bound,
                "{mode:?} binds keys its mask filters out"
            );
        }
    }

    #[test]
    fn test_non_calculator_masks_are_exact() {
        for mode in Mode::ALL.into_iter().filter(|m| *m != Mode::Calculator) {
            assert_eq!(bound_keys(mode), KeyMask::for_mode(mode), "{mode:?}");
        }
    }

    #[test]
    fn test_no_duplicate_bindings() {
        for (i, a) in BINDINGS.iter().enumerate() {
            for b in BINDINGS.iter().skip(i + 1) {
                let overlap = a.modes.0 & b.modes.0 != 0;
                assert!(
                    !(a.key == b.key && a.shift == b.shift && overlap),
                    "{:?}/{:?} bound twice",
                    a.key,
                    a.shift
                );
            }
        }
    }
}
