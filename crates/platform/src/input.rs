//! Touch keypad abstraction

/// Input device trait for the touch keypad
pub trait InputDevice {
    /// Wait for next input event (async, power-efficient)
    fn wait_for_event(&mut self) -> impl core::future::Future<Output = InputEvent>;

    /// Poll for event (non-blocking)
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Input events from the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Key touched
    KeyPress(KeyId),
    /// Key held past the long-press threshold
    KeyLongPress(KeyId),
}

/// Physical keys of the touch keypad.
///
/// The discriminant is the key's bit position in a key-filter mask, so it
/// must stay below 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeyId {
    Digit0 = 0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Point,
    Exponent,
    ChangeSign,
    Enter,
    Back,
    Add,
    Subtract,
    Multiply,
    Divide,
    Shift,
    Mode,
    Sin,
    Cos,
    Tan,
    Sqrt,
    Power,
    Reciprocal,
    Log,
    Ln,
    Swap,
    RollDown,
    Store,
    Recall,
    Up,
    Down,
    HexA,
    HexB,
    HexC,
    HexD,
    HexE,
    HexF,
    Pi,
    Factorial,
    Sleep,
}

impl KeyId {
    /// Number of physical keys.
    pub const COUNT: usize = 44;

    /// Every key, in bit order.
    pub const ALL: [KeyId; Self::COUNT] = [
        KeyId::Digit0,
        KeyId::Digit1,
        KeyId::Digit2,
        KeyId::Digit3,
        KeyId::Digit4,
        KeyId::Digit5,
        KeyId::Digit6,
        KeyId::Digit7,
        KeyId::Digit8,
        KeyId::Digit9,
        KeyId::Point,
        KeyId::Exponent,
        KeyId::ChangeSign,
        KeyId::Enter,
        KeyId::Back,
        KeyId::Add,
        KeyId::Subtract,
        KeyId::Multiply,
        KeyId::Divide,
        KeyId::Shift,
        KeyId::Mode,
        KeyId::Sin,
        KeyId::Cos,
        KeyId::Tan,
        KeyId::Sqrt,
        KeyId::Power,
        KeyId::Reciprocal,
        KeyId::Log,
        KeyId::Ln,
        KeyId::Swap,
        KeyId::RollDown,
        KeyId::Store,
        KeyId::Recall,
        KeyId::Up,
        KeyId::Down,
        KeyId::HexA,
        KeyId::HexB,
        KeyId::HexC,
        KeyId::HexD,
        KeyId::HexE,
        KeyId::HexF,
        KeyId::Pi,
        KeyId::Factorial,
        KeyId::Sleep,
    ];

    /// Bit position of this key in a key-filter mask.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Key at bit position `index`, if any.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Numeric value of a digit or hex-digit key.
    pub const fn digit_value(self) -> Option<u8> {
        match self {
            KeyId::Digit0 => Some(0),
            KeyId::Digit1 => Some(1),
            KeyId::Digit2 => Some(2),
            KeyId::Digit3 => Some(3),
            KeyId::Digit4 => Some(4),
            KeyId::Digit5 => Some(5),
            KeyId::Digit6 => Some(6),
            KeyId::Digit7 => Some(7),
            KeyId::Digit8 => Some(8),
            KeyId::Digit9 => Some(9),
            KeyId::HexA => Some(10),
            KeyId::HexB => Some(11),
            KeyId::HexC => Some(12),
            KeyId::HexD => Some(13),
            KeyId::HexE => Some(14),
            KeyId::HexF => Some(15),
            _ => None,
        }
    }

    /// Keycap legend, also accepted by the simulator's key parser.
    pub const fn legend(self) -> &'static str {
        match self {
            KeyId::Digit0 => "0",
            KeyId::Digit1 => "1",
            KeyId::Digit2 => "2",
            KeyId::Digit3 => "3",
            KeyId::Digit4 => "4",
            KeyId::Digit5 => "5",
            KeyId::Digit6 => "6",
            KeyId::Digit7 => "7",
            KeyId::Digit8 => "8",
            KeyId::Digit9 => "9",
            KeyId::Point => ".",
            KeyId::Exponent => "eex",
            KeyId::ChangeSign => "chs",
            KeyId::Enter => "enter",
            KeyId::Back => "back",
            KeyId::Add => "+",
            KeyId::Subtract => "-",
            KeyId::Multiply => "*",
            KeyId::Divide => "/",
            KeyId::Shift => "shift",
            KeyId::Mode => "mode",
            KeyId::Sin => "sin",
            KeyId::Cos => "cos",
            KeyId::Tan => "tan",
            KeyId::Sqrt => "sqrt",
            KeyId::Power => "pow",
            KeyId::Reciprocal => "inv",
            KeyId::Log => "log",
            KeyId::Ln => "ln",
            KeyId::Swap => "swap",
            KeyId::RollDown => "roll",
            KeyId::Store => "sto",
            KeyId::Recall => "rcl",
            KeyId::Up => "up",
            KeyId::Down => "down",
            KeyId::HexA => "a",
            KeyId::HexB => "b",
            KeyId::HexC => "c",
            KeyId::HexD => "d",
            KeyId::HexE => "e",
            KeyId::HexF => "f",
            KeyId::Pi => "pi",
            KeyId::Factorial => "fact",
            KeyId::Sleep => "sleep",
        }
    }

    /// Reverse of [`KeyId::legend`] (case-insensitive ASCII).
    pub fn from_legend(legend: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.legend().eq_ignore_ascii_case(legend))
    }
}

#[cfg(test)]
mod tests {
    use super::KeyId;

    #[test]
    fn test_all_keys_are_in_bit_order() {
        for (i, key) in KeyId::ALL.iter().enumerate() {
            assert_eq!(usize::from(key.index()), i);
        }
    }

    #[test]
    fn test_key_indices_fit_in_mask() {
        assert!(KeyId::COUNT <= 64);
    }

    #[test]
    fn test_legend_round_trip() {
        for key in KeyId::ALL {
            assert_eq!(KeyId::from_legend(key.legend()), Some(key));
        }
        assert_eq!(KeyId::from_legend("ENTER"), Some(KeyId::Enter));
        assert_eq!(KeyId::from_legend("nope"), None);
    }

    #[test]
    fn test_digit_values() {
        assert_eq!(KeyId::Digit7.digit_value(), Some(7));
        assert_eq!(KeyId::HexF.digit_value(), Some(15));
        assert_eq!(KeyId::Enter.digit_value(), None);
    }
}
