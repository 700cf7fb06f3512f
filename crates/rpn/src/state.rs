//! The owned calculator state aggregate.

use crate::bank::RegisterBank;
use crate::settings::CalculatorSettings;

/// Everything the calculator persists: configuration plus the register bank.
///
/// One instance is owned by the key-dispatch task and lent by reference to
/// whatever needs it; there is no other copy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalculatorState {
    pub settings: CalculatorSettings,
    pub bank: RegisterBank,
}

impl CalculatorState {
    pub fn new(settings: CalculatorSettings, bank: RegisterBank) -> Self {
        Self { settings, bank }
    }
}
