//! Error types for operand entry and arithmetic.

use thiserror_no_std::Error;

/// Operand text could not be turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NumericError {
    /// Text does not match the decimal or hex grammar
    #[error("invalid number")]
    InvalidNumber,
    /// Text is well-formed but its value is infinite or NaN
    #[error("value out of range")]
    ValueOutOfRange,
    /// Entry line is full
    #[error("entry too long")]
    TooLong,
}

/// Arithmetic fault; the operation is refused and registers are untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MathFault {
    /// Divisor compared equal to 0.0
    #[error("divide by zero")]
    DivideByZero,
    /// Result would be NaN (argument outside the function's domain)
    #[error("domain error")]
    Domain,
    /// Result would be infinite
    #[error("overflow")]
    Overflow,
    /// Factorial of a negative or non-integer value
    #[error("bad factorial")]
    Factorial,
    /// Tangent of an odd multiple of 90 degrees
    #[error("undefined tangent")]
    Tangent,
}

/// User-visible calculator error.
///
/// Every variant blocks the operation that raised it; nothing in the
/// register bank changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalcError {
    /// Malformed operand or entry edit
    #[error("entry error: {0}")]
    Entry(NumericError),
    /// Arithmetic fault
    #[error("math error: {0}")]
    Math(MathFault),
    /// Recall from a slot that was never stored
    #[error("memory {0:02} empty")]
    EmptySlot(u8),
}

impl From<NumericError> for CalcError {
    fn from(e: NumericError) -> Self {
        Self::Entry(e)
    }
}

impl From<MathFault> for CalcError {
    fn from(e: MathFault) -> Self {
        Self::Math(e)
    }
}

impl CalcError {
    /// Short text for the LCD error line.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Entry(_) => "Entry Error",
            Self::Math(_) => "Math Error",
            Self::EmptySlot(_) => "Memory Empty",
        }
    }
}
