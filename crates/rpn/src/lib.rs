//! RPN numeric engine — operand codec, register bank, settings and math.
//!
//! # Modules
//!
//! - [`numeric`] — `parse` / `format` for decimal and hex operands
//! - [`bank`] — `RegisterBank`: X/Y/Z/T stack, entry line, last-X, memory
//! - [`register`] — `Register`, `InputLine`, `Entry`
//! - [`memory`] — `NamedMemory`, slots 00..=99
//! - [`math`] — binary/unary kernels (never return Inf or NaN)
//! - [`settings`] — `CalculatorSettings` and its nibble encodings
//! - [`state`] — `CalculatorState`, the owned aggregate

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(missing_docs)]

pub mod bank;
pub mod error;
pub mod math;
pub mod memory;
pub mod numeric;
pub mod register;
pub mod settings;
pub mod state;

// Top-level re-exports for convenience
pub use bank::{Level, RegisterBank};
pub use error::{CalcError, MathFault, NumericError};
pub use math::{BinaryOp, UnaryOp};
pub use memory::NamedMemory;
pub use numeric::{format, parse, DisplayText, Formatted, Notice};
pub use register::{Entry, InputLine, Register};
pub use settings::{
    AngleUnit, CalculatorSettings, DisplayFormat, ModeTimers, NumericBase, Timeout, TimerKind,
    Verbosity,
};
pub use state::CalculatorState;
