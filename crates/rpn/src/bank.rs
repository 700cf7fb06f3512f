//! The RPN register bank: four-level stack, entry line and named memory.
//!
//! X is either committed (register 0 is authoritative) or pending (the
//! keypad line is). Every operation validates before it mutates, so an `Err`
//! leaves the whole bank exactly as it was.

use platform::config::STACK_DEPTH;
use platform::MemorySlot;

use crate::error::{CalcError, NumericError};
use crate::math::{BinaryOp, UnaryOp};
use crate::memory::NamedMemory;
use crate::numeric::Notice;
use crate::register::{Entry, InputLine, Register};
use crate::settings::{AngleUnit, CalculatorSettings, NumericBase};

/// Stack levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    X = 0,
    Y = 1,
    Z = 2,
    T = 3,
}

/// Four stack registers plus entry state, last-X and named memory.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterBank {
    regs: [Register; STACK_DEPTH],
    entry: Entry,
    last_x: f64,
    memory: NamedMemory,
}

impl RegisterBank {
    pub fn new() -> Self {
        Self {
            regs: Default::default(),
            entry: Entry::Committed,
            last_x: 0.0,
            memory: NamedMemory::new(),
        }
    }

    /// Restore a bank from persisted stack values (X first) and memory.
    pub fn restore(stack: [f64; STACK_DEPTH], memory: NamedMemory) -> Self {
        let mut bank = Self::new();
        for (reg, value) in bank.regs.iter_mut().zip(stack) {
            reg.set(value);
        }
        bank.memory = memory;
        bank
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn value(&self, level: Level) -> f64 {
        self.regs.get(level as usize).map_or(0.0, Register::value)
    }

    pub fn x(&self) -> f64 {
        self.value(Level::X)
    }

    pub fn y(&self) -> f64 {
        self.value(Level::Y)
    }

    /// Stack values, X first.
    pub fn stack(&self) -> [f64; STACK_DEPTH] {
        let mut out = [0.0; STACK_DEPTH];
        for (slot, reg) in out.iter_mut().zip(&self.regs) {
            *slot = reg.value();
        }
        out
    }

    pub fn register(&self, level: Level) -> Option<&Register> {
        self.regs.get(level as usize)
    }

    pub fn register_mut(&mut self, level: Level) -> Option<&mut Register> {
        self.regs.get_mut(level as usize)
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// The pending entry text, if X is being typed.
    pub fn pending_text(&self) -> Option<&str> {
        match &self.entry {
            Entry::Pending(line) => Some(line.as_str()),
            Entry::Committed => None,
        }
    }

    pub fn last_x(&self) -> f64 {
        self.last_x
    }

    pub fn memory(&self) -> &NamedMemory {
        &self.memory
    }

    /// Re-format stale register text. Returns the first notice raised.
    pub fn refresh_text(&mut self, settings: &CalculatorSettings) -> Option<Notice> {
        let mut notice = None;
        for reg in &mut self.regs {
            let n = reg.refresh(settings);
            notice = notice.or(n);
        }
        notice
    }

    /// Mark every register's text stale (display settings changed).
    pub fn invalidate_text(&mut self) {
        for reg in &mut self.regs {
            reg.invalidate();
        }
    }

    // ── Stack primitives ─────────────────────────────────────────────────

    fn moved(&mut self) {
        for reg in &mut self.regs {
            reg.mark_moved();
        }
    }

    /// Lift the stack (Z→T, Y→Z, X→Y) and load `v` into X.
    pub fn push_loaded(&mut self, v: f64) {
        self.regs.rotate_right(1);
        self.moved();
        if let Some(x) = self.regs.first_mut() {
            x.set(v);
        }
        self.entry = Entry::Committed;
    }

    /// Drop the stack (Y→X, Z→Y, T→Z) and zero T.
    pub fn drop_stack(&mut self) {
        self.regs.rotate_left(1);
        self.moved();
        if let Some(t) = self.regs.last_mut() {
            t.set(0.0);
        }
    }

    fn set_x(&mut self, v: f64) {
        if let Some(x) = self.regs.first_mut() {
            x.set(v);
        }
    }

    /// Commit a pending line by pushing its value. No-op when committed.
    pub fn commit(&mut self, base: NumericBase) -> Result<(), CalcError> {
        if let Entry::Pending(line) = &self.entry {
            let v = line.value(base)?;
            self.push_loaded(v);
        }
        Ok(())
    }

    // ── Keys ─────────────────────────────────────────────────────────────

    /// ENTER: push the pending line, or duplicate X when committed.
    pub fn enter_key(&mut self, base: NumericBase) -> Result<(), CalcError> {
        match &self.entry {
            Entry::Pending(line) => {
                let v = line.value(base)?;
                self.push_loaded(v);
            }
            Entry::Committed => self.push_loaded(self.x()),
        }
        Ok(())
    }

    /// Append a digit (0..=15); hex digits only in hex base.
    pub fn digit(&mut self, value: u8, base: NumericBase) -> Result<(), CalcError> {
        let radix = match base {
            NumericBase::Decimal => 10,
            NumericBase::Hex => 16,
        };
        let c = char::from_digit(u32::from(value), radix)
            .ok_or(NumericError::InvalidNumber)?
            .to_ascii_uppercase();
        let mut buf = [0u8; 4];
        self.edit(|line| line.push_digit(c), c.encode_utf8(&mut buf))
    }

    /// Decimal point (decimal base only).
    pub fn point(&mut self, base: NumericBase) -> Result<(), CalcError> {
        if base == NumericBase::Hex {
            return Err(NumericError::InvalidNumber.into());
        }
        self.edit(InputLine::push_point, "0.")
    }

    /// Exponent marker (decimal base only).
    pub fn exponent(&mut self, base: NumericBase) -> Result<(), CalcError> {
        if base == NumericBase::Hex {
            return Err(NumericError::InvalidNumber.into());
        }
        match &mut self.entry {
            Entry::Pending(line) => line.push_exponent()?,
            Entry::Committed => {
                let mut line = InputLine::start("1")?;
                line.push_exponent()?;
                self.entry = Entry::Pending(line);
            }
        }
        Ok(())
    }

    /// Change sign: edits the pending line, or negates X when committed.
    pub fn change_sign(&mut self, base: NumericBase) -> Result<(), CalcError> {
        match &mut self.entry {
            Entry::Pending(_) if base == NumericBase::Hex => Err(NumericError::InvalidNumber.into()),
            Entry::Pending(line) => {
                let mut edited = line.clone();
                edited.toggle_sign()?;
                *line = edited;
                Ok(())
            }
            Entry::Committed => {
                self.set_x(-self.x());
                Ok(())
            }
        }
    }

    /// Backspace: trims the pending line, reverting to the committed X when it
    /// empties; clears X when already committed.
    pub fn backspace(&mut self) {
        match &mut self.entry {
            Entry::Pending(line) => {
                if !line.backspace() {
                    self.entry = Entry::Committed;
                }
            }
            Entry::Committed => self.set_x(0.0),
        }
    }

    /// Apply a line edit, or start a new line with `start` when committed.
    fn edit(
        &mut self,
        op: impl FnOnce(&mut InputLine) -> Result<(), NumericError>,
        start: &str,
    ) -> Result<(), CalcError> {
        match &mut self.entry {
            Entry::Pending(line) => {
                let mut edited = line.clone();
                op(&mut edited)?;
                *line = edited;
            }
            Entry::Committed => self.entry = Entry::Pending(InputLine::start(start)?),
        }
        Ok(())
    }

    // ── Arithmetic ───────────────────────────────────────────────────────

    /// Two-operand operation.
    ///
    /// Committed: `Y op X`, the stack drops and X takes the result.
    /// Pending: `X op line`, X takes the result and T is cleared, leaving the
    /// stack as if the line had been pushed first.
    pub fn binary(&mut self, op: BinaryOp, base: NumericBase) -> Result<f64, CalcError> {
        match &self.entry {
            Entry::Pending(line) => {
                let operand = line.value(base)?;
                let result = op.apply(self.x(), operand)?;
                self.last_x = operand;
                self.set_x(result);
                if let Some(t) = self.regs.last_mut() {
                    t.set(0.0);
                }
                self.entry = Entry::Committed;
                Ok(result)
            }
            Entry::Committed => {
                let result = op.apply(self.y(), self.x())?;
                self.last_x = self.x();
                self.drop_stack();
                self.set_x(result);
                Ok(result)
            }
        }
    }

    /// One-operand operation, replacing X in place. A pending line is
    /// consumed and its result pushed (the "raise" convention, since the
    /// operand was never on the stack).
    pub fn unary(
        &mut self,
        op: UnaryOp,
        base: NumericBase,
        unit: AngleUnit,
    ) -> Result<f64, CalcError> {
        match &self.entry {
            Entry::Pending(line) => {
                let operand = line.value(base)?;
                let result = op.apply(operand, unit)?;
                self.last_x = operand;
                self.push_loaded(result);
                Ok(result)
            }
            Entry::Committed => {
                let result = op.apply(self.x(), unit)?;
                self.last_x = self.x();
                self.set_x(result);
                Ok(result)
            }
        }
    }

    // ── Stack keys ───────────────────────────────────────────────────────

    pub fn swap(&mut self, base: NumericBase) -> Result<(), CalcError> {
        self.commit(base)?;
        self.regs.swap(Level::X as usize, Level::Y as usize);
        self.moved();
        Ok(())
    }

    /// Roll down: X→T, Y→X, Z→Y, T→Z.
    pub fn roll_down(&mut self, base: NumericBase) -> Result<(), CalcError> {
        self.commit(base)?;
        self.regs.rotate_left(1);
        self.moved();
        Ok(())
    }

    /// CLx: discard a pending line, or zero X.
    pub fn clear_x(&mut self) {
        self.entry = Entry::Committed;
        self.set_x(0.0);
    }

    pub fn clear_stack(&mut self) {
        self.entry = Entry::Committed;
        for reg in &mut self.regs {
            reg.set(0.0);
        }
    }

    pub fn recall_last_x(&mut self, base: NumericBase) -> Result<(), CalcError> {
        self.commit(base)?;
        self.push_loaded(self.last_x);
        Ok(())
    }

    /// Push a constant (π and friends).
    pub fn push_constant(&mut self, v: f64, base: NumericBase) -> Result<(), CalcError> {
        self.commit(base)?;
        self.push_loaded(v);
        Ok(())
    }

    // ── Memory ───────────────────────────────────────────────────────────

    /// STO: store X (committing a pending line first).
    pub fn store(&mut self, slot: MemorySlot, base: NumericBase) -> Result<(), CalcError> {
        self.commit(base)?;
        self.memory.store(slot, self.x());
        Ok(())
    }

    /// RCL: push the slot's value.
    pub fn recall(&mut self, slot: MemorySlot, base: NumericBase) -> Result<(), CalcError> {
        let value = self
            .memory
            .get(slot)
            .ok_or(CalcError::EmptySlot(slot.get()))?;
        if let Entry::Pending(line) = &self.entry {
            line.value(base)?;
        }
        self.commit(base)?;
        self.push_loaded(value);
        Ok(())
    }

    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MathFault;

    const DEC: NumericBase = NumericBase::Decimal;
    const DEG: AngleUnit = AngleUnit::Degrees;

    fn typed(bank: &mut RegisterBank, text: &str) {
        for c in text.chars() {
            match c {
                '.' => bank.point(DEC).unwrap(),
                'E' => bank.exponent(DEC).unwrap(),
                d => bank.digit(d.to_digit(10).unwrap() as u8, DEC).unwrap(),
            }
        }
    }

    #[test]
    fn test_push_push_add_drops_one_level() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(7.0);
        bank.push_loaded(2.0);
        bank.push_loaded(3.0);
        assert_eq!(bank.binary(BinaryOp::Add, DEC), Ok(5.0));
        assert_eq!(bank.stack(), [5.0, 7.0, 0.0, 0.0]);
        assert_eq!(bank.last_x(), 3.0);
    }

    #[test]
    fn test_push_lifts_and_discards_t() {
        let mut bank = RegisterBank::restore([1.0, 2.0, 3.0, 4.0], NamedMemory::new());
        bank.push_loaded(0.5);
        assert_eq!(bank.stack(), [0.5, 1.0, 2.0, 3.0]);
        bank.drop_stack();
        assert_eq!(bank.stack(), [1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_pending_binary_uses_x_and_line() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(10.0);
        typed(&mut bank, "4");
        assert_eq!(bank.binary(BinaryOp::Subtract, DEC), Ok(6.0));
        assert_eq!(bank.stack(), [6.0, 0.0, 0.0, 0.0]);
        assert!(!bank.entry().is_pending());
    }

    #[test]
    fn test_pending_binary_matches_push_then_operate() {
        let mut typed_bank = RegisterBank::restore([4.0, 3.0, 2.0, 1.0], NamedMemory::new());
        typed(&mut typed_bank, "5");
        assert_eq!(typed_bank.binary(BinaryOp::Add, DEC), Ok(9.0));

        let mut pushed = RegisterBank::restore([4.0, 3.0, 2.0, 1.0], NamedMemory::new());
        pushed.push_loaded(5.0);
        assert_eq!(pushed.binary(BinaryOp::Add, DEC), Ok(9.0));

        assert_eq!(typed_bank.stack(), [9.0, 3.0, 2.0, 0.0]);
        assert_eq!(typed_bank.stack(), pushed.stack());
    }

    #[test]
    fn test_enter_parses_line() {
        let mut bank = RegisterBank::new();
        typed(&mut bank, "3.5E2");
        assert_eq!(bank.pending_text(), Some("3.5E2"));
        bank.enter_key(DEC).unwrap();
        assert_eq!(bank.x(), 350.0);
        assert_eq!(bank.pending_text(), None);
    }

    #[test]
    fn test_enter_error_leaves_state_untouched() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(9.0);
        typed(&mut bank, "2E");
        let before = bank.clone();
        assert_eq!(
            bank.enter_key(DEC),
            Err(CalcError::Entry(NumericError::InvalidNumber))
        );
        assert_eq!(bank, before);
    }

    #[test]
    fn test_divide_by_zero_preserves_registers() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(1.0);
        bank.push_loaded(0.0);
        let before = bank.clone();
        assert_eq!(
            bank.binary(BinaryOp::Divide, DEC),
            Err(CalcError::Math(MathFault::DivideByZero))
        );
        assert_eq!(bank, before);
    }

    #[test]
    fn test_factorial_of_negative_is_math_error() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(-1.0);
        assert_eq!(
            bank.unary(UnaryOp::Factorial, DEC, DEG),
            Err(CalcError::Math(MathFault::Factorial))
        );
        assert_eq!(bank.x(), -1.0);
    }

    #[test]
    fn test_unary_in_place_vs_pending_push() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(2.0);
        bank.push_loaded(16.0);
        bank.unary(UnaryOp::Sqrt, DEC, DEG).unwrap();
        assert_eq!(bank.stack(), [4.0, 2.0, 0.0, 0.0]);

        typed(&mut bank, "9");
        bank.unary(UnaryOp::Sqrt, DEC, DEG).unwrap();
        assert_eq!(bank.stack(), [3.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn test_backspace_reverts_to_committed() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(8.0);
        typed(&mut bank, "12");
        bank.backspace();
        assert_eq!(bank.pending_text(), Some("1"));
        bank.backspace();
        assert_eq!(bank.pending_text(), None);
        assert_eq!(bank.x(), 8.0);
    }

    #[test]
    fn test_change_sign() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(3.0);
        bank.change_sign(DEC).unwrap();
        assert_eq!(bank.x(), -3.0);
        typed(&mut bank, "5");
        bank.change_sign(DEC).unwrap();
        assert_eq!(bank.pending_text(), Some("-5"));
    }

    #[test]
    fn test_hex_digits_only_in_hex_base() {
        let mut bank = RegisterBank::new();
        assert!(bank.digit(15, DEC).is_err());
        bank.digit(15, NumericBase::Hex).unwrap();
        bank.digit(15, NumericBase::Hex).unwrap();
        bank.enter_key(NumericBase::Hex).unwrap();
        assert_eq!(bank.x(), 255.0);
    }

    #[test]
    fn test_store_recall() {
        let mut bank = RegisterBank::new();
        let slot = MemorySlot::new(12).unwrap();
        assert_eq!(bank.recall(slot, DEC), Err(CalcError::EmptySlot(12)));
        typed(&mut bank, "42");
        bank.store(slot, DEC).unwrap();
        assert_eq!(bank.x(), 42.0);
        bank.clear_x();
        bank.recall(slot, DEC).unwrap();
        assert_eq!(bank.stack(), [42.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_swap_and_roll() {
        let mut bank = RegisterBank::restore([1.0, 2.0, 3.0, 4.0], NamedMemory::new());
        bank.swap(DEC).unwrap();
        assert_eq!(bank.stack(), [2.0, 1.0, 3.0, 4.0]);
        bank.roll_down(DEC).unwrap();
        assert_eq!(bank.stack(), [1.0, 3.0, 4.0, 2.0]);
    }

    #[test]
    fn test_pi_raises() {
        let mut bank = RegisterBank::new();
        bank.push_loaded(1.0);
        bank.push_constant(core::f64::consts::PI, DEC).unwrap();
        assert_eq!(bank.y(), 1.0);
        assert_eq!(bank.x(), core::f64::consts::PI);
    }
}
