//! Two-digit memory slot entry after STO or RCL.

use platform::MemorySlot;

use super::screen::{format_line, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotOp {
    Store,
    Recall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEntry {
    op: SlotOp,
    tens: Option<u8>,
}

impl SlotEntry {
    pub const fn new(op: SlotOp) -> Self {
        Self { op, tens: None }
    }

    pub fn op(&self) -> SlotOp {
        self.op
    }

    /// Feed one decimal digit. Returns the slot once both digits are in;
    /// `Err` for a non-decimal digit.
    pub fn push(&mut self, digit: u8) -> Result<Option<MemorySlot>, ()> {
        if digit > 9 {
            return Err(());
        }
        match self.tens {
            None => {
                self.tens = Some(digit);
                Ok(None)
            }
            Some(tens) => {
                let index = tens.saturating_mul(10).saturating_add(digit);
                MemorySlot::new(index).map(Some).map_err(|_| ())
            }
        }
    }

    /// Prompt for the top line, e.g. `STO 4_`.
    pub fn prompt(&self) -> Line {
        let name = match self.op {
            SlotOp::Store => "STO",
            SlotOp::Recall => "RCL",
        };
        match self.tens {
            None => format_line(format_args!("{name} __")),
            Some(t) => format_line(format_args!("{name} {t}_")),
        }
    }
}
