//! Calculator-mode commands and the stack screen.

use embedded_storage::Storage as NonVolatileStore;
use modes::{Command, Mode};
use platform::{Display, Icon, Storage};
use rpn::{CalcError, DisplayFormat, Level, NumericError};

use super::screen::{self, format_line, right_aligned};
use super::slot::{SlotEntry, SlotOp};
use super::App;
use crate::fmt::{debug, warn};
use crate::notice::Notice;

impl<D, A, S, E> App<'_, D, A, S, E>
where
    D: Display,
    S: Storage,
    E: NonVolatileStore,
{
    pub(super) async fn calculate(&mut self, command: Command) {
        let indicators = matches!(command, Command::ToggleBase | Command::ToggleAngle);
        match self.apply(command) {
            Ok(()) => {
                if indicators {
                    self.sync_indicators().await;
                }
                if self.modes.current() == Mode::Calculator {
                    self.draw_calculator().await;
                }
            }
            Err(e) => self.show_error(e).await,
        }
    }

    /// Run one command against the register bank.
    fn apply(&mut self, command: Command) -> Result<(), CalcError> {
        if let Some(mut entry) = self.slot.take() {
            return match command {
                Command::Digit(d) => self.feed_slot(&mut entry, d),
                Command::Backspace => {
                    debug!("slot entry cancelled");
                    Ok(())
                }
                other => self.apply(other),
            };
        }

        let settings = &mut self.state.settings;
        let base = settings.base;
        let bank = &mut self.state.bank;
        match command {
            Command::Digit(d) => bank.digit(d, base)?,
            Command::Point => bank.point(base)?,
            Command::Exponent => bank.exponent(base)?,
            Command::ChangeSign => bank.change_sign(base)?,
            Command::Enter => bank.enter_key(base)?,
            Command::Backspace => bank.backspace(),
            Command::Binary(op) => {
                bank.binary(op, base)?;
            }
            Command::Unary(op) => {
                bank.unary(op, base, settings.angle)?;
            }
            Command::Swap => bank.swap(base)?,
            Command::RollDown => bank.roll_down(base)?,
            Command::ClearX => bank.clear_x(),
            Command::ClearStack => bank.clear_stack(),
            Command::LastX => bank.recall_last_x(base)?,
            Command::Pi => bank.push_constant(core::f64::consts::PI, base)?,
            Command::Store => self.begin_slot(SlotOp::Store),
            Command::Recall => self.begin_slot(SlotOp::Recall),
            Command::ClearMemory => bank.clear_memory(),
            Command::ToggleBase => {
                // The typed text belongs to the old base.
                bank.commit(base)?;
                settings.base = base.toggled();
                bank.invalidate_text();
            }
            Command::ToggleFormat => {
                settings.format = match settings.format {
                    DisplayFormat::Fix => DisplayFormat::Eng,
                    DisplayFormat::Eng => DisplayFormat::Fix,
                };
                bank.invalidate_text();
            }
            Command::ToggleAngle => settings.angle = settings.angle.toggled(),
            other => debug!("{:?} is not a calculator command", other),
        }
        Ok(())
    }

    fn begin_slot(&mut self, op: SlotOp) {
        self.slot = Some(SlotEntry::new(op));
        self.notify(Notice::SlotPrompt);
    }

    fn feed_slot(&mut self, entry: &mut SlotEntry, digit: u8) -> Result<(), CalcError> {
        let base = self.state.settings.base;
        match entry.push(digit) {
            Err(()) => Err(CalcError::Entry(NumericError::InvalidNumber)),
            Ok(None) => {
                self.slot = Some(*entry);
                Ok(())
            }
            Ok(Some(slot)) => match entry.op() {
                SlotOp::Store => self.state.bank.store(slot, base),
                SlotOp::Recall => self.state.bank.recall(slot, base),
            },
        }
    }

    /// Top line Y (or the slot prompt), bottom line the entry or X.
    pub(super) async fn draw_calculator(&mut self) {
        let settings = self.state.settings;
        if let Some(notice) = self.state.bank.refresh_text(&settings) {
            self.notify(Notice::Format(notice));
        }
        let bank = &self.state.bank;
        let top = match &self.slot {
            Some(entry) => entry.prompt(),
            None => right_aligned(bank.register(Level::Y).map_or("", |r| r.text())),
        };
        let bottom = match bank.pending_text() {
            Some(text) => right_aligned(text),
            None => right_aligned(bank.register(Level::X).map_or("", |r| r.text())),
        };

        screen::show(&self.peripherals.display, &top, &bottom).await;
        for level in [Level::X, Level::Y] {
            if let Some(reg) = self.state.bank.register_mut(level) {
                reg.mark_displayed();
            }
        }
    }

    /// Error screen; every key but the acknowledgment keys is masked until
    /// one is pressed.
    pub(super) async fn show_error(&mut self, error: CalcError) {
        warn!("calculator error: {}", error);
        self.slot = None;
        self.modes.raise_error();
        let detail = match error {
            CalcError::Entry(e) => format_line(format_args!("{}", e)),
            CalcError::Math(f) => format_line(format_args!("{}", f)),
            CalcError::EmptySlot(slot) => format_line(format_args!("Slot {:02}", slot)),
        };
        let display = &self.peripherals.display;
        screen::show(display, error.label(), &detail).await;
        screen::set_icon(display, Icon::Error, true).await;
    }

    /// Meter Enter: copy the latest reading into X.
    pub(super) async fn push_reading(&mut self) {
        let Some(reading) = self.kernel.latest_reading() else {
            return;
        };
        let base = self.state.settings.base;
        match self.state.bank.push_constant(reading.value, base) {
            Ok(()) => self.notify(Notice::ReadingPushed),
            Err(e) => self.show_error(e).await,
        }
    }
}
