//! Mode state machine and the error gate.
//!
//! ```text
//!   enter(new):  leave(current) ──> setup(new)
//!   leave(m):    quiesce m's periodic task (awaits idle ack)
//!                restore the universal mask
//!                clear m's annunciator
//!   setup(m):    mask = universal ∩ for_mode(m)
//!                set m's annunciator
//!                resume m's periodic task
//! ```
//!
//! Entering the mode that is already active changes nothing. `exit` is the
//! only other way out and lands on the calculator unless told otherwise.
//!
//! While an error is shown the active mask is narrowed to
//! [`KeyMask::ACKNOWLEDGE`]; [`ModeManager::acknowledge`] restores whatever
//! mask was active before.

use platform::{Icon, KeyId};
use rpn::CalculatorSettings;

use crate::key_mask::KeyMask;
use crate::mode::Mode;

/// Side effects of a mode change, supplied by the firmware kernel.
pub trait ModeContext {
    /// Stop `mode`'s periodic work and return only once it has gone idle.
    async fn quiesce(&mut self, mode: Mode);

    /// Start (or restart) `mode`'s periodic work.
    async fn resume(&mut self, mode: Mode);

    /// Switch a mode annunciator on or off.
    async fn decorate(&mut self, icon: Icon, on: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeError {
    /// Persisted or requested mode index outside 0..=7
    #[error("unknown mode index {0}")]
    UnknownMode(u8),
    /// A mode change was requested while an error awaits acknowledgment
    #[error("error pending acknowledgment")]
    Gated,
}

/// Result of [`ModeManager::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Already in the requested mode
    Unchanged,
    /// Left `from` and set up the new mode
    Changed { from: Mode },
}

pub struct ModeManager {
    current: Mode,
    universal: KeyMask,
    active: KeyMask,
    /// Mask to restore once the pending error is acknowledged
    gated: Option<KeyMask>,
}

impl ModeManager {
    /// Calculator mode with every key enabled. Nothing is running yet; call
    /// [`ModeManager::start`] once the kernel is up.
    pub const fn new() -> Self {
        Self {
            current: Mode::Calculator,
            universal: KeyMask::ALL,
            active: KeyMask::ALL,
            gated: None,
        }
    }

    /// Rebuild from persisted settings. An invalid mode index falls back to
    /// the calculator.
    pub fn from_settings(settings: &CalculatorSettings) -> (Self, Option<ModeError>) {
        let universal = KeyMask::from_bits(settings.key_filter);
        let (current, err) = match Mode::from_index(settings.mode) {
            Some(mode) => (mode, None),
            None => (Mode::Calculator, Some(ModeError::UnknownMode(settings.mode))),
        };
        let manager = Self {
            current,
            universal,
            active: universal.intersect(KeyMask::for_mode(current)),
            gated: None,
        };
        (manager, err)
    }

    /// Write the current mode and universal mask back for persistence.
    pub fn store_into(&self, settings: &mut CalculatorSettings) {
        settings.mode = self.current.index();
        settings.key_filter = self.universal.bits();
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn universal_mask(&self) -> KeyMask {
        self.universal
    }

    /// Mask currently applied to key events.
    pub fn active_mask(&self) -> KeyMask {
        self.active
    }

    pub fn accepts(&self, key: KeyId) -> bool {
        self.active.contains(key)
    }

    pub fn is_gated(&self) -> bool {
        self.gated.is_some()
    }

    /// Replace the universal mask and re-derive the active one.
    pub fn set_universal(&mut self, mask: KeyMask) {
        self.universal = mask;
        let mode_mask = mask.intersect(KeyMask::for_mode(self.current));
        match &mut self.gated {
            Some(saved) => *saved = mode_mask,
            None => self.active = mode_mask,
        }
    }

    /// Set up the restored mode: decoration and periodic task.
    pub async fn start<C: ModeContext>(&mut self, ctx: &mut C) {
        self.setup(ctx, self.current).await;
    }

    /// Switch to `new`, leaving the current mode first.
    ///
    /// # Errors
    ///
    /// [`ModeError::Gated`] while an error awaits acknowledgment.
    pub async fn enter<C: ModeContext>(
        &mut self,
        ctx: &mut C,
        new: Mode,
    ) -> Result<Transition, ModeError> {
        if self.is_gated() {
            return Err(ModeError::Gated);
        }
        if new == self.current {
            return Ok(Transition::Unchanged);
        }
        let from = self.current;
        self.leave(ctx).await;
        self.setup(ctx, new).await;
        #[cfg(feature = "defmt")]
        defmt::debug!("mode: {} -> {}", from, new);
        Ok(Transition::Changed { from })
    }

    /// Leave the current mode for `next`, the calculator by default.
    ///
    /// # Errors
    ///
    /// [`ModeError::Gated`] while an error awaits acknowledgment.
    pub async fn exit<C: ModeContext>(
        &mut self,
        ctx: &mut C,
        next: Option<Mode>,
    ) -> Result<Mode, ModeError> {
        if self.is_gated() {
            return Err(ModeError::Gated);
        }
        let target = next.unwrap_or(Mode::Calculator);
        self.leave(ctx).await;
        self.setup(ctx, target).await;
        Ok(target)
    }

    /// Stop the current mode's periodic work without changing mode (sleep).
    pub async fn suspend<C: ModeContext>(&mut self, ctx: &mut C) {
        if self.current.periodic().is_some() {
            ctx.quiesce(self.current).await;
        }
    }

    async fn leave<C: ModeContext>(&mut self, ctx: &mut C) {
        let mode = self.current;
        if mode.periodic().is_some() {
            ctx.quiesce(mode).await;
        }
        self.active = self.universal;
        if let Some(icon) = mode.icon() {
            ctx.decorate(icon, false).await;
        }
    }

    async fn setup<C: ModeContext>(&mut self, ctx: &mut C, mode: Mode) {
        self.current = mode;
        self.active = self.universal.intersect(KeyMask::for_mode(mode));
        if let Some(icon) = mode.icon() {
            ctx.decorate(icon, true).await;
        }
        if mode.periodic().is_some() {
            ctx.resume(mode).await;
        }
    }

    /// Narrow input to the acknowledgment keys. Raising while already gated
    /// keeps the originally saved mask.
    pub fn raise_error(&mut self) {
        if self.gated.is_none() {
            self.gated = Some(self.active);
        }
        self.active = KeyMask::ACKNOWLEDGE;
    }

    /// Dismiss the pending error, restoring the mask that was active.
    /// Returns `false` if no error was pending.
    pub fn acknowledge(&mut self) -> bool {
        match self.gated.take() {
            Some(saved) => {
                self.active = saved;
                true
            }
            None => false,
        }
    }
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}
