//! Help notifications for the LCD help line.

use modes::Mode;
use rpn::Verbosity;

/// How important a notice is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Shown even when help is silenced
    Alert,
    Warning,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// A value was shown in scientific instead of the selected format
    Format(rpn::Notice),
    /// Stored settings were unreadable; defaults are in use
    SettingsReset,
    /// Writing the settings store failed
    SaveFailed,
    ModeTitle(Mode),
    /// STO/RCL waiting for its two slot digits
    SlotPrompt,
    /// Meter reading pushed onto the stack
    ReadingPushed,
    /// Host set the clock
    ClockSet,
    TrackFinished,
    TrackFailed,
    CardError,
    AlarmRinging,
}

impl Notice {
    pub const fn level(self) -> Level {
        match self {
            Self::AlarmRinging => Level::Alert,
            Self::Format(_)
            | Self::SettingsReset
            | Self::SaveFailed
            | Self::TrackFailed
            | Self::CardError => Level::Warning,
            Self::ModeTitle(_)
            | Self::SlotPrompt
            | Self::ReadingPushed
            | Self::ClockSet
            | Self::TrackFinished => Level::Hint,
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::Format(n) => n.text(),
            Self::SettingsReset => "Settings reset",
            Self::SaveFailed => "Save failed",
            Self::ModeTitle(mode) => mode.title(),
            Self::SlotPrompt => "Slot 00-99?",
            Self::ReadingPushed => "Reading -> X",
            Self::ClockSet => "Clock set",
            Self::TrackFinished => "End of track",
            Self::TrackFailed => "Cannot play",
            Self::CardError => "Card error",
            Self::AlarmRinging => "** ALARM **",
        }
    }

    /// Whether `verbosity` lets this notice through.
    pub fn shown_at(self, verbosity: Verbosity) -> bool {
        match self.level() {
            Level::Alert => true,
            Level::Warning => verbosity >= Verbosity::Normal,
            Level::Hint => verbosity >= Verbosity::Verbose,
        }
    }
}
