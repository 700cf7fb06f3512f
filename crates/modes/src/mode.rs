//! Mode identifiers and their static properties.

use platform::config::{CLOCK_REFRESH_MS, METER_SAMPLE_MS, MUSIC_PROGRESS_MS};
use platform::Icon;
use rpn::TimerKind;

/// Every top-level mode the device can be in.
///
/// The discriminant is the persisted mode index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// RPN calculator, the home mode
    #[default]
    Calculator = 0,
    /// Date and time display
    Clock = 1,
    /// Alarm time editor
    Alarm = 2,
    /// Volt meter
    Meter = 3,
    /// Ohm meter
    Ohms = 4,
    /// SD card browser
    FileList = 5,
    /// Settings editor
    Setup = 6,
    /// WAV player
    MusicList = 7,
}

/// Mode-private periodic work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Periodic {
    ClockRefresh,
    VoltSample,
    OhmSample,
    MusicProgress,
}

impl Periodic {
    pub const fn period_ms(self) -> u64 {
        match self {
            Self::ClockRefresh => CLOCK_REFRESH_MS,
            Self::VoltSample | Self::OhmSample => METER_SAMPLE_MS,
            Self::MusicProgress => MUSIC_PROGRESS_MS,
        }
    }
}

impl Mode {
    pub const COUNT: usize = 8;

    pub const ALL: [Mode; Self::COUNT] = [
        Mode::Calculator,
        Mode::Clock,
        Mode::Alarm,
        Mode::Meter,
        Mode::Ohms,
        Mode::FileList,
        Mode::Setup,
        Mode::MusicList,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Next mode for the Mode key. Setup is reached through Shift+Mode only
    /// and steps back to the calculator.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Calculator => Self::Clock,
            Self::Clock => Self::Alarm,
            Self::Alarm => Self::Meter,
            Self::Meter => Self::Ohms,
            Self::Ohms => Self::FileList,
            Self::FileList => Self::MusicList,
            Self::MusicList | Self::Setup => Self::Calculator,
        }
    }

    /// Periodic task that runs while this mode is active.
    pub const fn periodic(self) -> Option<Periodic> {
        match self {
            Self::Clock => Some(Periodic::ClockRefresh),
            Self::Meter => Some(Periodic::VoltSample),
            Self::Ohms => Some(Periodic::OhmSample),
            Self::MusicList => Some(Periodic::MusicProgress),
            Self::Calculator | Self::Alarm | Self::FileList | Self::Setup => None,
        }
    }

    /// Annunciator shown while this mode is active.
    pub const fn icon(self) -> Option<Icon> {
        match self {
            Self::Calculator => None,
            Self::Clock => Some(Icon::Clock),
            Self::Alarm => Some(Icon::Alarm),
            Self::Meter => Some(Icon::Volts),
            Self::Ohms => Some(Icon::Ohms),
            Self::FileList => Some(Icon::Card),
            Self::Setup => Some(Icon::Setup),
            Self::MusicList => Some(Icon::Note),
        }
    }

    /// Inactivity timer that governs sleep in this mode.
    pub const fn timer(self) -> TimerKind {
        match self {
            Self::Calculator | Self::Setup => TimerKind::Calculator,
            Self::Clock | Self::Alarm => TimerKind::Clock,
            Self::Meter | Self::Ohms => TimerKind::Meter,
            Self::FileList | Self::MusicList => TimerKind::Music,
        }
    }

    /// Name shown on entry when hints are enabled.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Calculator => "Calculator",
            Self::Clock => "Clock",
            Self::Alarm => "Alarm",
            Self::Meter => "Volt meter",
            Self::Ohms => "Ohm meter",
            Self::FileList => "Files",
            Self::Setup => "Setup",
            Self::MusicList => "Music",
        }
    }
}
