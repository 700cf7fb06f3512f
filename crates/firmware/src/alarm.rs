//! Daily alarm: the setting, its editor and the once-per-minute trigger.

use core::fmt::Write as _;

use heapless::String;
use platform::DateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    pub hour: u8,
    pub minute: u8,
    pub armed: bool,
}

impl Alarm {
    /// Whether the alarm should ring during the minute `now` falls in.
    pub fn due(&self, now: &DateTime) -> bool {
        self.armed && now.hour == self.hour && now.minute == self.minute
    }
}

/// Rings an alarm at most once per matching minute, however often the
/// clock is sampled within it.
#[derive(Debug, Default)]
pub struct AlarmWatch {
    last: Option<(u16, u8, u8, u8, u8)>,
}

impl AlarmWatch {
    pub const fn new() -> Self {
        Self { last: None }
    }

    pub fn check(&mut self, alarm: &Alarm, now: &DateTime) -> bool {
        if !alarm.due(now) {
            return false;
        }
        let minute = (now.year, now.month, now.day, now.hour, now.minute);
        if self.last == Some(minute) {
            return false;
        }
        self.last = Some(minute);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Field {
    #[default]
    Hour,
    Minute,
}

/// Alarm mode editor: Up/Down change the selected field, Enter moves to the
/// other field, +/- arms or disarms.
#[derive(Debug, Clone, Default)]
pub struct AlarmEditor {
    alarm: Alarm,
    field: Field,
}

impl AlarmEditor {
    pub fn open(alarm: Alarm) -> Self {
        Self {
            alarm,
            field: Field::Hour,
        }
    }

    pub fn alarm(&self) -> Alarm {
        self.alarm
    }

    pub fn up(&mut self) {
        match self.field {
            Field::Hour => self.alarm.hour = step_up(self.alarm.hour, 23),
            Field::Minute => self.alarm.minute = step_up(self.alarm.minute, 59),
        }
    }

    pub fn down(&mut self) {
        match self.field {
            Field::Hour => self.alarm.hour = step_down(self.alarm.hour, 23),
            Field::Minute => self.alarm.minute = step_down(self.alarm.minute, 59),
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            Field::Hour => Field::Minute,
            Field::Minute => Field::Hour,
        };
    }

    pub fn toggle_armed(&mut self) {
        self.alarm.armed = !self.alarm.armed;
    }

    /// LCD lines: state on top, time below with the edited field bracketed.
    pub fn lines(&self) -> (&'static str, String<16>) {
        let top = if self.alarm.armed { "Alarm ON" } else { "Alarm OFF" };
        let mut bottom = String::new();
        let Alarm { hour, minute, .. } = self.alarm;
        let _ = match self.field {
            Field::Hour => write!(bottom, "[{hour:02}]:{minute:02}"),
            Field::Minute => write!(bottom, "{hour:02}:[{minute:02}]"),
        };
        (top, bottom)
    }
}

fn step_up(value: u8, max: u8) -> u8 {
    if value >= max {
        0
    } else {
        value.saturating_add(1)
    }
}

fn step_down(value: u8, max: u8) -> u8 {
    value.checked_sub(1).unwrap_or(max)
}
