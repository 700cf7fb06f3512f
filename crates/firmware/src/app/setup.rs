//! Setup mode: step through the calculator settings and adjust them.

use platform::Precision;
use rpn::{AngleUnit, CalculatorSettings, NumericBase, TimerKind, Verbosity};

use super::screen::{format_line, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupField {
    Base,
    FixPrecision,
    EngPrecision,
    Angle,
    Verbosity,
    Timer(TimerKind),
}

const FIELDS: [SetupField; 9] = [
    SetupField::Base,
    SetupField::FixPrecision,
    SetupField::EngPrecision,
    SetupField::Angle,
    SetupField::Verbosity,
    SetupField::Timer(TimerKind::Calculator),
    SetupField::Timer(TimerKind::Meter),
    SetupField::Timer(TimerKind::Clock),
    SetupField::Timer(TimerKind::Music),
];

impl SetupField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Base => "Number base",
            Self::FixPrecision => "Fix digits",
            Self::EngPrecision => "Eng digits",
            Self::Angle => "Angle unit",
            Self::Verbosity => "Help level",
            Self::Timer(TimerKind::Calculator) => "Calc sleep",
            Self::Timer(TimerKind::Meter) => "Meter sleep",
            Self::Timer(TimerKind::Clock) => "Clock sleep",
            Self::Timer(TimerKind::Music) => "Music sleep",
        }
    }
}

/// Cursor over the setup fields. Enter moves to the next field (wrapping);
/// Up/Down step the value.
#[derive(Debug, Clone, Default)]
pub struct SetupEditor {
    index: usize,
}

impl SetupEditor {
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    pub fn field(&self) -> SetupField {
        FIELDS.get(self.index).copied().unwrap_or(SetupField::Base)
    }

    pub fn next_field(&mut self) {
        self.index = self.index.saturating_add(1);
        if self.index >= FIELDS.len() {
            self.index = 0;
        }
    }

    /// Back to the first field (on entering Setup).
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Step the selected value. Returns `true` if displayed numbers must be
    /// re-formatted.
    pub fn adjust(&self, settings: &mut CalculatorSettings, up: bool) -> bool {
        match self.field() {
            SetupField::Base => {
                settings.base = settings.base.toggled();
                true
            }
            SetupField::FixPrecision => {
                settings.fix_precision = step_precision(settings.fix_precision, up);
                true
            }
            SetupField::EngPrecision => {
                settings.eng_precision = step_precision(settings.eng_precision, up);
                true
            }
            SetupField::Angle => {
                settings.angle = settings.angle.toggled();
                false
            }
            SetupField::Verbosity => {
                settings.verbosity = step_verbosity(settings.verbosity, up);
                false
            }
            SetupField::Timer(kind) => {
                let timer = settings.timers.get_mut(kind);
                *timer = if up { timer.cycle() } else { timer.cycle_back() };
                false
            }
        }
    }

    pub fn lines(&self, settings: &CalculatorSettings) -> (&'static str, Line) {
        let field = self.field();
        let value = match field {
            SetupField::Base => format_line(format_args!(
                "{}",
                match settings.base {
                    NumericBase::Decimal => "Decimal",
                    NumericBase::Hex => "Hex",
                }
            )),
            SetupField::FixPrecision => format_line(format_args!("{}", settings.fix_precision.get())),
            SetupField::EngPrecision => format_line(format_args!("{}", settings.eng_precision.get())),
            SetupField::Angle => format_line(format_args!(
                "{}",
                match settings.angle {
                    AngleUnit::Degrees => "Degrees",
                    AngleUnit::Radians => "Radians",
                }
            )),
            SetupField::Verbosity => format_line(format_args!(
                "{}",
                match settings.verbosity {
                    Verbosity::Silent => "Silent",
                    Verbosity::Normal => "Normal",
                    Verbosity::Verbose => "Verbose",
                }
            )),
            SetupField::Timer(kind) => match settings.timers.get(kind).seconds() {
                None => format_line(format_args!("Never")),
                Some(secs) if secs < 60 => format_line(format_args!("{secs} s")),
                Some(secs) => format_line(format_args!("{} min", secs.checked_div(60).unwrap_or(0))),
            },
        };
        (field.label(), value)
    }
}

fn step_precision(p: Precision, up: bool) -> Precision {
    if up {
        p.cycle()
    } else {
        Precision::new(p.get().checked_sub(1).unwrap_or(Precision::MAX))
    }
}

fn step_verbosity(v: Verbosity, up: bool) -> Verbosity {
    if up {
        v.cycle()
    } else {
        v.cycle().cycle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_cycles_every_field() {
        let mut editor = SetupEditor::new();
        let mut seen = Vec::new();
        for _ in 0..FIELDS.len() {
            seen.push(editor.field());
            editor.next_field();
        }
        assert_eq!(seen, FIELDS.to_vec());
        assert_eq!(editor.field(), SetupField::Base);
    }

    #[test]
    fn test_precision_wraps_both_ways() {
        let mut settings = CalculatorSettings::default();
        let mut editor = SetupEditor::new();
        editor.next_field();
        settings.fix_precision = Precision::new(0);
        assert!(editor.adjust(&mut settings, false));
        assert_eq!(settings.fix_precision.get(), 9);
        editor.adjust(&mut settings, true);
        assert_eq!(settings.fix_precision.get(), 0);
    }

    #[test]
    fn test_verbosity_steps_back() {
        assert_eq!(step_verbosity(Verbosity::Normal, false), Verbosity::Silent);
        assert_eq!(step_verbosity(Verbosity::Silent, false), Verbosity::Verbose);
    }

    #[test]
    fn test_timer_lines() {
        let mut settings = CalculatorSettings::default();
        let mut editor = SetupEditor::new();
        for _ in 0..5 {
            editor.next_field();
        }
        assert_eq!(editor.field(), SetupField::Timer(TimerKind::Calculator));
        let (label, value) = editor.lines(&settings);
        assert_eq!(label, "Calc sleep");
        assert_eq!(value.as_str(), "5 min");
        editor.adjust(&mut settings, false);
        editor.adjust(&mut settings, false);
        editor.adjust(&mut settings, false);
        assert_eq!(editor.lines(&settings).1.as_str(), "30 s");
        editor.adjust(&mut settings, false);
        assert_eq!(editor.lines(&settings).1.as_str(), "Never");
    }
}
