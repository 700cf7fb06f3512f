//! Real-time clock abstraction

use crate::newtypes::OutOfRangeError;

/// Real-time clock
pub trait Clock {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read the current calendar time
    fn now(&mut self) -> Result<DateTime, Self::Error>;

    /// Set the calendar time
    fn set(&mut self, time: DateTime) -> Result<(), Self::Error>;
}

/// Calendar date and wall-clock time (no time zone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Year, 2000..=2099
    pub year: u16,
    /// Month, 1..=12
    pub month: u8,
    /// Day of month, 1..=days_in_month
    pub day: u8,
    /// Hour, 0..=23
    pub hour: u8,
    /// Minute, 0..=59
    pub minute: u8,
    /// Second, 0..=59
    pub second: u8,
}

impl DateTime {
    /// Earliest year the RTC can hold.
    pub const MIN_YEAR: u16 = 2000;
    /// Latest year the RTC can hold.
    pub const MAX_YEAR: u16 = 2099;

    /// Build a validated `DateTime`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] for the first field outside its range.
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, OutOfRangeError> {
        check(u32::from(year), u32::from(Self::MIN_YEAR), u32::from(Self::MAX_YEAR))?;
        check(u32::from(month), 1, 12)?;
        check(u32::from(day), 1, u32::from(days_in_month(year, month)))?;
        check(u32::from(hour), 0, 23)?;
        check(u32::from(minute), 0, 59)?;
        check(u32::from(second), 0, 59)?;
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Seconds since 1970-01-01T00:00:00.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // fields are range-checked; the sum fits in u64
    pub fn to_unix(&self) -> u64 {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        let days = u64::try_from(days).unwrap_or(0);
        days * 86_400
            + u64::from(self.hour) * 3_600
            + u64::from(self.minute) * 60
            + u64::from(self.second)
    }

    /// Inverse of [`DateTime::to_unix`], clamped to the RTC year range.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // divisions by non-zero constants
    #[allow(clippy::cast_possible_truncation)] // remainders are < 60 / < 24
    pub fn from_unix(secs: u64) -> Self {
        let days = secs / 86_400;
        let rem = secs % 86_400;
        let (year, month, day) = civil_from_days(i64::try_from(days).unwrap_or(0));
        let clamped = Self {
            year: u16::try_from(year).unwrap_or(Self::MAX_YEAR),
            month,
            day,
            hour: (rem / 3_600) as u8,
            minute: ((rem % 3_600) / 60) as u8,
            second: (rem % 60) as u8,
        };
        if clamped.year < Self::MIN_YEAR {
            Self::epoch()
        } else if clamped.year > Self::MAX_YEAR {
            Self {
                year: Self::MAX_YEAR,
                month: 12,
                day: 31,
                hour: 23,
                minute: 59,
                second: 59,
            }
        } else {
            clamped
        }
    }

    /// 2000-01-01T00:00:00, the RTC reset value.
    #[must_use]
    pub const fn epoch() -> Self {
        Self {
            year: 2000,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::epoch()
    }
}

fn check(value: u32, min: u32, max: u32) -> Result<(), OutOfRangeError> {
    if value < min || value > max {
        Err(OutOfRangeError { value, min, max })
    } else {
        Ok(())
    }
}

/// Number of days in `month` of `year` (Gregorian).
#[must_use]
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 31,
    }
}

#[allow(clippy::arithmetic_side_effects)] // modulo by non-zero constants
fn is_leap(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

// Howard Hinnant's days_from_civil / civil_from_days.
#[allow(clippy::arithmetic_side_effects)]
fn days_from_civil(y: i64, m: u8, d: u8) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = i64::from(m);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(d) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[allow(clippy::arithmetic_side_effects)]
#[allow(clippy::cast_possible_truncation)] // month/day are bounded by the algorithm
#[allow(clippy::cast_sign_loss)]
fn civil_from_days(z: i64) -> (i64, u8, u8) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m, d)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_february_30() {
        assert!(DateTime::new(2024, 2, 30, 0, 0, 0).is_err());
        assert!(DateTime::new(2024, 2, 29, 0, 0, 0).is_ok());
        assert!(DateTime::new(2023, 2, 29, 0, 0, 0).is_err());
    }

    #[test]
    fn test_new_rejects_hour_24() {
        let err = DateTime::new(2024, 1, 1, 24, 0, 0).unwrap_err();
        assert_eq!(err.max, 23);
    }

    #[test]
    fn test_unix_epoch_2000() {
        assert_eq!(DateTime::epoch().to_unix(), 946_684_800);
    }

    #[test]
    fn test_unix_round_trip() {
        let t = DateTime::new(2031, 7, 14, 9, 26, 53).unwrap();
        assert_eq!(DateTime::from_unix(t.to_unix()), t);
    }

    #[test]
    fn test_from_unix_before_2000_clamps_to_epoch() {
        assert_eq!(DateTime::from_unix(0), DateTime::epoch());
    }
}
