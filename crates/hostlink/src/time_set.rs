//! Plain-text clock-set message: `"MM:DD:YYYY:HH:MM:SS\r"`.

use core::fmt::Write as _;

use platform::{DateTime, OutOfRangeError};

/// Characters before the `\r` terminator.
pub const TIME_SET_LEN: usize = 19;
/// Full message length including `\r`.
pub const TIME_SET_TEXT_LEN: usize = TIME_SET_LEN + 1;

/// Formatted message, `\r` included.
pub type TimeSetText = heapless::String<TIME_SET_TEXT_LEN>;

/// Offsets of the `:` separators.
const SEPARATORS: [usize; 5] = [2, 5, 10, 13, 16];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeSetError {
    #[error("expected 19 characters, got {0}")]
    Length(usize),
    #[error("unexpected byte {byte:#04x} at offset {at}")]
    Syntax { at: usize, byte: u8 },
    #[error("field value {0} out of range")]
    OutOfRange(u32),
}

impl From<OutOfRangeError> for TimeSetError {
    fn from(e: OutOfRangeError) -> Self {
        Self::OutOfRange(e.value)
    }
}

/// Parse the 19 characters of a time-set message. A single trailing `\r`
/// is tolerated.
///
/// # Errors
///
/// [`TimeSetError`] on bad length, a non-digit, a misplaced separator, or a
/// calendar field out of range.
pub fn parse(bytes: &[u8]) -> Result<DateTime, TimeSetError> {
    let body = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    if body.len() != TIME_SET_LEN {
        return Err(TimeSetError::Length(body.len()));
    }
    for at in SEPARATORS {
        match body.get(at) {
            Some(b':') => {}
            Some(&byte) => return Err(TimeSetError::Syntax { at, byte }),
            None => return Err(TimeSetError::Length(body.len())),
        }
    }

    let month = field(body, 0, 2)?;
    let day = field(body, 3, 2)?;
    let year = field(body, 6, 4)?;
    let hour = field(body, 11, 2)?;
    let minute = field(body, 14, 2)?;
    let second = field(body, 17, 2)?;

    let narrow = |v: u32| u8::try_from(v).map_err(|_| TimeSetError::OutOfRange(v));
    let year_u16 = u16::try_from(year).map_err(|_| TimeSetError::OutOfRange(year))?;
    Ok(DateTime::new(
        year_u16,
        narrow(month)?,
        narrow(day)?,
        narrow(hour)?,
        narrow(minute)?,
        narrow(second)?,
    )?)
}

/// Decimal field of `width` digits starting at `at`.
fn field(body: &[u8], at: usize, width: usize) -> Result<u32, TimeSetError> {
    let end = at.saturating_add(width);
    let digits = body.get(at..end).ok_or(TimeSetError::Length(body.len()))?;
    let mut value = 0u32;
    for (i, &byte) in digits.iter().enumerate() {
        if !byte.is_ascii_digit() {
            return Err(TimeSetError::Syntax {
                at: at.saturating_add(i),
                byte,
            });
        }
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(byte.saturating_sub(b'0')));
    }
    Ok(value)
}

/// Render `time` as a complete message, terminator included.
pub fn format(time: &DateTime) -> TimeSetText {
    let mut text = TimeSetText::new();
    // Every DateTime renders to exactly TIME_SET_TEXT_LEN bytes.
    let _ = write!(
        text,
        "{:02}:{:02}:{:04}:{:02}:{:02}:{:02}\r",
        time.month, time.day, time.year, time.hour, time.minute, time.second
    );
    text
}
