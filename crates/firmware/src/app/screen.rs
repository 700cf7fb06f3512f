//! Two-line LCD layout helpers.

use core::fmt::{self, Write as _};

use heapless::String;
use platform::config::LCD_COLUMNS;
use platform::{Display, Icon};

use crate::fmt::warn;
use crate::kernel::Shared;

const WIDTH: usize = LCD_COLUMNS as usize;

/// One full LCD line.
pub type Line = String<WIDTH>;

/// `text` clipped to the LCD width.
pub fn clip(text: &str) -> Line {
    let mut line = Line::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// `text` right-aligned in a full-width line (clipped on the left).
pub fn right_aligned(text: &str) -> Line {
    let skip = text.chars().count().saturating_sub(WIDTH);
    let mut line = Line::new();
    let pad = WIDTH.saturating_sub(text.chars().count());
    for _ in 0..pad {
        let _ = line.push(' ');
    }
    for c in text.chars().skip(skip) {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// Format into a line, clipping instead of failing on overflow.
pub fn format_line(args: fmt::Arguments<'_>) -> Line {
    let mut wide: String<32> = String::new();
    let _ = wide.write_fmt(args);
    clip(&wide)
}

/// Pad to full width so the write erases whatever was there.
fn padded(text: &str) -> Line {
    let mut line = clip(text);
    while line.push(' ').is_ok() {}
    line
}

/// Replace both lines.
pub async fn show<D: Display>(display: &Shared<D>, top: &str, bottom: &str) {
    let mut lcd = display.lock().await;
    let top = lcd.write_text(0, 0, &padded(top)).await;
    let bottom = lcd.write_text(1, 0, &padded(bottom)).await;
    if top.is_err() || bottom.is_err() {
        warn!("display write failed");
    }
}

/// Replace one line.
pub async fn show_line<D: Display>(display: &Shared<D>, line: u8, text: &str) {
    let mut lcd = display.lock().await;
    if lcd.write_text(line, 0, &padded(text)).await.is_err() {
        warn!("display write failed");
    }
}

pub async fn set_icon<D: Display>(display: &Shared<D>, icon: Icon, on: bool) {
    let mut lcd = display.lock().await;
    if lcd.set_icon(icon, on).await.is_err() {
        warn!("icon {} update failed", icon.label());
    }
}

/// Blank both lines and every icon (sleep).
pub async fn blank<D: Display>(display: &Shared<D>) {
    let mut lcd = display.lock().await;
    let mut failed = lcd.clear().await.is_err();
    for icon in Icon::ALL {
        failed |= lcd.set_icon(icon, false).await.is_err();
    }
    if failed {
        warn!("display blank failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_aligned_pads_and_clips() {
        assert_eq!(right_aligned("3.1416").as_str(), "          3.1416");
        assert_eq!(
            right_aligned("12345678901234567890").as_str(),
            "5678901234567890"
        );
    }

    #[test]
    fn test_format_line_clips() {
        let line = format_line(format_args!("{}-{}", "abcdefghij", "klmnopqrst"));
        assert_eq!(line.as_str(), "abcdefghij-klmno");
    }

    #[test]
    fn test_padded_is_full_width() {
        assert_eq!(padded("ab").len(), WIDTH);
    }
}
