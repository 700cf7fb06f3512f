//! Two-line LCD drawn as a text box on stdout.

use std::io::{self, Write as _};

use platform::config::{LCD_COLUMNS, LCD_LINES};
use platform::{CursorMode, Display, Icon};

const WIDTH: usize = LCD_COLUMNS as usize;
const HEIGHT: usize = LCD_LINES as usize;

pub struct TerminalLcd {
    lines: [[char; WIDTH]; HEIGHT],
    icons: [bool; Icon::COUNT],
}

impl TerminalLcd {
    pub fn new() -> Self {
        Self {
            lines: [[' '; WIDTH]; HEIGHT],
            icons: [false; Icon::COUNT],
        }
    }

    /// Box, text and lit annunciators as printed.
    pub fn frame(&self) -> String {
        let border = "-".repeat(WIDTH);
        let mut out = format!("+{border}+\n");
        for line in &self.lines {
            out.push('|');
            out.extend(line.iter());
            out.push_str("|\n");
        }
        let lit: Vec<&str> = Icon::ALL
            .iter()
            .filter(|icon| self.icons.get(usize::from(**icon as u8)).copied().unwrap_or(false))
            .map(|icon| icon.label())
            .collect();
        out.push_str(&format!("+{border}+ {}\n", lit.join(" ")));
        out
    }

    fn render(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.frame().as_bytes())?;
        stdout.flush()
    }
}

impl Default for TerminalLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TerminalLcd {
    type Error = io::Error;

    async fn clear(&mut self) -> Result<(), Self::Error> {
        for line in &mut self.lines {
            line.fill(' ');
        }
        self.render()
    }

    async fn write_text(&mut self, line: u8, col: u8, text: &str) -> Result<(), Self::Error> {
        let Some(row) = self.lines.get_mut(usize::from(line)) else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "no such line"));
        };
        let cells = row.iter_mut().skip(usize::from(col));
        for (cell, c) in cells.zip(text.chars()) {
            *cell = c;
        }
        self.render()
    }

    async fn set_cursor(&mut self, _mode: CursorMode) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn set_icon(&mut self, icon: Icon, on: bool) -> Result<(), Self::Error> {
        if let Some(slot) = self.icons.get_mut(usize::from(icon as u8)) {
            *slot = on;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frame_shows_text_and_icons() {
        let mut lcd = TerminalLcd::new();
        lcd.write_text(1, 12, "42.5").await.unwrap();
        lcd.set_icon(Icon::Hex, true).await.unwrap();
        let frame = lcd.frame();
        let rows: Vec<&str> = frame.lines().collect();
        assert_eq!(rows[2], "|            42.5|");
        assert!(rows[3].ends_with(Icon::Hex.label()));
    }

    #[tokio::test]
    async fn test_text_clipped_at_the_edge() {
        let mut lcd = TerminalLcd::new();
        lcd.write_text(0, 14, "ABCD").await.unwrap();
        assert!(lcd.frame().lines().nth(1).unwrap().ends_with("AB|"));
        assert!(lcd.write_text(2, 0, "x").await.is_err());
    }
}
