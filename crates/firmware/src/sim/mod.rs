//! Desktop stand-ins for the board peripherals.
//!
//! | Peripheral  | Simulator                                        |
//! |-------------|--------------------------------------------------|
//! | LCD         | [`TerminalLcd`], redrawn on stdout               |
//! | Keypad      | [`ConsoleKeypad`], key legends typed on stdin    |
//! | RTC         | [`SystemClock`], host clock plus an offset       |
//! | ADC         | [`SyntheticAdc`], a slow sine on the volt input  |
//! | Audio out   | [`ConsoleAudio`], counts samples                 |
//! | Serial port | [`HostPort`] (RX from stdin), [`TraceTx`] (TX)   |
//! | EEPROM      | `platform::eeprom::FileEeprom`                   |
//! | SD card     | `platform::storage_local::LocalFileStorage`      |
//!
//! Configuration comes from the environment:
//!
//! - `SDCARD_PATH` - directory served as the card root (default `./sdcard`)
//! - `RPN_EEPROM` - EEPROM image file (default `./rpn-eeprom.bin`)
//! - `RUST_LOG` - tracing filter (default `info`)

mod console;
mod devices;
mod lcd;

use std::path::PathBuf;

pub use console::{console_task, parse_line, ConsoleCommand, ConsoleKeypad};
pub use devices::{ConsoleAudio, HostPort, SyntheticAdc, SystemClock, TraceTx};
pub use lcd::TerminalLcd;

/// Simulator settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub card_root: PathBuf,
    pub eeprom_path: PathBuf,
}

impl SimConfig {
    pub const DEFAULT_CARD_ROOT: &'static str = "./sdcard";
    pub const DEFAULT_EEPROM: &'static str = "./rpn-eeprom.bin";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            card_root: PathBuf::from(
                lookup("SDCARD_PATH").unwrap_or_else(|| Self::DEFAULT_CARD_ROOT.to_owned()),
            ),
            eeprom_path: PathBuf::from(
                lookup("RPN_EEPROM").unwrap_or_else(|| Self::DEFAULT_EEPROM.to_owned()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let defaults = SimConfig::from_lookup(|_| None);
        assert_eq!(defaults.card_root, PathBuf::from("./sdcard"));
        assert_eq!(defaults.eeprom_path, PathBuf::from("./rpn-eeprom.bin"));

        let custom = SimConfig::from_lookup(|key| (key == "RPN_EEPROM").then(|| "/tmp/e.bin".to_owned()));
        assert_eq!(custom.eeprom_path, PathBuf::from("/tmp/e.bin"));
        assert_eq!(custom.card_root, PathBuf::from("./sdcard"));
    }
}
