//! Application configuration and constants
//!
//! This module defines central configuration values used across the firmware.
//! Geometry, capacities and periodic intervals should reference these
//! constants rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "RPN Handheld";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Boot banner shown on the first LCD line.
pub const fn boot_banner() -> &'static str {
    "RPN Handheld"
}

// ── LCD geometry ─────────────────────────────────────────────────────────────

/// Number of text lines on the character LCD.
pub const LCD_LINES: u8 = 2;

/// Number of character columns per LCD line.
pub const LCD_COLUMNS: u8 = 16;

/// Maximum length of one formatted display value.
pub const DISPLAY_TEXT_LEN: usize = 24;

// ── RPN engine ───────────────────────────────────────────────────────────────

/// Depth of the RPN register stack (X, Y, Z, T).
pub const STACK_DEPTH: usize = 4;

/// Number of named memory slots (STO/RCL 00..=99).
pub const MEMORY_SLOTS: usize = 100;

/// Longest operand the keypad entry line accepts.
pub const INPUT_LINE_LEN: usize = 20;

// ── Non-volatile storage ─────────────────────────────────────────────────────

/// EEPROM capacity on the reference board, in bytes.
pub const EEPROM_CAPACITY: usize = 512;

// ── Queues ───────────────────────────────────────────────────────────────────

/// Depth of the keypad event queue.
pub const KEY_QUEUE_DEPTH: usize = 16;

/// Depth of the help-notification queue.
pub const NOTICE_QUEUE_DEPTH: usize = 4;

/// Depth of the host-link outbound queue.
pub const HOST_QUEUE_DEPTH: usize = 4;

// ── Periodic work ────────────────────────────────────────────────────────────

/// Clock mode display refresh interval.
pub const CLOCK_REFRESH_MS: u64 = 1_000;

/// Volt/ohm meter sampling interval.
pub const METER_SAMPLE_MS: u64 = 250;

/// MusicList progress refresh interval.
pub const MUSIC_PROGRESS_MS: u64 = 500;

// ── Meter front end ──────────────────────────────────────────────────────────

/// Number of ADC conversions averaged per meter reading.
pub const METER_AVERAGE_COUNT: u8 = 16;

/// ADC reference voltage.
pub const ADC_REFERENCE_VOLTS: f64 = 3.3;

/// Input divider ratio of the volt channel (probe volts per ADC volt).
pub const VOLT_DIVIDER_RATIO: f64 = 11.0;

/// Reference resistor of the ohm-meter divider, in ohms.
pub const OHM_REFERENCE_RESISTOR: f64 = 10_000.0;

// ── Audio ────────────────────────────────────────────────────────────────────

/// Samples held per channel ring buffer (one slot stays empty).
pub const AUDIO_RING_SLOTS: usize = 1024;

/// Bytes read from the card per producer refill.
pub const AUDIO_READ_CHUNK: usize = 512;
