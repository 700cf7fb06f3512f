//! Hardware Abstraction Layer (HAL) for the RPN handheld calculator
//!
//! This crate provides trait-based abstractions for every peripheral the
//! firmware core talks to, enabling development and testing without physical
//! hardware. The core always calls out through these traits; peripherals never
//! call back into the core.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: kernel, tasks, dispatch)
//!         ↓
//! Feature Layers (rpn, persist, playback, hostlink, modes)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Peripheral drivers (LCD, ADC, EEPROM, PWM, RTC, UART, SD)
//! ```
//!
//! # Peripherals
//!
//! - [`Display`] - character LCD with status icons
//! - [`Adc`] - the single shared ADC (volt/ohm meter)
//! - [`NonVolatileStore`] - settings EEPROM (`embedded_storage::Storage`)
//! - [`AudioOutput`] - fixed-rate PWM sample output
//! - [`Clock`] - real-time clock
//! - [`Storage`] / [`File`] - SD card directory and file reads
//! - [`InputDevice`] - touch keypad
//! - host serial link: any `embedded_io_async::{Read, Write}` transport
//!
//! # Features
//!
//! - `std`: mocks and std-backed implementations (for testing and the simulator)
//! - `defmt`: Enable defmt derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod adc;
pub mod audio;
pub mod clock;
pub mod config;
pub mod display;
pub mod input;
pub mod newtypes;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod eeprom;
#[cfg(any(test, feature = "std"))]
pub mod mocks;
#[cfg(any(test, feature = "std"))]
pub mod storage_local;

// Re-export main high-level traits
pub use adc::{Adc, AdcChannel};
pub use audio::AudioOutput;
pub use clock::{Clock, DateTime};
pub use display::{CursorMode, Display, DisplayError, Icon};
pub use input::{InputDevice, InputEvent, KeyId};
pub use newtypes::{MemorySlot, OutOfRangeError, Precision, SampleRateHz};
pub use storage::{DirEntry, File, Storage};

/// Non-volatile byte store holding the settings blob (EEPROM on the board).
///
/// `read(addr, n)` / `write(addr, bytes)` map onto
/// [`embedded_storage::ReadStorage::read`] and [`embedded_storage::Storage::write`].
pub use embedded_storage::Storage as NonVolatileStore;
pub use embedded_storage::ReadStorage;
