//! RPN handheld firmware
//!
//! Calculator, clock and alarm, volt/ohm meter, SD card browser and WAV
//! player on a two-line LCD with a touch keypad.
//!
//! # Architecture
//!
//! ```text
//! tasks (keypad, meters, clock, player, host link, notices)
//!         ↓ queues / signal sets / mailboxes
//! app (dispatch: modes, register bank, screens)
//!         ↓
//! kernel (coordination primitives, shared peripherals)
//!         ↓
//! platform traits (Display, Adc, Clock, Storage, AudioOutput, InputDevice)
//! ```
//!
//! Every task is an `async fn ... -> !` that borrows one [`kernel::Kernel`];
//! the board entry point constructs the peripherals and joins the tasks.
//!
//! # Features
//!
//! - `defmt` - Log through defmt on hardware
//! - `emulator` - Desktop simulator (tokio, tracing, std-backed peripherals)
//! - `std` - Enable standard library
//!
//! ## Simulator
//!
//! ```bash
//! cargo run -p firmware --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Application crate: module docs are enough.
#![allow(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]
#![allow(clippy::future_not_send)] // single-threaded executor; tasks borrow !Sync cells

pub(crate) mod fmt;

pub mod alarm;
pub mod app;
pub mod kernel;
pub mod notice;
pub mod tasks;

#[cfg(feature = "emulator")]
pub mod sim;

pub use app::App;
pub use kernel::{Kernel, Peripherals, Reading, Shared};
pub use notice::Notice;
