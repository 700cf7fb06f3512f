//! Mode state machine, key masks and the key dispatch table.
//!
//! - [`mode`]: the eight device modes and their static properties
//! - [`key_mask`]: universal and per-mode key filters
//! - [`manager`]: `ModeManager` (enter/exit, error gate)
//! - [`keymap`]: (key, shift, mode) → `Command`
//!
//! This crate is `no_std` by default.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(missing_docs)]
#![allow(async_fn_in_trait)] // single-threaded executor, Send bounds not needed

pub mod key_mask;
pub mod keymap;
pub mod manager;
pub mod mode;

pub use key_mask::KeyMask;
pub use keymap::{lookup, Command, ShiftState};
pub use manager::{ModeContext, ModeError, ModeManager, Transition};
pub use mode::{Mode, Periodic};
