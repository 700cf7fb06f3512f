//! Settings persistence — the calculator state as one EEPROM blob.
//!
//! # Modules
//!
//! - [`blob`] — blob layout, `encode` / `decode`, and the `load` / `save`
//!   drivers over any `embedded_storage` store
//!
//! State is loaded once at boot (falling back to defaults when the blob is
//! [`Decoded::Uninitialized`]) and saved when the device goes to sleep.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(missing_docs)]

pub mod blob;

pub use blob::{
    decode, encode, load, save, Decoded, Encoded, StorageError, HEADER_LEN, MAX_BLOB_LEN,
    RECORD_LEN,
};

/// Load the persisted state, or defaults when the store is blank or unreadable.
///
/// The second value is the failure, if any, for the caller to report.
pub fn load_or_default<S: embedded_storage::ReadStorage>(
    store: &mut S,
) -> (rpn::CalculatorState, Option<StorageError>) {
    match load(store) {
        Ok(Decoded::Restored(state)) => (state, None),
        Ok(Decoded::Uninitialized) => (rpn::CalculatorState::default(), None),
        Err(e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("settings load failed: {}", e);
            (rpn::CalculatorState::default(), Some(e))
        }
    }
}
