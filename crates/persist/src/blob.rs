//! Settings blob codec.
//!
//! The blob holds the whole [`CalculatorState`]: packed settings, the four
//! stack registers and as many named-memory records as the store has room for.
//! All multi-byte values are little-endian.
//!
//! Layout:
//! ```text
//! [0]        presence marker 0xA5
//! [1]        base/format flags (hi)  | fix precision (lo)
//! [2]        eng precision (hi)      | angle unit (lo)
//! [3]        verbosity (hi)          | active mode (lo)
//! [4]        calculator timer (hi)   | meter timer (lo)
//! [5]        clock timer (hi)        | music timer (lo)
//! [6..10]    key filter, keys 0..=31   u32 le
//! [10..14]   key filter, keys 32..=63  u32 le
//! [14..46]   registers X, Y, Z, T      4 × f64 le
//! [46..]     records: 0x5A, slot u8, value f64 le   (10 bytes each)
//!            ended by the first byte that is not 0x5A (0x00 is written)
//! ```
//!
//! Records are written in ascending slot order, so a store too small for the
//! whole memory loses the highest slots first.

use embedded_storage::{ReadStorage, Storage};
use platform::config::{MEMORY_SLOTS, STACK_DEPTH};
use platform::{MemorySlot, Precision};
use rpn::settings::{base_format_from_nibble, base_format_nibble};
use rpn::{
    AngleUnit, CalculatorSettings, CalculatorState, NamedMemory, RegisterBank, Timeout, Verbosity,
};

/// First byte of an initialised blob.
pub const PRESENCE_MARKER: u8 = 0xA5;
/// First byte of each memory record.
pub const RECORD_MARKER: u8 = 0x5A;
/// Written after the last record.
pub const END_MARKER: u8 = 0x00;
/// Fixed part of the blob: marker, settings, key filter, registers.
pub const HEADER_LEN: usize = 46;
/// One memory record.
pub const RECORD_LEN: usize = 10;
/// Size of a blob carrying every memory slot.
pub const MAX_BLOB_LEN: usize = HEADER_LEN + RECORD_LEN * MEMORY_SLOTS + 1;

/// Non-volatile store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// The store reported a read failure
    #[error("settings store read failed")]
    Read,
    /// The store reported a write failure
    #[error("settings store write failed")]
    Write,
    /// Not even the fixed header fits
    #[error("settings store holds {0} bytes, header needs 47")]
    TooSmall(usize),
}

/// Result of decoding a blob.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The presence marker matched
    Restored(CalculatorState),
    /// Blank or foreign contents; the caller falls back to defaults
    Uninitialized,
}

/// What an encode or save actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoded {
    /// Bytes written, end marker included
    pub len: usize,
    /// Memory records written
    pub records: usize,
    /// Memory records left out for lack of room
    pub dropped: usize,
}

enum Record {
    End,
    Invalid,
    Slot(MemorySlot, f64),
}

// ---------------------------------------------------------------------------
// In-memory codec
// ---------------------------------------------------------------------------

/// Encode `state` into `buf`, whose length is the store capacity.
///
/// Memory records are appended while one more record and the end marker still
/// fit; the rest are counted in [`Encoded::dropped`].
///
/// # Errors
///
/// [`StorageError::TooSmall`] if `buf` cannot hold the header and end marker.
pub fn encode(state: &CalculatorState, buf: &mut [u8]) -> Result<Encoded, StorageError> {
    let capacity = buf.len();
    let budget = record_budget(capacity)?;
    let header_slot = buf
        .get_mut(..HEADER_LEN)
        .ok_or(StorageError::TooSmall(capacity))?;
    header_slot.copy_from_slice(&encode_header(state));

    let mut offset = HEADER_LEN;
    let mut records = 0usize;
    let used = state.bank.memory().used_count();
    for (slot, value) in state.bank.memory().iter_used().take(budget) {
        let end = offset.saturating_add(RECORD_LEN);
        let dst = buf
            .get_mut(offset..end)
            .ok_or(StorageError::TooSmall(capacity))?;
        dst.copy_from_slice(&encode_record(slot, value));
        offset = end;
        records = records.saturating_add(1);
    }
    let end_byte = buf.get_mut(offset).ok_or(StorageError::TooSmall(capacity))?;
    *end_byte = END_MARKER;

    Ok(finish(offset.saturating_add(1), records, used))
}

/// Decode a blob read back from the store.
///
/// Tolerates zero records, a missing end marker and a record stream cut off
/// at the end of `bytes`. Out-of-range setting nibbles fall back to their
/// defaults.
pub fn decode(bytes: &[u8]) -> Decoded {
    let Some(header) = bytes
        .get(..HEADER_LEN)
        .and_then(|h| <&[u8; HEADER_LEN]>::try_from(h).ok())
    else {
        return Decoded::Uninitialized;
    };
    let Some((settings, stack)) = decode_header(header) else {
        return Decoded::Uninitialized;
    };

    let mut memory = NamedMemory::new();
    let records = bytes.get(HEADER_LEN..).unwrap_or(&[]);
    for chunk in records.chunks_exact(RECORD_LEN) {
        let Ok(record) = <&[u8; RECORD_LEN]>::try_from(chunk) else {
            break;
        };
        match decode_record(record) {
            Record::End => break,
            Record::Invalid => continue,
            Record::Slot(slot, value) => memory.store(slot, value),
        }
    }
    Decoded::Restored(CalculatorState::new(
        settings,
        RegisterBank::restore(stack, memory),
    ))
}

// ---------------------------------------------------------------------------
// Store driver
// ---------------------------------------------------------------------------

/// Read the blob from `store`.
///
/// # Errors
///
/// [`StorageError::Read`] if the store fails, [`StorageError::TooSmall`] if it
/// cannot hold a header.
pub fn load<S: ReadStorage>(store: &mut S) -> Result<Decoded, StorageError> {
    let capacity = store.capacity();
    record_budget(capacity)?;

    let mut header = [0u8; HEADER_LEN];
    store.read(0, &mut header).map_err(|_| StorageError::Read)?;
    let Some((settings, stack)) = decode_header(&header) else {
        return Ok(Decoded::Uninitialized);
    };

    let mut memory = NamedMemory::new();
    let mut offset = HEADER_LEN;
    while offset.saturating_add(RECORD_LEN) <= capacity {
        let mut record = [0u8; RECORD_LEN];
        store
            .read(to_addr(offset)?, &mut record)
            .map_err(|_| StorageError::Read)?;
        match decode_record(&record) {
            Record::End => break,
            Record::Invalid => {}
            Record::Slot(slot, value) => memory.store(slot, value),
        }
        offset = offset.saturating_add(RECORD_LEN);
    }
    Ok(Decoded::Restored(CalculatorState::new(
        settings,
        RegisterBank::restore(stack, memory),
    )))
}

/// Write `state` to `store`, best effort: memory records that do not fit are
/// dropped, highest slots first, and counted in the returned [`Encoded`].
///
/// # Errors
///
/// [`StorageError::Write`] if the store fails, [`StorageError::TooSmall`] if it
/// cannot hold a header.
pub fn save<S: Storage>(state: &CalculatorState, store: &mut S) -> Result<Encoded, StorageError> {
    let budget = record_budget(store.capacity())?;

    store
        .write(0, &encode_header(state))
        .map_err(|_| StorageError::Write)?;

    let mut offset = HEADER_LEN;
    let mut records = 0usize;
    let used = state.bank.memory().used_count();
    for (slot, value) in state.bank.memory().iter_used().take(budget) {
        store
            .write(to_addr(offset)?, &encode_record(slot, value))
            .map_err(|_| StorageError::Write)?;
        offset = offset.saturating_add(RECORD_LEN);
        records = records.saturating_add(1);
    }
    store
        .write(to_addr(offset)?, &[END_MARKER])
        .map_err(|_| StorageError::Write)?;

    Ok(finish(offset.saturating_add(1), records, used))
}

// ---------------------------------------------------------------------------
// Fixed-size pieces
// ---------------------------------------------------------------------------

/// Encode the 46-byte header.
///
/// # Safety (lint allow)
/// All range indices are compile-time constants within `[0, HEADER_LEN)`.
/// The buffer is `[u8; HEADER_LEN]` so all slices are always valid.
#[must_use]
#[allow(clippy::indexing_slicing)]
#[allow(clippy::arithmetic_side_effects)] // register offsets: i < STACK_DEPTH, at most 14 + 3 * 8 + 8
pub fn encode_header(state: &CalculatorState) -> [u8; HEADER_LEN] {
    let s = &state.settings;
    let mut buf = [0u8; HEADER_LEN];
    buf[0] = PRESENCE_MARKER;
    buf[1] = pack(base_format_nibble(s.base, s.format), s.fix_precision.get());
    buf[2] = pack(s.eng_precision.get(), s.angle.nibble());
    buf[3] = pack(s.verbosity.nibble(), s.mode);
    buf[4] = pack(s.timers.calculator.index(), s.timers.meter.index());
    buf[5] = pack(s.timers.clock.index(), s.timers.music.index());
    let [low, high] = s.key_filter_words();
    buf[6..10].copy_from_slice(&low.to_le_bytes());
    buf[10..14].copy_from_slice(&high.to_le_bytes());
    for (i, value) in state.bank.stack().iter().enumerate() {
        let at = 14 + i * 8;
        buf[at..at + 8].copy_from_slice(&value.to_le_bytes());
    }
    buf
}

/// Decode the header; `None` when the presence marker is wrong.
///
/// Non-finite register values restore as zero.
///
/// # Safety (lint allow)
/// All range indices are compile-time constants within `[0, HEADER_LEN)`.
/// The buffer is `&[u8; HEADER_LEN]` so all slices are always valid.
#[allow(clippy::indexing_slicing)]
#[allow(clippy::arithmetic_side_effects)] // register offsets as in encode_header
pub fn decode_header(buf: &[u8; HEADER_LEN]) -> Option<(CalculatorSettings, [f64; STACK_DEPTH])> {
    if buf[0] != PRESENCE_MARKER {
        return None;
    }
    let defaults = CalculatorSettings::default();
    let mut s = defaults;

    let (flags, fix) = unpack(buf[1]);
    if let Some((base, format)) = base_format_from_nibble(flags) {
        s.base = base;
        s.format = format;
    }
    s.fix_precision = Precision::try_new(fix).unwrap_or(defaults.fix_precision);

    let (eng, angle) = unpack(buf[2]);
    s.eng_precision = Precision::try_new(eng).unwrap_or(defaults.eng_precision);
    s.angle = AngleUnit::from_nibble(angle).unwrap_or(defaults.angle);

    let (verbosity, mode) = unpack(buf[3]);
    s.verbosity = Verbosity::from_nibble(verbosity).unwrap_or(defaults.verbosity);
    s.mode = if mode <= CalculatorSettings::MAX_MODE {
        mode
    } else {
        defaults.mode
    };

    let (calc, meter) = unpack(buf[4]);
    let (clock, music) = unpack(buf[5]);
    s.timers.calculator = Timeout::from_index(calc).unwrap_or(defaults.timers.calculator);
    s.timers.meter = Timeout::from_index(meter).unwrap_or(defaults.timers.meter);
    s.timers.clock = Timeout::from_index(clock).unwrap_or(defaults.timers.clock);
    s.timers.music = Timeout::from_index(music).unwrap_or(defaults.timers.music);

    let low = u32::from_le_bytes(buf[6..10].try_into().ok()?);
    let high = u32::from_le_bytes(buf[10..14].try_into().ok()?);
    s.set_key_filter_words([low, high]);
    // A filter with every key off would leave no way to recover.
    if s.key_filter == 0 {
        s.key_filter = defaults.key_filter;
    }

    let mut stack = [0.0f64; STACK_DEPTH];
    for (i, reg) in stack.iter_mut().enumerate() {
        let at = 14 + i * 8;
        let value = f64::from_le_bytes(buf[at..at + 8].try_into().ok()?);
        *reg = if value.is_finite() { value } else { 0.0 };
    }
    Some((s, stack))
}

/// Encode one memory record.
///
/// # Safety (lint allow)
/// Constant indices within `[0, RECORD_LEN)`.
#[must_use]
#[allow(clippy::indexing_slicing)]
pub fn encode_record(slot: MemorySlot, value: f64) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    buf[0] = RECORD_MARKER;
    buf[1] = slot.get();
    buf[2..10].copy_from_slice(&value.to_le_bytes());
    buf
}

#[allow(clippy::indexing_slicing)] // constant indices within [0, RECORD_LEN)
fn decode_record(buf: &[u8; RECORD_LEN]) -> Record {
    if buf[0] != RECORD_MARKER {
        return Record::End;
    }
    let Ok(slot) = MemorySlot::new(buf[1]) else {
        return Record::Invalid;
    };
    let Ok(bytes) = buf[2..10].try_into() else {
        return Record::Invalid;
    };
    let value = f64::from_le_bytes(bytes);
    if value.is_finite() {
        Record::Slot(slot, value)
    } else {
        Record::Invalid
    }
}

/// Records that fit in `capacity` bytes alongside the header and end marker.
///
/// # Errors
///
/// [`StorageError::TooSmall`] below `HEADER_LEN + 1` bytes.
pub fn record_budget(capacity: usize) -> Result<usize, StorageError> {
    let room = capacity
        .checked_sub(HEADER_LEN.saturating_add(1))
        .ok_or(StorageError::TooSmall(capacity))?;
    Ok(room.checked_div(RECORD_LEN).unwrap_or(0).min(MEMORY_SLOTS))
}

fn finish(len: usize, records: usize, used: usize) -> Encoded {
    let dropped = used.saturating_sub(records);
    if dropped > 0 {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "settings blob full: kept {=usize} memory records, dropped {=usize}",
            records,
            dropped
        );
    }
    Encoded {
        len,
        records,
        dropped,
    }
}

fn to_addr(offset: usize) -> Result<u32, StorageError> {
    u32::try_from(offset).map_err(|_| StorageError::TooSmall(offset))
}

#[allow(clippy::arithmetic_side_effects)] // u8 shifts by 4 cannot overflow
fn pack(hi: u8, lo: u8) -> u8 {
    ((hi & 0x0F) << 4) | (lo & 0x0F)
}

#[allow(clippy::arithmetic_side_effects)] // u8 shift by 4 cannot overflow
fn unpack(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}
