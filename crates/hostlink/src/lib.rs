//! Host serial link: CRC-8 framed meter reports and clock-set requests.
//!
//! ```text
//! 0xF0 | type | len | payload[len] | crc8(type, len, payload)
//! ```
//!
//! Clock-set requests may also arrive as a plain-text line
//! `"MM:DD:YYYY:HH:MM:SS\r"`. Frames with a bad CRC are dropped and counted,
//! never retried.
//!
//! This crate is `no_std` by default; it only uses `core` + `heapless`.

#![cfg_attr(not(test), no_std)]
#![allow(missing_docs)]

pub mod crc;
pub mod decoder;
pub mod frame;
pub mod link;
pub mod time_set;

pub use crc::crc8;
pub use decoder::{DecoderStats, StreamDecoder};
pub use frame::{
    create_frame, meter_frame, time_set_frame, verify_frame, Frame, FrameError, FrameRef,
    Message, MessageType,
};
pub use link::{send, send_reading, send_time_set, LinkError, Receiver};
pub use time_set::TimeSetError;
