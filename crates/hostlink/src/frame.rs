//! Binary frame codec.
//!
//! ```text
//! [0]       0xF0 sync
//! [1]       message type
//! [2]       payload length N
//! [3..3+N]  payload
//! [3+N]     CRC-8 over type, length and payload
//! ```
//!
//! Meter reports carry one little-endian `f64`. Time-set frames carry the
//! same 19 ASCII characters as the plain-text message, without the `\r`.

use platform::DateTime;

use crate::crc;
use crate::time_set::{self, TIME_SET_LEN};

/// First byte of every frame.
pub const SYNC: u8 = 0xF0;
/// Longest payload a frame may carry.
pub const MAX_PAYLOAD: usize = 32;
/// Sync, type, length and CRC.
pub const OVERHEAD: usize = 4;
/// Longest encoded frame.
pub const MAX_FRAME: usize = MAX_PAYLOAD + OVERHEAD;

/// An encoded frame.
pub type Frame = heapless::Vec<u8, MAX_FRAME>;

/// Known message types; anything else is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageType {
    /// Volt meter reading
    Volts = 0xF1,
    /// Ohm meter reading
    Ohms = 0xF2,
    /// Set the real-time clock
    TimeSet = 0xF3,
}

impl MessageType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0xF1 => Some(Self::Volts),
            0xF2 => Some(Self::Ohms),
            0xF3 => Some(Self::TimeSet),
            _ => None,
        }
    }
}

/// Frame encode/decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload longer than [`MAX_PAYLOAD`]
    #[error("payload of {0} bytes exceeds the frame limit")]
    PayloadTooLong(usize),
    /// Fewer bytes than the header promises
    #[error("frame truncated")]
    TooShort,
    /// First byte is not [`SYNC`]
    #[error("missing sync byte")]
    BadSync,
    /// Trailing CRC does not match the recomputed one
    #[error("crc mismatch: computed {computed:#04x}, received {received:#04x}")]
    CrcMismatch { computed: u8, received: u8 },
    /// CRC is good but the payload does not fit the message type
    #[error("malformed payload for type {0:#04x}")]
    BadPayload(u8),
}

/// A verified frame, borrowing its payload from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub msg_type: u8,
    pub payload: &'a [u8],
}

/// Decoded message.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Volt meter reading
    Volts(f64),
    /// Ohm meter reading
    Ohms(f64),
    /// Set the real-time clock
    TimeSet(DateTime),
    /// Valid frame of a reserved type
    Reserved(u8),
}

/// Encode a frame.
///
/// # Errors
///
/// [`FrameError::PayloadTooLong`] above [`MAX_PAYLOAD`] bytes.
#[allow(clippy::cast_possible_truncation)] // len <= MAX_PAYLOAD checked first
pub fn create_frame(msg_type: u8, payload: &[u8]) -> Result<Frame, FrameError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLong(payload.len()));
    }
    let len = payload.len() as u8;
    let mut frame = Frame::new();
    // Capacity is MAX_FRAME, so none of these pushes can fail.
    frame
        .extend_from_slice(&[SYNC, msg_type, len])
        .map_err(|_| FrameError::PayloadTooLong(payload.len()))?;
    frame
        .extend_from_slice(payload)
        .map_err(|_| FrameError::PayloadTooLong(payload.len()))?;
    let crc = crc::update(crc::crc8(&[msg_type, len]), payload);
    frame
        .push(crc)
        .map_err(|_| FrameError::PayloadTooLong(payload.len()))?;
    Ok(frame)
}

/// Check sync, length and CRC of one complete frame.
///
/// Bytes after the frame are ignored.
///
/// # Errors
///
/// [`FrameError::TooShort`], [`FrameError::BadSync`] or
/// [`FrameError::CrcMismatch`].
pub fn verify_frame(bytes: &[u8]) -> Result<FrameRef<'_>, FrameError> {
    let (&sync, rest) = bytes.split_first().ok_or(FrameError::TooShort)?;
    if sync != SYNC {
        return Err(FrameError::BadSync);
    }
    let (&msg_type, rest) = rest.split_first().ok_or(FrameError::TooShort)?;
    let (&len_byte, rest) = rest.split_first().ok_or(FrameError::TooShort)?;
    let len = usize::from(len_byte);
    let payload = rest.get(..len).ok_or(FrameError::TooShort)?;
    let received = rest.get(len).copied().ok_or(FrameError::TooShort)?;
    let computed = crc::update(crc::crc8(&[msg_type, len_byte]), payload);
    if computed != received {
        return Err(FrameError::CrcMismatch { computed, received });
    }
    Ok(FrameRef { msg_type, payload })
}

impl FrameRef<'_> {
    /// Interpret the payload according to the message type.
    ///
    /// # Errors
    ///
    /// [`FrameError::BadPayload`] if the payload does not fit the type.
    pub fn message(&self) -> Result<Message, FrameError> {
        let bad = FrameError::BadPayload(self.msg_type);
        match MessageType::from_u8(self.msg_type) {
            Some(MessageType::Volts) => Ok(Message::Volts(read_f64(self.payload).ok_or(bad)?)),
            Some(MessageType::Ohms) => Ok(Message::Ohms(read_f64(self.payload).ok_or(bad)?)),
            Some(MessageType::TimeSet) => time_set::parse(self.payload)
                .map(Message::TimeSet)
                .map_err(|_| bad),
            None => Ok(Message::Reserved(self.msg_type)),
        }
    }
}

fn read_f64(payload: &[u8]) -> Option<f64> {
    let bytes: [u8; 8] = payload.try_into().ok()?;
    Some(f64::from_le_bytes(bytes))
}

/// Meter report frame for a volt or ohm reading.
///
/// # Errors
///
/// Never fails in practice; the payload is 8 bytes.
pub fn meter_frame(kind: MessageType, value: f64) -> Result<Frame, FrameError> {
    create_frame(kind as u8, &value.to_le_bytes())
}

/// Time-set frame.
///
/// # Errors
///
/// Never fails in practice; the payload is 19 bytes.
pub fn time_set_frame(time: &DateTime) -> Result<Frame, FrameError> {
    let text = time_set::format(time);
    let body = text.as_bytes().get(..TIME_SET_LEN).unwrap_or(&[]);
    create_frame(MessageType::TimeSet as u8, body)
}
