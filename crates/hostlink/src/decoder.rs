//! Incremental receive-side decoder.
//!
//! Bytes arrive one at a time from the serial link and are either part of a
//! binary frame (starting with [`SYNC`]) or part of a plain-text time-set line
//! terminated by `\r` or `\n`. Anything that fails to decode is dropped and
//! counted; nothing is retried.

use crate::frame::{self, FrameError, Message, MAX_FRAME, MAX_PAYLOAD, OVERHEAD, SYNC};
use crate::time_set::{self, TIME_SET_TEXT_LEN};

/// Running error counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Messages delivered
    pub messages: u32,
    /// Frames discarded for a CRC mismatch
    pub crc_errors: u32,
    /// Oversized frames, bad payloads and malformed text lines
    pub framing_errors: u32,
}

enum State {
    Idle,
    Frame,
    Text,
    /// Overlong text line; skip to the next terminator
    Discard,
}

/// Byte-at-a-time frame and text-line decoder.
pub struct StreamDecoder {
    state: State,
    frame: heapless::Vec<u8, MAX_FRAME>,
    line: heapless::Vec<u8, TIME_SET_TEXT_LEN>,
    stats: DecoderStats,
}

impl StreamDecoder {
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            frame: heapless::Vec::new(),
            line: heapless::Vec::new(),
            stats: DecoderStats {
                messages: 0,
                crc_errors: 0,
                framing_errors: 0,
            },
        }
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Feed one byte; returns a message when it completes one.
    pub fn push(&mut self, byte: u8) -> Option<Message> {
        if byte == SYNC {
            if matches!(self.state, State::Text) && !self.line.is_empty() {
                self.framing_error();
            }
            if matches!(self.state, State::Frame) {
                // Sync inside a frame is ordinary payload data.
                return self.push_frame(byte);
            }
            self.line.clear();
            self.frame.clear();
            self.state = State::Frame;
            return self.push_frame(byte);
        }
        match self.state {
            State::Frame => self.push_frame(byte),
            State::Idle | State::Text => self.push_text(byte),
            State::Discard => {
                if is_terminator(byte) {
                    self.state = State::Idle;
                }
                None
            }
        }
    }

    /// Feed a slice; returns the last complete message, counting the rest.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Option<Message> {
        bytes.iter().fold(None, |last, &b| self.push(b).or(last))
    }

    fn push_frame(&mut self, byte: u8) -> Option<Message> {
        if self.frame.push(byte).is_err() {
            self.reset_frame();
            self.framing_error();
            return None;
        }
        // [sync, type, len, ..payload, crc]
        let len = usize::from(*self.frame.get(2)?);
        if len > MAX_PAYLOAD {
            self.reset_frame();
            self.framing_error();
            return None;
        }
        if self.frame.len() < len.saturating_add(OVERHEAD) {
            return None;
        }

        let result = frame::verify_frame(&self.frame).and_then(|f| f.message());
        self.reset_frame();
        match result {
            Ok(message) => {
                self.stats.messages = self.stats.messages.saturating_add(1);
                Some(message)
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("hostlink: dropped frame: {}", err);
                if matches!(err, FrameError::CrcMismatch { .. }) {
                    self.stats.crc_errors = self.stats.crc_errors.saturating_add(1);
                } else {
                    self.framing_error();
                }
                None
            }
        }
    }

    fn push_text(&mut self, byte: u8) -> Option<Message> {
        if is_terminator(byte) {
            self.state = State::Idle;
            if self.line.is_empty() {
                return None;
            }
            let parsed = time_set::parse(&self.line);
            self.line.clear();
            return match parsed {
                Ok(time) => {
                    self.stats.messages = self.stats.messages.saturating_add(1);
                    Some(Message::TimeSet(time))
                }
                Err(_) => {
                    self.framing_error();
                    None
                }
            };
        }
        self.state = State::Text;
        if self.line.push(byte).is_err() {
            self.line.clear();
            self.state = State::Discard;
            self.framing_error();
        }
        None
    }

    fn reset_frame(&mut self) {
        self.frame.clear();
        self.state = State::Idle;
    }

    fn framing_error(&mut self) {
        self.stats.framing_errors = self.stats.framing_errors.saturating_add(1);
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use platform::DateTime;

    use super::*;
    use crate::frame::{create_frame, meter_frame, MessageType};

    #[test]
    fn test_decodes_meter_frame() {
        let mut dec = StreamDecoder::new();
        let frame = meter_frame(MessageType::Volts, 4.75).unwrap();
        assert_eq!(dec.push_slice(&frame), Some(Message::Volts(4.75)));
        assert_eq!(dec.stats().messages, 1);
    }

    #[test]
    fn test_sync_byte_inside_payload() {
        let mut dec = StreamDecoder::new();
        let frame = create_frame(0xF7, &[SYNC, SYNC, 1]).unwrap();
        assert_eq!(dec.push_slice(&frame), Some(Message::Reserved(0xF7)));
    }

    #[test]
    fn test_crc_error_is_counted_and_dropped() {
        let mut dec = StreamDecoder::new();
        let mut frame = meter_frame(MessageType::Ohms, 220.0).unwrap();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        assert_eq!(dec.push_slice(&frame), None);
        assert_eq!(dec.stats().crc_errors, 1);

        // The decoder resynchronises on the next frame.
        let good = meter_frame(MessageType::Ohms, 220.0).unwrap();
        assert_eq!(dec.push_slice(&good), Some(Message::Ohms(220.0)));
    }

    #[test]
    fn test_text_time_set_line() {
        let mut dec = StreamDecoder::new();
        let msg = dec.push_slice(b"07:14:2031:09:26:53\r");
        let expected = DateTime::new(2031, 7, 14, 9, 26, 53).unwrap();
        assert_eq!(msg, Some(Message::TimeSet(expected)));
    }

    #[test]
    fn test_bad_text_line_counts_framing_error() {
        let mut dec = StreamDecoder::new();
        assert_eq!(dec.push_slice(b"hello\r"), None);
        assert_eq!(dec.stats().framing_errors, 1);
        // Bare terminators are not errors.
        assert_eq!(dec.push_slice(b"\r\n\r\n"), None);
        assert_eq!(dec.stats().framing_errors, 1);
    }

    #[test]
    fn test_overlong_line_is_skipped() {
        let mut dec = StreamDecoder::new();
        assert_eq!(dec.push_slice(b"0123456789012345678901234567890\r"), None);
        assert_eq!(dec.stats().framing_errors, 1);
        let msg = dec.push_slice(b"01:01:2030:00:00:00\n");
        assert!(matches!(msg, Some(Message::TimeSet(_))));
    }

    #[test]
    fn test_oversized_length_byte() {
        let mut dec = StreamDecoder::new();
        assert_eq!(dec.push_slice(&[SYNC, 0xF1, 0xFF]), None);
        assert_eq!(dec.stats().framing_errors, 1);
    }

    #[test]
    fn test_frame_interrupts_text() {
        let mut dec = StreamDecoder::new();
        dec.push_slice(b"07:14");
        let frame = meter_frame(MessageType::Volts, 1.0).unwrap();
        assert_eq!(dec.push_slice(&frame), Some(Message::Volts(1.0)));
        assert_eq!(dec.stats().framing_errors, 1);
    }
}
