//! Canonical WAV header parsing.
//!
//! Only the 44-byte canonical layout is understood: a `RIFF`/`WAVE` file
//! whose `fmt ` chunk comes first and whose `data` chunk follows it directly.
//!
//! ```text
//! [0..4]   "RIFF"
//! [4..8]   riff size        u32 le
//! [8..12]  "WAVE"
//! [12..16] "fmt "
//! [16..20] fmt size         u32 le  (16)
//! [20..22] audio format     u16 le  (1 = PCM)
//! [22..24] channels         u16 le
//! [24..28] sample rate      u32 le
//! [28..32] byte rate        u32 le
//! [32..34] block align      u16 le
//! [34..36] bits per sample  u16 le  (16)
//! [36..40] "data"
//! [40..44] data size        u32 le
//! ```
//!
//! Chunk ids other than the two magics are not checked.

use platform::{OutOfRangeError, SampleRateHz};

/// WAV header parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WavError {
    /// Fewer than 44 header bytes
    #[error("WAV header truncated")]
    Truncated,
    /// Missing `RIFF` or `WAVE`
    #[error("not a RIFF/WAVE file")]
    BadMagic,
    /// Anything but 16-bit mono or stereo
    #[error("unsupported WAV: {channels} ch, {bits} bit")]
    Unsupported { channels: u16, bits: u16 },
    /// Playback rate outside what the output can tick at
    #[error("playback rate {0} Hz out of range")]
    BadRate(u32),
}

impl From<OutOfRangeError> for WavError {
    fn from(e: OutOfRangeError) -> Self {
        Self::BadRate(e.value)
    }
}

/// Parsed canonical header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub bits_per_sample: u16,
    /// Bytes of sample data after the header
    pub data_len: u32,
}

impl WavHeader {
    pub const SIZE: usize = 44;

    /// Parse the first [`WavHeader::SIZE`] bytes of a file.
    ///
    /// # Errors
    ///
    /// See [`WavError`].
    ///
    /// # Safety (lint allow)
    /// All range indices are compile-time constants within `[0, SIZE)` and the
    /// length is checked first.
    #[allow(clippy::indexing_slicing)]
    #[allow(clippy::arithmetic_side_effects)] // field offsets are constants below SIZE - 3
    pub fn parse(bytes: &[u8]) -> Result<Self, WavError> {
        let buf: &[u8; Self::SIZE] = bytes
            .get(..Self::SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(WavError::Truncated)?;
        if &buf[0..4] != b"RIFF" || &buf[8..12] != b"WAVE" {
            return Err(WavError::BadMagic);
        }
        let u16_at = |at: usize| u16::from_le_bytes([buf[at], buf[at + 1]]);
        let u32_at =
            |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);

        let header = Self {
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            bits_per_sample: u16_at(34),
            data_len: u32_at(40),
        };
        if !(1..=2).contains(&header.channels) || header.bits_per_sample != 16 {
            return Err(WavError::Unsupported {
                channels: header.channels,
                bits: header.bits_per_sample,
            });
        }
        header.tick_rate()?;
        Ok(header)
    }

    /// Consumer tick rate: one tick per sample frame, derived from the byte
    /// rate as `byte_rate / (2 * channels)`.
    ///
    /// # Errors
    ///
    /// [`WavError::BadRate`] outside the range [`SampleRateHz`] accepts.
    pub fn tick_rate(&self) -> Result<SampleRateHz, WavError> {
        let divisor = u32::from(self.channels).saturating_mul(2);
        let hz = self.byte_rate.checked_div(divisor).unwrap_or(0);
        Ok(SampleRateHz::new(hz)?)
    }

    /// Bytes per interleaved sample frame.
    pub fn frame_len(&self) -> usize {
        usize::from(self.channels).saturating_mul(2)
    }

    /// Sample frames in the data chunk.
    pub fn total_frames(&self) -> u32 {
        let frame = u32::from(self.channels).saturating_mul(2);
        self.data_len.checked_div(frame).unwrap_or(0)
    }

    /// Build a canonical 16-bit PCM header.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // constant ranges within [0, SIZE)
    pub fn encode(channels: u16, sample_rate: u32, data_len: u32) -> [u8; Self::SIZE] {
        let block_align = channels.saturating_mul(2);
        let byte_rate = sample_rate.saturating_mul(u32::from(block_align));
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(b"RIFF");
        buf[4..8].copy_from_slice(&data_len.saturating_add(36).to_le_bytes());
        buf[8..12].copy_from_slice(b"WAVE");
        buf[12..16].copy_from_slice(b"fmt ");
        buf[16..20].copy_from_slice(&16u32.to_le_bytes());
        buf[20..22].copy_from_slice(&1u16.to_le_bytes());
        buf[22..24].copy_from_slice(&channels.to_le_bytes());
        buf[24..28].copy_from_slice(&sample_rate.to_le_bytes());
        buf[28..32].copy_from_slice(&byte_rate.to_le_bytes());
        buf[32..34].copy_from_slice(&block_align.to_le_bytes());
        buf[34..36].copy_from_slice(&16u16.to_le_bytes());
        buf[36..40].copy_from_slice(b"data");
        buf[40..44].copy_from_slice(&data_len.to_le_bytes());
        buf
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stereo_cd() {
        let h = WavHeader::parse(&WavHeader::encode(2, 44_100, 176_400)).unwrap();
        assert_eq!(h.channels, 2);
        assert_eq!(h.byte_rate, 176_400);
        assert_eq!(h.tick_rate().unwrap().get(), 44_100);
        assert_eq!(h.total_frames(), 44_100);
    }

    #[test]
    fn test_parse_mono() {
        let h = WavHeader::parse(&WavHeader::encode(1, 8_000, 1_000)).unwrap();
        assert_eq!(h.tick_rate().unwrap().get(), 8_000);
        assert_eq!(h.frame_len(), 2);
        assert_eq!(h.total_frames(), 500);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = WavHeader::encode(1, 8_000, 0);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert_eq!(WavHeader::parse(&bytes), Err(WavError::BadMagic));
    }

    #[test]
    fn test_truncated() {
        let bytes = WavHeader::encode(1, 8_000, 0);
        assert_eq!(WavHeader::parse(&bytes[..43]), Err(WavError::Truncated));
    }

    #[test]
    fn test_rejects_8_bit_and_surround() {
        let mut bytes = WavHeader::encode(1, 8_000, 0);
        bytes[34] = 8;
        assert!(matches!(
            WavHeader::parse(&bytes),
            Err(WavError::Unsupported { bits: 8, .. })
        ));
        let six = WavHeader::encode(6, 8_000, 0);
        assert!(matches!(
            WavHeader::parse(&six),
            Err(WavError::Unsupported { channels: 6, .. })
        ));
    }

    #[test]
    fn test_rejects_unplayable_rate() {
        let bytes = WavHeader::encode(2, 96_000, 0);
        assert_eq!(WavHeader::parse(&bytes), Err(WavError::BadRate(96_000)));
    }
}
