//! Audio playback — WAV header parsing, SPSC sample rings, the file producer,
//! the fixed-rate consumer and the playback state machine.
//!
//! # Modules
//!
//! - [`ring_buffer`] — `AudioRingBuffer<N>`, lock-free, drop-oldest on overflow
//! - [`wav`] — canonical 16-bit PCM header
//! - [`engine`] — `PlaybackEngine`: Stopped / Playing / Paused plus position
//! - [`pipeline`] — `produce`, `consume` and the `play` driver

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(missing_docs)]

pub mod engine;
pub mod pipeline;
pub mod ring_buffer;
pub mod wav;

pub use engine::{PlaybackEngine, PlaybackState, Progress};
pub use pipeline::{consume, play, produce, ChannelRings, PlaybackOutcome};
pub use ring_buffer::AudioRingBuffer;
pub use wav::{WavError, WavHeader};

/// Errors returned by playback operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackError {
    /// The operation needs a track that is playing or paused
    #[error("nothing is playing")]
    NotPlaying,
    /// A track is already playing
    #[error("already playing")]
    AlreadyPlaying,
    /// The file is not a playable WAV
    #[error("{0}")]
    Wav(WavError),
    /// The card read failed
    #[error("card read failed")]
    Read,
}

impl From<WavError> for PlaybackError {
    fn from(e: WavError) -> Self {
        Self::Wav(e)
    }
}
