//! Playback state machine.
//!
//! `PlaybackEngine` tracks whether the player is stopped, playing or paused,
//! plus the sample-frame position of the active track. It has no I/O: the
//! producer, the consumer tick and the MusicList display all share one
//! `&PlaybackEngine`, so every field is an atomic.
//!
//! Transitions:
//!
//! ```text
//! Stopped --begin--> Playing --pause--> Paused --resume--> Playing
//!    ^                  |                  |
//!    +------stop--------+-------stop-------+
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::PlaybackError;

/// Current playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PlaybackState {
    /// No track, or playback was stopped
    Stopped = 0,
    /// Samples are being produced and consumed
    Playing = 1,
    /// The consumer holds its position and outputs nothing
    Paused = 2,
}

impl PlaybackState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Playing,
            2 => Self::Paused,
            _ => Self::Stopped,
        }
    }
}

/// Snapshot for the progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Progress {
    pub state: PlaybackState,
    pub position_secs: u32,
    pub duration_secs: u32,
    /// 0..=100
    pub percent: u8,
}

/// Shared playback state machine.
pub struct PlaybackEngine {
    state: AtomicU8,
    frames_played: AtomicU32,
    total_frames: AtomicU32,
    frame_rate: AtomicU32,
    /// Set by the producer once the data chunk is exhausted
    eof: AtomicBool,
}

impl PlaybackEngine {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(PlaybackState::Stopped as u8),
            frames_played: AtomicU32::new(0),
            total_frames: AtomicU32::new(0),
            frame_rate: AtomicU32::new(0),
            eof: AtomicBool::new(false),
        }
    }

    /// Start a track of `total_frames` at `frame_rate` frames per second.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::AlreadyPlaying`] unless stopped.
    pub fn begin(&self, total_frames: u32, frame_rate: u32) -> Result<(), PlaybackError> {
        if self.state() != PlaybackState::Stopped {
            return Err(PlaybackError::AlreadyPlaying);
        }
        self.frames_played.store(0, Ordering::Relaxed);
        self.total_frames.store(total_frames, Ordering::Relaxed);
        self.frame_rate.store(frame_rate, Ordering::Relaxed);
        self.eof.store(false, Ordering::Relaxed);
        self.state
            .store(PlaybackState::Playing as u8, Ordering::Release);
        Ok(())
    }

    /// `Playing → Paused`; pausing while paused is a no-op.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotPlaying`] when stopped.
    pub fn pause(&self) -> Result<(), PlaybackError> {
        match self.state() {
            PlaybackState::Stopped => Err(PlaybackError::NotPlaying),
            PlaybackState::Playing | PlaybackState::Paused => {
                self.state
                    .store(PlaybackState::Paused as u8, Ordering::Release);
                Ok(())
            }
        }
    }

    /// `Paused → Playing`.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotPlaying`] when stopped,
    /// [`PlaybackError::AlreadyPlaying`] when playing.
    pub fn resume(&self) -> Result<(), PlaybackError> {
        match self.state() {
            PlaybackState::Stopped => Err(PlaybackError::NotPlaying),
            PlaybackState::Playing => Err(PlaybackError::AlreadyPlaying),
            PlaybackState::Paused => {
                self.state
                    .store(PlaybackState::Playing as u8, Ordering::Release);
                Ok(())
            }
        }
    }

    /// Pause when playing, resume when paused.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotPlaying`] when stopped.
    pub fn toggle_pause(&self) -> Result<(), PlaybackError> {
        match self.state() {
            PlaybackState::Playing => self.pause(),
            _ => self.resume(),
        }
    }

    /// Stop and rewind. Always succeeds; the producer and consumer both
    /// observe it and return.
    pub fn stop(&self) {
        self.state
            .store(PlaybackState::Stopped as u8, Ordering::Release);
        self.frames_played.store(0, Ordering::Relaxed);
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == PlaybackState::Stopped
    }

    /// Count `frames` as output.
    pub fn advance(&self, frames: u32) {
        // fetch_update never fails with a closure that always returns Some
        let _ = self
            .frames_played
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |f| {
                Some(f.saturating_add(frames))
            });
    }

    pub fn position_frames(&self) -> u32 {
        self.frames_played.load(Ordering::Relaxed)
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames.load(Ordering::Relaxed)
    }

    pub fn mark_eof(&self) {
        self.eof.store(true, Ordering::Release);
    }

    pub fn is_eof(&self) -> bool {
        self.eof.load(Ordering::Acquire)
    }

    /// Position, duration and percentage for display.
    pub fn progress(&self) -> Progress {
        let rate = self.frame_rate.load(Ordering::Relaxed);
        let played = self.position_frames();
        let total = self.total_frames();
        let percent = u64::from(played)
            .saturating_mul(100)
            .checked_div(u64::from(total))
            .unwrap_or(0)
            .min(100);
        Progress {
            state: self.state(),
            position_secs: played.checked_div(rate).unwrap_or(0),
            duration_secs: total.checked_div(rate).unwrap_or(0),
            percent: u8::try_from(percent).unwrap_or(100),
        }
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_starts_stopped() {
        let engine = PlaybackEngine::new();
        assert_eq!(engine.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_begin_transitions_to_playing() {
        let engine = PlaybackEngine::new();
        engine.begin(8_000, 8_000).unwrap();
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.begin(1, 8_000), Err(PlaybackError::AlreadyPlaying));
    }

    #[test]
    fn test_pause_and_resume() {
        let engine = PlaybackEngine::new();
        engine.begin(100, 8_000).unwrap();
        engine.pause().unwrap();
        assert_eq!(engine.state(), PlaybackState::Paused);
        engine.pause().unwrap();
        engine.resume().unwrap();
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.resume(), Err(PlaybackError::AlreadyPlaying));
    }

    #[test]
    fn test_cannot_pause_when_stopped() {
        let engine = PlaybackEngine::new();
        assert_eq!(engine.pause(), Err(PlaybackError::NotPlaying));
        assert_eq!(engine.toggle_pause(), Err(PlaybackError::NotPlaying));
    }

    #[test]
    fn test_stop_rewinds() {
        let engine = PlaybackEngine::new();
        engine.begin(100, 8_000).unwrap();
        engine.advance(40);
        engine.stop();
        assert!(engine.is_stopped());
        assert_eq!(engine.position_frames(), 0);
    }

    #[test]
    fn test_progress() {
        let engine = PlaybackEngine::new();
        engine.begin(80_000, 8_000).unwrap();
        engine.advance(20_000);
        let p = engine.progress();
        assert_eq!(p.position_secs, 2);
        assert_eq!(p.duration_secs, 10);
        assert_eq!(p.percent, 25);
    }

    #[test]
    fn test_progress_with_empty_track() {
        let engine = PlaybackEngine::new();
        engine.begin(0, 8_000).unwrap();
        assert_eq!(engine.progress().percent, 0);
    }
}
