//! WAV producer, fixed-rate consumer and the `play` driver that joins them.
//!
//! ```text
//!  SD card ──read──> produce() ──write──> AudioRingBuffer (per channel)
//!                                              │
//!                          Ticker @ frame rate │ read
//!                                              v
//!                                        consume() ──> AudioOutput
//! ```
//!
//! The producer never drops samples itself: while a ring is full it yields
//! until the consumer drains it. Loss only happens through the ring's own
//! drop-oldest rule.

use core::future::Future;

use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_futures::yield_now;
use embassy_time::{Duration, Ticker};
use platform::config::AUDIO_READ_CHUNK;
use platform::{AudioOutput, File, SampleRateHz};

use crate::engine::{PlaybackEngine, PlaybackState};
use crate::ring_buffer::AudioRingBuffer;
use crate::wav::WavHeader;
use crate::PlaybackError;

/// One ring per channel; mono uses only the first.
pub struct ChannelRings<const N: usize> {
    rings: [AudioRingBuffer<N>; 2],
}

impl<const N: usize> ChannelRings<N> {
    pub const fn new() -> Self {
        Self {
            rings: [AudioRingBuffer::new(), AudioRingBuffer::new()],
        }
    }

    pub fn channel(&self, index: usize) -> Option<&AudioRingBuffer<N>> {
        self.rings.get(index)
    }

    pub fn clear(&self) {
        for ring in &self.rings {
            ring.clear();
        }
    }

    /// Samples evicted across both rings.
    pub fn evicted(&self) -> usize {
        self.rings
            .iter()
            .fold(0usize, |acc, r| acc.saturating_add(r.evicted()))
    }
}

impl<const N: usize> Default for ChannelRings<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// How a [`play`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackOutcome {
    /// The data chunk was played out; `frames` reached the output
    Finished { frames: u32 },
    /// Stopped by the cancel future or [`PlaybackEngine::stop`]
    Cancelled,
}

/// Stream the data chunk of `file` into `rings`, de-interleaving channels.
///
/// `file` must be positioned at the first sample byte. Returns the number of
/// frames produced; returns early once `engine` is stopped.
///
/// # Errors
///
/// [`PlaybackError::Read`] if the file read fails.
pub async fn produce<F: File, const N: usize>(
    file: &mut F,
    header: &WavHeader,
    rings: &ChannelRings<N>,
    engine: &PlaybackEngine,
) -> Result<u32, PlaybackError> {
    let frame_len = header.frame_len();
    let mut buf = [0u8; AUDIO_READ_CHUNK];
    let mut held = 0usize;
    let mut remaining = usize::try_from(header.data_len).unwrap_or(usize::MAX);
    let mut frames = 0u32;

    while remaining > 0 && !engine.is_stopped() {
        let want = buf.len().saturating_sub(held).min(remaining);
        let end = held.saturating_add(want);
        let dst = buf.get_mut(held..end).ok_or(PlaybackError::Read)?;
        let n = file.read(dst).await.map_err(|_| PlaybackError::Read)?;
        if n == 0 {
            break;
        }
        remaining = remaining.saturating_sub(n);
        held = held.saturating_add(n);

        let whole = held
            .checked_div(frame_len)
            .unwrap_or(0)
            .saturating_mul(frame_len);
        for frame in buf.get(..whole).unwrap_or(&[]).chunks_exact(frame_len) {
            for (ch, pair) in frame.chunks_exact(2).enumerate() {
                let Some(ring) = rings.channel(ch) else {
                    continue;
                };
                let sample = i16::from_le_bytes([
                    pair.first().copied().unwrap_or(0),
                    pair.get(1).copied().unwrap_or(0),
                ]);
                while ring.is_full() {
                    if engine.is_stopped() {
                        return Ok(frames);
                    }
                    yield_now().await;
                }
                ring.write(sample);
            }
            frames = frames.saturating_add(1);
        }
        buf.copy_within(whole..held, 0);
        held = held.saturating_sub(whole);
    }

    engine.mark_eof();
    Ok(frames)
}

/// Fixed-rate consumer: each tick pops one sample per active channel and
/// writes one of them, alternating channels when stereo.
///
/// Holds position while paused. Returns the frames output once the producer
/// has finished and the rings are drained, or when `engine` is stopped.
pub async fn consume<O: AudioOutput, const N: usize>(
    out: &mut O,
    channels: u16,
    rate: SampleRateHz,
    rings: &ChannelRings<N>,
    engine: &PlaybackEngine,
) -> u32 {
    let stereo = channels > 1;
    let (Some(left), Some(right)) = (rings.channel(0), rings.channel(1)) else {
        return 0;
    };
    let mut ticker = Ticker::every(Duration::from_hz(u64::from(rate.get())));
    let mut right_turn = false;
    let mut frames = 0u32;

    loop {
        ticker.next().await;
        match engine.state() {
            PlaybackState::Stopped => return frames,
            PlaybackState::Paused => continue,
            PlaybackState::Playing => {}
        }
        let Some(l) = left.read() else {
            if engine.is_eof() {
                return frames;
            }
            // Underrun: the producer is behind; hold the line.
            continue;
        };
        let sample = if stereo {
            let r = right.read().unwrap_or(l);
            let pick = if right_turn { r } else { l };
            right_turn = !right_turn;
            pick
        } else {
            l
        };
        out.write_sample(sample);
        frames = frames.saturating_add(1);
        engine.advance(1);
    }
}

/// Play a WAV file from its first byte until it ends or `cancel` completes.
///
/// Parses the header, arms `out` at the derived frame rate, runs
/// [`produce`] and [`consume`] together and always leaves `out` stopped,
/// `engine` stopped and `rings` empty.
///
/// # Errors
///
/// Header or read failures; [`PlaybackError::AlreadyPlaying`] if `engine` is
/// not stopped on entry.
pub async fn play<F, O, C, const N: usize>(
    file: &mut F,
    out: &mut O,
    rings: &ChannelRings<N>,
    engine: &PlaybackEngine,
    cancel: C,
) -> Result<PlaybackOutcome, PlaybackError>
where
    F: File,
    O: AudioOutput,
    C: Future,
{
    let mut head = [0u8; WavHeader::SIZE];
    read_exact(file, &mut head).await?;
    let header = WavHeader::parse(&head)?;
    let rate = header.tick_rate()?;

    rings.clear();
    engine.begin(header.total_frames(), rate.get())?;
    out.start(rate.get());

    let producer = async {
        let produced = produce(file, &header, rings, engine).await;
        if produced.is_err() {
            engine.stop();
        }
        produced
    };
    let consumer = consume(out, header.channels, rate, rings, engine);

    let result = match select(join(producer, consumer), cancel).await {
        Either::First((Err(e), _)) => Err(e),
        Either::First((Ok(_), frames)) if engine.is_eof() => {
            Ok(PlaybackOutcome::Finished { frames })
        }
        Either::First(_) | Either::Second(_) => Ok(PlaybackOutcome::Cancelled),
    };

    out.stop();
    engine.stop();
    rings.clear();
    result
}

async fn read_exact<F: File>(file: &mut F, buf: &mut [u8]) -> Result<(), PlaybackError> {
    let mut filled = 0usize;
    while filled < buf.len() {
        let dst = buf.get_mut(filled..).ok_or(PlaybackError::Read)?;
        let n = file.read(dst).await.map_err(|_| PlaybackError::Read)?;
        if n == 0 {
            return Err(crate::WavError::Truncated.into());
        }
        filled = filled.saturating_add(n);
    }
    Ok(())
}
