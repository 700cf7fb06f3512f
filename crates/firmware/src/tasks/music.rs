//! WAV player and the MusicList progress line.

use embassy_time::Duration;
use modes::Periodic;
use platform::config::MUSIC_PROGRESS_MS;
use platform::{AudioOutput, Display, Storage};
use playback::{PlaybackError, PlaybackOutcome, PlaybackState, Progress};

use crate::app::screen::{self, format_line, right_aligned, Line};
use crate::fmt::{info, warn};
use crate::kernel::{run_periodic, Kernel, PeriodicJob, Shared, PLAYER_BUSY, STOP_PLAYBACK};
use crate::notice::Notice;

/// `m:ss/m:ss nn%`, or the state when nothing is moving.
pub fn progress_line(progress: &Progress) -> Line {
    let Progress {
        state,
        position_secs: pos,
        duration_secs: total,
        percent,
    } = *progress;
    let (pm, ps) = (pos.checked_div(60).unwrap_or(0), pos.checked_rem(60).unwrap_or(0));
    let (tm, ts) = (total.checked_div(60).unwrap_or(0), total.checked_rem(60).unwrap_or(0));
    let line = match state {
        PlaybackState::Stopped => format_line(format_args!("Stopped")),
        PlaybackState::Paused => format_line(format_args!("Paused {pm}:{ps:02}")),
        PlaybackState::Playing => {
            format_line(format_args!("{pm}:{ps:02}/{tm}:{ts:02} {percent}%"))
        }
    };
    right_aligned(&line)
}

pub struct ProgressJob<'a, D> {
    kernel: &'a Kernel,
    display: &'a Shared<D>,
}

impl<'a, D> ProgressJob<'a, D> {
    pub fn new(kernel: &'a Kernel, display: &'a Shared<D>) -> Self {
        Self { kernel, display }
    }
}

impl<D: Display> PeriodicJob for ProgressJob<'_, D> {
    async fn tick(&mut self) {
        if !self.kernel.is_player_busy() {
            return;
        }
        let line = progress_line(&self.kernel.playback.progress());
        screen::show_line(self.display, 1, &line).await;
    }
}

/// Progress line while MusicList is current.
pub async fn progress_task<D: Display>(kernel: &Kernel, display: &Shared<D>) -> ! {
    let mut job = ProgressJob::new(kernel, display);
    run_periodic(
        kernel.periodic(Periodic::MusicProgress),
        Duration::from_millis(MUSIC_PROGRESS_MS),
        &mut job,
    )
    .await
}

/// Play each requested track to its end or until stopped.
///
/// [`PLAYER_BUSY`] is held for the whole track; the card is locked only to
/// open the file.
pub async fn player_task<S: Storage, O: AudioOutput>(
    kernel: &Kernel,
    card: &Shared<S>,
    out: &mut O,
) -> ! {
    loop {
        let name = kernel.play_requests.wait().await;
        kernel.signals.set(PLAYER_BUSY);
        match play_track(kernel, card, out, &name).await {
            Ok(PlaybackOutcome::Finished { frames }) => {
                info!("{} finished after {} frames", name.as_str(), frames);
                kernel.notify(Notice::TrackFinished);
            }
            Ok(PlaybackOutcome::Cancelled) => info!("{} stopped", name.as_str()),
            Err(e) => {
                warn!("cannot play {}: {}", name.as_str(), e);
                kernel.notify(Notice::TrackFailed);
            }
        }
        kernel.signals.clear(PLAYER_BUSY);
    }
}

async fn play_track<S: Storage, O: AudioOutput>(
    kernel: &Kernel,
    card: &Shared<S>,
    out: &mut O,
    name: &str,
) -> Result<PlaybackOutcome, PlaybackError> {
    let mut file = {
        let mut card = card.lock().await;
        card.open_file(name).await.map_err(|_| PlaybackError::Read)?
    };
    let stop = kernel.signals.wait_any(STOP_PLAYBACK);
    playback::play(&mut file, out, &kernel.rings, &kernel.playback, stop).await
}
