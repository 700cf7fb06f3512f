//! Coordination substrate shared by every task.
//!
//! | Primitive            | Used for                                        |
//! |----------------------|-------------------------------------------------|
//! | [`SignalSet`]        | periodic RUN/BUSY bits, playback stop/busy      |
//! | [`BoundedQueue`]     | key events, help notices, host clock-set        |
//! | `Signal` (mailbox)   | latest meter report, play request               |
//! | [`Shared`] (mutex)   | display bus, ADC, SD card                       |
//!
//! Everything here is `const`-constructible so the hardware build can keep
//! one [`Kernel`] in a `static`.

pub mod periodic;
pub mod queue;
pub mod signal_set;

use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::signal::Signal;
use hostlink::MessageType;
use modes::Periodic;
use platform::config::{
    AUDIO_RING_SLOTS, HOST_QUEUE_DEPTH, KEY_QUEUE_DEPTH, NOTICE_QUEUE_DEPTH,
};
use platform::storage::ENTRY_NAME_LEN;
use platform::{DateTime, InputEvent};
use playback::{ChannelRings, PlaybackEngine};
use rpn::Verbosity;

use crate::alarm::Alarm;
use crate::fmt::debug;
use crate::notice::Notice;

pub use periodic::{run_periodic, PeriodicControl, PeriodicJob};
pub use queue::BoundedQueue;
pub use signal_set::SignalSet;

/// Async mutex around one shared peripheral. Hold the guard for one
/// logical update only.
pub type Shared<T> = embassy_sync::mutex::Mutex<CriticalSectionRawMutex, T>;

/// Name of a file on the card.
pub type TrackName = heapless::String<ENTRY_NAME_LEN>;

/// Set while the player task owns a track.
pub const PLAYER_BUSY: u32 = 1 << 16;
/// Asks the player task to abandon the current track.
pub const STOP_PLAYBACK: u32 = 1 << 17;

/// One meter sample, as published to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub kind: MessageType,
    pub value: f64,
}

/// The peripherals more than one task touches.
pub struct Peripherals<D, A, S> {
    pub display: Shared<D>,
    pub adc: Shared<A>,
    pub card: Shared<S>,
}

impl<D, A, S> Peripherals<D, A, S> {
    pub const fn new(display: D, adc: A, card: S) -> Self {
        Self {
            display: Shared::new(display),
            adc: Shared::new(adc),
            card: Shared::new(card),
        }
    }
}

pub struct Kernel {
    pub signals: SignalSet,
    pub keys: BoundedQueue<InputEvent, KEY_QUEUE_DEPTH>,
    pub notices: BoundedQueue<Notice, NOTICE_QUEUE_DEPTH>,
    /// Clock-set requests from the host, applied by the clock task
    pub time_sets: BoundedQueue<DateTime, HOST_QUEUE_DEPTH>,
    /// Latest meter reading for the host; a newer one replaces an unsent one
    pub reports: Signal<CriticalSectionRawMutex, Reading>,
    pub play_requests: Signal<CriticalSectionRawMutex, TrackName>,
    pub playback: PlaybackEngine,
    pub rings: ChannelRings<AUDIO_RING_SLOTS>,
    alarm: BlockingMutex<CriticalSectionRawMutex, Cell<Alarm>>,
    latest: BlockingMutex<CriticalSectionRawMutex, Cell<Option<Reading>>>,
    verbosity: BlockingMutex<CriticalSectionRawMutex, Cell<Verbosity>>,
    link_errors: AtomicU32,
}

impl Kernel {
    pub const fn new() -> Self {
        Self {
            signals: SignalSet::new(),
            keys: BoundedQueue::new("key"),
            notices: BoundedQueue::new("notice"),
            time_sets: BoundedQueue::new("time-set"),
            reports: Signal::new(),
            play_requests: Signal::new(),
            playback: PlaybackEngine::new(),
            rings: ChannelRings::new(),
            alarm: BlockingMutex::new(Cell::new(Alarm {
                hour: 0,
                minute: 0,
                armed: false,
            })),
            latest: BlockingMutex::new(Cell::new(None)),
            verbosity: BlockingMutex::new(Cell::new(Verbosity::Normal)),
            link_errors: AtomicU32::new(0),
        }
    }

    pub fn periodic(&self, periodic: Periodic) -> PeriodicControl<'_> {
        PeriodicControl::new(&self.signals, periodic)
    }

    pub fn alarm(&self) -> Alarm {
        self.alarm.lock(Cell::get)
    }

    pub fn set_alarm(&self, alarm: Alarm) {
        self.alarm.lock(|cell| cell.set(alarm));
    }

    /// Record a meter reading and hand it to the host link.
    pub fn publish(&self, reading: Reading) {
        self.latest.lock(|cell| cell.set(Some(reading)));
        self.reports.signal(reading);
    }

    /// Most recent meter reading of any kind.
    pub fn latest_reading(&self) -> Option<Reading> {
        self.latest.lock(Cell::get)
    }

    /// Help level applied by [`Kernel::notify`]; follows the settings.
    pub fn set_verbosity(&self, verbosity: Verbosity) {
        self.verbosity.lock(|cell| cell.set(verbosity));
    }

    /// Queue `notice` for the help line if the help level allows it.
    pub fn notify(&self, notice: Notice) {
        if notice.shown_at(self.verbosity.lock(Cell::get)) {
            self.notices.post(notice);
        } else {
            debug!("notice suppressed: {}", notice.text());
        }
    }

    /// Abandon any track in progress and wait until the player has let go
    /// of the output and the card.
    pub async fn stop_playback(&self) {
        self.play_requests.reset();
        self.playback.stop();
        self.signals.set(STOP_PLAYBACK);
        self.signals.wait_clear(PLAYER_BUSY).await;
        self.signals.clear(STOP_PLAYBACK);
    }

    pub fn is_player_busy(&self) -> bool {
        self.signals.get() & PLAYER_BUSY != 0
    }

    /// Host frames dropped for a bad CRC or framing.
    pub fn link_errors(&self) -> u32 {
        self.link_errors.load(Ordering::Relaxed)
    }

    pub(crate) fn record_link_errors(&self, total: u32) {
        self.link_errors.store(total, Ordering::Relaxed);
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embassy_futures::join::join;
    use embassy_futures::yield_now;

    #[test]
    fn test_publish_keeps_latest_only() {
        let kernel = Kernel::new();
        kernel.publish(Reading {
            kind: MessageType::Volts,
            value: 1.0,
        });
        kernel.publish(Reading {
            kind: MessageType::Volts,
            value: 2.0,
        });
        assert_eq!(kernel.reports.try_take().map(|r| r.value), Some(2.0));
        assert!(kernel.reports.try_take().is_none());
        assert_eq!(kernel.latest_reading().map(|r| r.value), Some(2.0));
    }

    #[test]
    fn test_notify_respects_verbosity() {
        let kernel = Kernel::new();
        kernel.notify(Notice::ClockSet);
        assert!(kernel.notices.is_empty());
        kernel.notify(Notice::CardError);
        assert_eq!(kernel.notices.try_receive(), Some(Notice::CardError));
        kernel.set_verbosity(Verbosity::Silent);
        kernel.notify(Notice::CardError);
        kernel.notify(Notice::AlarmRinging);
        assert_eq!(kernel.notices.try_receive(), Some(Notice::AlarmRinging));
        assert!(kernel.notices.is_empty());
    }

    #[tokio::test]
    async fn test_stop_playback_waits_for_player() {
        let kernel = Kernel::new();
        kernel.signals.set(PLAYER_BUSY);
        let player = async {
            kernel.signals.wait_any(STOP_PLAYBACK).await;
            yield_now().await;
            kernel.signals.clear(PLAYER_BUSY);
        };
        join(kernel.stop_playback(), player).await;
        assert!(!kernel.is_player_busy());
        assert_eq!(kernel.signals.get() & STOP_PLAYBACK, 0);
    }
}
