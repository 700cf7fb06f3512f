//! Run/stop control for the mode-private periodic tasks.
//!
//! Each [`Periodic`] owns two bits of the kernel signal set:
//!
//! ```text
//!   RUN   set by resume, cleared by quiesce
//!   BUSY  set while one update is in progress
//! ```
//!
//! An update only starts if RUN is set, and BUSY is raised in the same
//! critical section as that check. `quiesce` clears RUN and then waits for
//! BUSY to drop, so once it returns no update of the old mode can reach the
//! display.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use modes::Periodic;

use super::signal_set::SignalSet;

#[allow(clippy::arithmetic_side_effects)] // discriminant < 4
const fn run_bit(periodic: Periodic) -> u32 {
    1 << (periodic as u32)
}

#[allow(clippy::arithmetic_side_effects)] // discriminant < 4
const fn busy_bit(periodic: Periodic) -> u32 {
    1 << (periodic as u32 + 8)
}

/// Every RUN bit.
pub const RUN_MASK: u32 = 0x0000_000F;
/// Every BUSY bit.
pub const BUSY_MASK: u32 = 0x0000_0F00;

/// Handle on one periodic task's RUN/BUSY pair.
#[derive(Clone, Copy)]
pub struct PeriodicControl<'a> {
    signals: &'a SignalSet,
    run: u32,
    busy: u32,
}

impl<'a> PeriodicControl<'a> {
    pub fn new(signals: &'a SignalSet, periodic: Periodic) -> Self {
        Self {
            signals,
            run: run_bit(periodic),
            busy: busy_bit(periodic),
        }
    }

    pub fn resume(&self) {
        self.signals.set(self.run);
    }

    /// Stop the task and wait until its in-progress update has finished.
    pub async fn quiesce(&self) {
        self.signals.clear(self.run);
        self.signals.wait_clear(self.busy).await;
    }

    pub fn is_running(&self) -> bool {
        self.signals.get() & self.run != 0
    }

    pub fn is_busy(&self) -> bool {
        self.signals.get() & self.busy != 0
    }

    /// Claim one update. `None` once the task has been stopped.
    pub fn begin(&self) -> Option<Busy<'a>> {
        self.signals
            .set_if(self.run, self.busy)
            .then(|| Busy {
                signals: self.signals,
                busy: self.busy,
            })
    }

    async fn wait_started(&self) {
        self.signals.wait_any(self.run).await;
    }

    async fn wait_stopped(&self) {
        self.signals.wait_clear(self.run).await;
    }
}

/// Marks an update in progress; clears BUSY on drop, including when the
/// update future is cancelled.
pub struct Busy<'a> {
    signals: &'a SignalSet,
    busy: u32,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.signals.clear(self.busy);
    }
}

/// One update of a mode's periodic work.
pub trait PeriodicJob {
    /// Sample and redraw. Runs with BUSY held.
    async fn tick(&mut self);
}

/// Drive `job` every `period` while `control` is running.
///
/// The first update runs as soon as the task is resumed.
pub async fn run_periodic<J: PeriodicJob>(
    control: PeriodicControl<'_>,
    period: Duration,
    job: &mut J,
) -> ! {
    loop {
        control.wait_started().await;
        let mut ticker = Ticker::every(period);
        loop {
            match control.begin() {
                Some(_busy) => job.tick().await,
                None => break,
            }
            if let Either::Second(()) = select(ticker.next(), control.wait_stopped()).await {
                break;
            }
        }
    }
}
