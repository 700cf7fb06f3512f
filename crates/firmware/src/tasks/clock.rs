//! Real-time clock: the Clock mode display, host clock-set requests and the
//! daily alarm.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use modes::Periodic;
use platform::config::CLOCK_REFRESH_MS;
use platform::{Clock, DateTime, Display};

use crate::alarm::AlarmWatch;
use crate::app::screen::{self, format_line, Line};
use crate::fmt::{info, warn};
use crate::kernel::{run_periodic, Kernel, PeriodicJob, Shared};
use crate::notice::Notice;

/// `YYYY-MM-DD` over `HH:MM:SS`.
pub fn clock_lines(now: &DateTime) -> (Line, Line) {
    (
        format_line(format_args!("{:04}-{:02}-{:02}", now.year, now.month, now.day)),
        format_line(format_args!("{:02}:{:02}:{:02}", now.hour, now.minute, now.second)),
    )
}

pub struct ClockJob<'a, C, D> {
    rtc: &'a Shared<C>,
    display: &'a Shared<D>,
}

impl<'a, C, D> ClockJob<'a, C, D> {
    pub fn new(rtc: &'a Shared<C>, display: &'a Shared<D>) -> Self {
        Self { rtc, display }
    }
}

impl<C: Clock, D: Display> PeriodicJob for ClockJob<'_, C, D> {
    async fn tick(&mut self) {
        let now = self.rtc.lock().await.now();
        match now {
            Ok(now) => {
                let (date, time) = clock_lines(&now);
                screen::show(self.display, &date, &time).await;
            }
            Err(_) => warn!("RTC read failed"),
        }
    }
}

/// Clock mode display, redrawn every second while Clock is current.
pub async fn clock_task<C: Clock, D: Display>(
    kernel: &Kernel,
    rtc: &Shared<C>,
    display: &Shared<D>,
) -> ! {
    let mut job = ClockJob::new(rtc, display);
    run_periodic(
        kernel.periodic(Periodic::ClockRefresh),
        Duration::from_millis(CLOCK_REFRESH_MS),
        &mut job,
    )
    .await
}

/// Apply host clock-set requests and ring the alarm; runs in every mode.
pub async fn timekeeper_task<C: Clock>(kernel: &Kernel, rtc: &Shared<C>) -> ! {
    let mut watch = AlarmWatch::new();
    let mut ticker = Ticker::every(Duration::from_millis(CLOCK_REFRESH_MS));
    loop {
        if let Either::Second(time) = select(ticker.next(), kernel.time_sets.receive()).await {
            set_time(kernel, rtc, time).await;
        }
        let now = rtc.lock().await.now();
        let Ok(now) = now else {
            warn!("RTC read failed");
            continue;
        };
        if watch.check(&kernel.alarm(), &now) {
            info!("alarm {}:{}", now.hour, now.minute);
            kernel.notify(Notice::AlarmRinging);
        }
    }
}

async fn set_time<C: Clock>(kernel: &Kernel, rtc: &Shared<C>, time: DateTime) {
    let result = rtc.lock().await.set(time);
    match result {
        Ok(()) => {
            info!(
                "clock set to {}-{}-{} {}:{}:{}",
                time.year, time.month, time.day, time.hour, time.minute, time.second
            );
            kernel.notify(Notice::ClockSet);
        }
        Err(_) => warn!("RTC write failed"),
    }
}
