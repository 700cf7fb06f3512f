//! Help line: show queued notices on the top line, one at a time.

use embassy_time::Timer;
use platform::Display;

use crate::app::screen;
use crate::fmt::debug;
use crate::kernel::{Kernel, Shared};

/// How long a notice holds the line before the next one may replace it.
pub const NOTICE_HOLD_MS: u64 = 1_500;

pub async fn notice_task<D: Display>(kernel: &Kernel, display: &Shared<D>) -> ! {
    loop {
        let notice = kernel.notices.receive().await;
        debug!("notice: {}", notice.text());
        screen::show_line(display, 0, notice.text()).await;
        Timer::after_millis(NOTICE_HOLD_MS).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notice::Notice;
    use embassy_futures::select::{select, Either};
    use platform::mocks::MockDisplay;

    #[tokio::test]
    async fn test_notice_lands_on_the_top_line() {
        let kernel = Kernel::new();
        let display = Shared::new(MockDisplay::new());
        kernel.notify(Notice::CardError);

        let wait = Timer::after_millis(20);
        if let Either::First(never) = select(notice_task(&kernel, &display), wait).await {
            match never {}
        }
        let lcd = display.lock().await;
        assert_eq!(lcd.line(0).trim_end(), "Card error");
        assert!(kernel.notices.is_empty());
    }
}
