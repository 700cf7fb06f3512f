//! Serial host link: meter readings out, clock-set requests in.

use embedded_io_async::{Read, Write};
use hostlink::{LinkError, Message, Receiver};

use crate::fmt::{debug, error, info, warn};
use crate::kernel::Kernel;

/// Send each published meter reading. A reading that arrives while the
/// previous one is still being written replaces any unsent one.
pub async fn host_tx_task<W: Write>(kernel: &Kernel, mut port: W) -> ! {
    loop {
        let reading = kernel.reports.wait().await;
        if let Err(e) = hostlink::send_reading(&mut port, reading.kind, reading.value).await {
            warn!("host send failed: {}", e);
        }
    }
}

/// Decode host frames. Clock-set requests go to the timekeeper; bad frames
/// are counted. Parks for good once the port closes.
pub async fn host_rx_task<R: Read>(kernel: &Kernel, port: R) -> ! {
    let mut rx = Receiver::new(port);
    loop {
        let message = rx.next_message().await;
        let stats = rx.stats();
        kernel.record_link_errors(stats.crc_errors.saturating_add(stats.framing_errors));
        match message {
            Ok(Message::TimeSet(time)) => {
                kernel.time_sets.post(time);
            }
            Ok(other) => debug!("host message ignored: {:?}", other),
            Err(LinkError::Closed) => {
                info!("host link closed");
                loop {
                    core::future::pending::<()>().await;
                }
            }
            Err(e) => error!("host receive failed: {}", e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::Reading;
    use embassy_futures::select::{select, Either};
    use embassy_time::Timer;
    use hostlink::{MessageType, StreamDecoder};
    use platform::mocks::MockSerial;
    use platform::DateTime;

    #[tokio::test]
    async fn test_reading_goes_out_as_a_frame() {
        let kernel = Kernel::new();
        let mut serial = MockSerial::new();
        kernel.publish(Reading {
            kind: MessageType::Volts,
            value: 4.5,
        });

        let wait = Timer::after_millis(20);
        if let Either::First(never) = select(host_tx_task(&kernel, &mut serial), wait).await {
            match never {}
        }
        let mut decoder = StreamDecoder::new();
        assert_eq!(decoder.push_slice(serial.sent()), Some(Message::Volts(4.5)));
    }

    #[tokio::test]
    async fn test_time_set_reaches_the_queue_and_bad_frames_count() {
        let kernel = Kernel::new();
        let time = DateTime::new(2026, 10, 18, 8, 0, 0).unwrap();
        let mut frame = hostlink::time_set_frame(&time).unwrap().to_vec();
        let mut corrupt = frame.clone();
        if let Some(crc) = corrupt.last_mut() {
            *crc ^= 0xFF;
        }
        corrupt.append(&mut frame);
        let mut serial = MockSerial::new();
        serial.feed(&corrupt);

        let wait = async {
            while kernel.time_sets.is_empty() {
                Timer::after_millis(5).await;
            }
        };
        if let Either::First(never) = select(host_rx_task(&kernel, &mut serial), wait).await {
            match never {}
        }
        assert_eq!(kernel.time_sets.try_receive(), Some(time));
        assert_eq!(kernel.link_errors(), 1);
    }
}
