//! Simulated RTC, ADC, audio output and serial port.

use std::convert::Infallible;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use hostlink::StreamDecoder;
use platform::audio::sample_to_duty;
use platform::config::ADC_REFERENCE_VOLTS;
use platform::{Adc, AdcChannel, AudioOutput, Clock, DateTime};
use tokio::sync::mpsc;

/// Host wall clock shifted by whatever the last `set` asked for.
#[derive(Debug, Default)]
pub struct SystemClock {
    offset_secs: i64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn host_secs() -> i64 {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        i64::try_from(secs).unwrap_or(i64::MAX)
    }
}

impl Clock for SystemClock {
    type Error = Infallible;

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        let secs = Self::host_secs().saturating_add(self.offset_secs);
        Ok(DateTime::from_unix(u64::try_from(secs).unwrap_or(0)))
    }

    fn set(&mut self, time: DateTime) -> Result<(), Self::Error> {
        let target = i64::try_from(time.to_unix()).unwrap_or(i64::MAX);
        self.offset_secs = target.saturating_sub(Self::host_secs());
        Ok(())
    }
}

/// Volt input swings slowly around 0.3 V; the ohm input sits at mid-rail
/// (one reference resistor); the battery reads full.
pub struct SyntheticAdc {
    started: Instant,
}

impl SyntheticAdc {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SyntheticAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl Adc for SyntheticAdc {
    type Error = Infallible;

    async fn read(&mut self, channel: AdcChannel, _avg_count: u8) -> Result<f64, Self::Error> {
        let t = self.started.elapsed().as_secs_f64();
        Ok(match channel {
            AdcChannel::Volts => 0.3 + 0.1 * (t / 5.0).sin(),
            AdcChannel::Ohms => ADC_REFERENCE_VOLTS / 2.0,
            AdcChannel::Battery => ADC_REFERENCE_VOLTS * 0.9,
        })
    }
}

/// Audio sink that only tracks what a 10-bit PWM stage would have done.
#[derive(Debug, Default)]
pub struct ConsoleAudio {
    tick_hz: Option<u32>,
    samples: u64,
    last_duty: u16,
}

impl ConsoleAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl AudioOutput for ConsoleAudio {
    fn start(&mut self, tick_hz: u32) {
        tracing::info!(tick_hz, "audio start");
        self.tick_hz = Some(tick_hz);
        self.samples = 0;
    }

    fn write_sample(&mut self, sample: i16) {
        self.last_duty = sample_to_duty(sample, 10);
        self.samples = self.samples.saturating_add(1);
    }

    fn stop(&mut self) {
        if self.tick_hz.take().is_some() {
            tracing::info!(samples = self.samples, duty = self.last_duty, "audio stop");
        }
    }
}

/// Serial receive line fed with byte chunks from the console.
pub struct HostPort {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl HostPort {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            pending: Vec::new(),
        }
    }
}

impl embedded_io_async::ErrorType for HostPort {
    type Error = Infallible;
}

impl embedded_io_async::Read for HostPort {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pending.is_empty() {
            match self.rx.recv().await {
                Some(chunk) => self.pending = chunk,
                None => return Ok(0),
            }
        }
        let n = self.pending.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), self.pending.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pending.drain(..n);
        Ok(n)
    }
}

/// Serial transmit line: every frame the firmware sends is decoded and
/// logged.
#[derive(Default)]
pub struct TraceTx {
    decoder: StreamDecoder,
}

impl TraceTx {
    pub fn new() -> Self {
        Self::default()
    }
}

impl embedded_io_async::ErrorType for TraceTx {
    type Error = Infallible;
}

impl embedded_io_async::Write for TraceTx {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        tracing::trace!(bytes = ?buf, "host tx");
        for &byte in buf {
            if let Some(message) = self.decoder.push(byte) {
                tracing::debug!(?message, "host <-");
            }
        }
        Ok(buf.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_io_async::{Read as _, Write as _};

    #[test]
    fn test_set_shifts_the_clock() {
        let mut clock = SystemClock::new();
        let target = DateTime::new(2030, 1, 2, 3, 4, 5).unwrap();
        clock.set(target).unwrap();
        let now = clock.now().unwrap();
        assert!(now.to_unix().abs_diff(target.to_unix()) <= 1);
    }

    #[tokio::test]
    async fn test_host_port_splits_chunks() {
        let (tx, rx) = mpsc::channel(4);
        let mut port = HostPort::new(rx);
        tx.send(b"hello".to_vec()).await.unwrap();
        drop(tx);
        let mut buf = [0u8; 3];
        assert_eq!(port.read(&mut buf).await.unwrap(), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(port.read(&mut buf).await.unwrap(), 2);
        assert_eq!(port.read(&mut buf).await.unwrap(), 0, "closed");
    }

    #[tokio::test]
    async fn test_trace_tx_accepts_frames() {
        let mut tx = TraceTx::new();
        let frame = hostlink::meter_frame(hostlink::MessageType::Ohms, 10.0).unwrap();
        tx.write_all(&frame).await.unwrap();
        assert_eq!(tx.decoder.stats().messages, 1);
    }
}
