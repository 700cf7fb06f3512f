//! Async transport glue over any `embedded_io_async` serial port.

use embedded_io_async::{Read, Write};
use platform::DateTime;

use crate::decoder::{DecoderStats, StreamDecoder};
use crate::frame::{self, FrameError, Message, MessageType};

/// Host link I/O failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    #[error("frame: {0}")]
    Frame(FrameError),
    #[error("serial read failed")]
    Read,
    #[error("serial write failed")]
    Write,
    /// The port reported end of stream
    #[error("serial port closed")]
    Closed,
}

impl From<FrameError> for LinkError {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

/// Write `bytes` completely and flush.
///
/// # Errors
///
/// [`LinkError::Write`] if the port fails.
pub async fn send<W: Write>(port: &mut W, bytes: &[u8]) -> Result<(), LinkError> {
    port.write_all(bytes).await.map_err(|_| LinkError::Write)?;
    port.flush().await.map_err(|_| LinkError::Write)
}

/// Frame and send one meter reading.
///
/// # Errors
///
/// See [`send`].
pub async fn send_reading<W: Write>(
    port: &mut W,
    kind: MessageType,
    value: f64,
) -> Result<(), LinkError> {
    let frame = frame::meter_frame(kind, value)?;
    send(port, &frame).await
}

/// Frame and send a clock-set request.
///
/// # Errors
///
/// See [`send`].
pub async fn send_time_set<W: Write>(port: &mut W, time: &DateTime) -> Result<(), LinkError> {
    let frame = frame::time_set_frame(time)?;
    send(port, &frame).await
}

/// Receive half: reads the port in chunks and feeds a [`StreamDecoder`].
pub struct Receiver<R> {
    port: R,
    decoder: StreamDecoder,
    buf: [u8; 32],
    pos: usize,
    filled: usize,
}

impl<R: Read> Receiver<R> {
    pub fn new(port: R) -> Self {
        Self {
            port,
            decoder: StreamDecoder::new(),
            buf: [0; 32],
            pos: 0,
            filled: 0,
        }
    }

    /// Wait for the next valid message. Bad frames and lines are counted in
    /// [`Receiver::stats`] and skipped.
    ///
    /// # Errors
    ///
    /// [`LinkError::Read`] or [`LinkError::Closed`] from the port.
    pub async fn next_message(&mut self) -> Result<Message, LinkError> {
        loop {
            while self.pos < self.filled {
                let byte = self.buf.get(self.pos).copied().unwrap_or(0);
                self.pos = self.pos.saturating_add(1);
                if let Some(message) = self.decoder.push(byte) {
                    return Ok(message);
                }
            }
            let n = self
                .port
                .read(&mut self.buf)
                .await
                .map_err(|_| LinkError::Read)?;
            if n == 0 {
                return Err(LinkError::Closed);
            }
            self.pos = 0;
            self.filled = n;
        }
    }

    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    pub fn into_inner(self) -> R {
        self.port
    }
}
