//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use crate::config::{LCD_COLUMNS, LCD_LINES};
use crate::*;

/// Mock character LCD
///
/// Keeps the visible text of both lines, the icon row and a log of every
/// `write_text` call so tests can check ordering.
pub struct MockDisplay {
    lines: [[u8; LCD_COLUMNS as usize]; LCD_LINES as usize],
    icons: [bool; Icon::COUNT],
    cursor: CursorMode,
    writes: Vec<(u8, String)>,
    clear_count: usize,
}

impl MockDisplay {
    /// Create new mock display (blank, no icons)
    pub fn new() -> Self {
        Self {
            lines: [[b' '; LCD_COLUMNS as usize]; LCD_LINES as usize],
            icons: [false; Icon::COUNT],
            cursor: CursorMode::Hidden,
            writes: Vec::new(),
            clear_count: 0,
        }
    }

    /// Visible text of `line`, trailing spaces trimmed
    pub fn line(&self, line: u8) -> String {
        self.lines
            .get(usize::from(line))
            .map(|l| String::from_utf8_lossy(l).trim_end().to_string())
            .unwrap_or_default()
    }

    /// Whether `icon` is lit
    pub fn icon(&self, icon: Icon) -> bool {
        self.icons.get(usize::from(icon as u8)).copied().unwrap_or(false)
    }

    /// Icons currently lit
    pub fn lit_icons(&self) -> Vec<Icon> {
        Icon::ALL.iter().copied().filter(|i| self.icon(*i)).collect()
    }

    /// Current cursor style
    pub fn cursor(&self) -> CursorMode {
        self.cursor
    }

    /// Every `write_text` call as (line, text), oldest first
    pub fn writes(&self) -> &[(u8, String)] {
        &self.writes
    }

    /// Number of `clear` calls
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MockDisplay {
    type Error = DisplayError;

    async fn clear(&mut self) -> Result<(), Self::Error> {
        for line in &mut self.lines {
            line.fill(b' ');
        }
        self.clear_count = self.clear_count.saturating_add(1);
        Ok(())
    }

    async fn write_text(&mut self, line: u8, col: u8, text: &str) -> Result<(), Self::Error> {
        let row = self
            .lines
            .get_mut(usize::from(line))
            .ok_or(DisplayError::OutOfBounds)?;
        let start = usize::from(col);
        for (cell, byte) in row.iter_mut().skip(start).zip(text.bytes()) {
            *cell = byte;
        }
        self.writes.push((line, text.to_string()));
        Ok(())
    }

    async fn set_cursor(&mut self, mode: CursorMode) -> Result<(), Self::Error> {
        self.cursor = mode;
        Ok(())
    }

    async fn set_icon(&mut self, icon: Icon, on: bool) -> Result<(), Self::Error> {
        if let Some(slot) = self.icons.get_mut(usize::from(icon as u8)) {
            *slot = on;
        }
        Ok(())
    }
}

/// Mock input device
pub struct MockInput {
    events: heapless::Deque<InputEvent, 16>,
}

impl MockInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            events: heapless::Deque::new(),
        }
    }

    /// Add event to queue
    pub fn add_event(&mut self, event: InputEvent) -> Result<(), InputEvent> {
        self.events.push_back(event)
    }

    /// Queue a key press for each key
    pub fn press_all(&mut self, keys: &[KeyId]) {
        for key in keys {
            let _ = self.events.push_back(InputEvent::KeyPress(*key));
        }
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for MockInput {
    async fn wait_for_event(&mut self) -> InputEvent {
        loop {
            if let Some(event) = self.events.pop_front() {
                return event;
            }
            embassy_time::Timer::after_millis(10).await;
        }
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

/// Mock ADC returning a fixed pin voltage per channel
pub struct MockAdc {
    volts: f64,
    ohms: f64,
    battery: f64,
    reads: usize,
    fail: bool,
}

impl MockAdc {
    /// Create new mock ADC; every channel reads 0 V
    pub fn new() -> Self {
        Self {
            volts: 0.0,
            ohms: 0.0,
            battery: 0.0,
            reads: 0,
            fail: false,
        }
    }

    /// Set the pin voltage returned for `channel`
    pub fn set(&mut self, channel: AdcChannel, pin_volts: f64) {
        match channel {
            AdcChannel::Volts => self.volts = pin_volts,
            AdcChannel::Ohms => self.ohms = pin_volts,
            AdcChannel::Battery => self.battery = pin_volts,
        }
    }

    /// Make every subsequent read fail
    pub fn fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    /// Number of completed reads
    pub fn read_count(&self) -> usize {
        self.reads
    }
}

impl Default for MockAdc {
    fn default() -> Self {
        Self::new()
    }
}

/// Injected ADC failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAdcError;

impl Adc for MockAdc {
    type Error = MockAdcError;

    async fn read(&mut self, channel: AdcChannel, _avg_count: u8) -> Result<f64, Self::Error> {
        if self.fail {
            return Err(MockAdcError);
        }
        self.reads = self.reads.saturating_add(1);
        Ok(match channel {
            AdcChannel::Volts => self.volts,
            AdcChannel::Ohms => self.ohms,
            AdcChannel::Battery => self.battery,
        })
    }
}

/// Mock fixed-rate audio output recording every sample
pub struct MockAudioOut {
    tick_hz: Option<u32>,
    samples: Vec<i16>,
    stopped: bool,
}

impl MockAudioOut {
    /// Create new mock output (not started)
    pub fn new() -> Self {
        Self {
            tick_hz: None,
            samples: Vec::new(),
            stopped: false,
        }
    }

    /// Tick rate passed to the last `start`
    pub fn tick_hz(&self) -> Option<u32> {
        self.tick_hz
    }

    /// Every sample written, in order
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Whether `stop` was called after the last `start`
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Default for MockAudioOut {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for MockAudioOut {
    fn start(&mut self, tick_hz: u32) {
        self.tick_hz = Some(tick_hz);
        self.stopped = false;
    }

    fn write_sample(&mut self, sample: i16) {
        self.samples.push(sample);
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Mock RTC that only moves when told to
pub struct MockClock {
    now: DateTime,
}

impl MockClock {
    /// Create a clock reading `now`
    pub fn new(now: DateTime) -> Self {
        Self { now }
    }

    /// Advance by `secs` seconds
    pub fn advance(&mut self, secs: u64) {
        self.now = DateTime::from_unix(self.now.to_unix().saturating_add(secs));
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(DateTime::epoch())
    }
}

impl Clock for MockClock {
    type Error = core::convert::Infallible;

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        Ok(self.now)
    }

    fn set(&mut self, time: DateTime) -> Result<(), Self::Error> {
        self.now = time;
        Ok(())
    }
}

/// Mock host serial port
///
/// Reads drain the queued RX bytes and then pend forever, like an idle UART.
pub struct MockSerial {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MockSerial {
    /// Create an idle port
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes for the firmware to receive
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Everything the firmware has sent
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }
}

impl Default for MockSerial {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_io_async::ErrorType for MockSerial {
    type Error = core::convert::Infallible;
}

impl embedded_io_async::Read for MockSerial {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if !self.rx.is_empty() {
                let mut n = 0_usize;
                for slot in buf.iter_mut() {
                    let Some(byte) = self.rx.pop_front() else {
                        break;
                    };
                    *slot = byte;
                    n = n.saturating_add(1);
                }
                return Ok(n);
            }
            embassy_time::Timer::after_millis(10).await;
        }
    }
}

impl embedded_io_async::Write for MockSerial {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Mock SD card holding in-memory files in one flat directory
pub struct MockCard {
    files: Vec<(String, Vec<u8>)>,
}

/// Mock SD card error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCardError {
    /// No such file
    NotFound,
}

impl MockCard {
    /// Create an empty card
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a file; entries list in insertion order
    pub fn add_file(&mut self, name: &str, data: Vec<u8>) {
        self.files.push((name.to_string(), data));
    }
}

impl Default for MockCard {
    fn default() -> Self {
        Self::new()
    }
}

/// Open file on a [`MockCard`]
pub struct MockCardFile {
    data: Vec<u8>,
    pos: usize,
}

impl File for MockCardFile {
    type Error = MockCardError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = self.data.get(self.pos..).unwrap_or(&[]);
        let n = rest.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), rest.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        self.pos = usize::try_from(pos).unwrap_or(usize::MAX).min(self.data.len());
        Ok(self.pos as u64)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl Storage for MockCard {
    type Error = MockCardError;
    type File = MockCardFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        self.files
            .iter()
            .find(|(name, _)| name == path)
            .map(|(_, data)| MockCardFile {
                data: data.clone(),
                pos: 0,
            })
            .ok_or(MockCardError::NotFound)
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.files.iter().any(|(name, _)| name == path))
    }

    async fn dir_entry(&mut self, index: usize) -> Result<Option<DirEntry>, Self::Error> {
        Ok(self
            .files
            .get(index)
            .map(|(name, data)| DirEntry::new(name, data.len() as u64, false)))
    }
}
