//! Keypad and host input typed on stdin.
//!
//! One command per line:
//!
//! ```text
//! 2 enter 3 +                    key legends, pressed in order
//! long:mode                      long press
//! time 10:18:2026:08:30:00       clock-set request from the host
//! quit                           sleep (saving state) and exit
//! ```

use anyhow::{anyhow, bail, Result};
use platform::{InputDevice, InputEvent, KeyId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Keys(Vec<InputEvent>),
    /// Raw bytes for the serial receive line
    Host(Vec<u8>),
    Quit,
}

pub fn parse_line(line: &str) -> Result<ConsoleCommand> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Ok(ConsoleCommand::Quit);
    }
    if let Some(stamp) = line.strip_prefix("time ") {
        let mut bytes = stamp.trim().as_bytes().to_vec();
        bytes.push(b'\r');
        return Ok(ConsoleCommand::Host(bytes));
    }
    let events = line
        .split_whitespace()
        .map(|token| match token.strip_prefix("long:") {
            Some(legend) => key(legend).map(InputEvent::KeyLongPress),
            None => key(token).map(InputEvent::KeyPress),
        })
        .collect::<Result<Vec<_>>>()?;
    if events.is_empty() {
        bail!("empty command");
    }
    Ok(ConsoleCommand::Keys(events))
}

fn key(legend: &str) -> Result<KeyId> {
    KeyId::from_legend(legend).ok_or_else(|| anyhow!("unknown key `{legend}`"))
}

/// Keypad fed by [`console_task`].
pub struct ConsoleKeypad {
    rx: mpsc::Receiver<InputEvent>,
}

impl ConsoleKeypad {
    pub fn new(rx: mpsc::Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl InputDevice for ConsoleKeypad {
    async fn wait_for_event(&mut self) -> InputEvent {
        match self.rx.recv().await {
            Some(event) => event,
            None => core::future::pending().await,
        }
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }
}

/// Read stdin until `quit` or end of input. Returns once the simulator
/// should shut down.
pub async fn console_task(
    keys: mpsc::Sender<InputEvent>,
    host: mpsc::Sender<Vec<u8>>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Ok(ConsoleCommand::Keys(events)) => {
                for event in events {
                    keys.send(event).await?;
                }
            }
            Ok(ConsoleCommand::Host(bytes)) => host.send(bytes).await?,
            Ok(ConsoleCommand::Quit) => {
                keys.send(InputEvent::KeyPress(KeyId::Sleep)).await?;
                return Ok(());
            }
            Err(e) => tracing::warn!("{e:#}"),
        }
    }
    tracing::info!("stdin closed");
    Ok(())
}
