//! Desktop simulator entry point.
//!
//! Wires the std-backed peripherals from [`firmware::sim`] to the same tasks
//! the board runs, on one tokio thread. Keys and host lines are typed on
//! stdin; the LCD is redrawn on stdout; logs go to stderr.
//!
//! ```bash
//! SDCARD_PATH=./sdcard cargo run -p firmware --features emulator
//! cargo run -p firmware --features emulator -- --dump-settings
//! ```

#![allow(clippy::print_stdout)]

use std::time::Duration;

use anyhow::Context as _;
use firmware::sim::{
    console_task, ConsoleAudio, ConsoleKeypad, HostPort, SimConfig, SyntheticAdc, SystemClock,
    TerminalLcd, TraceTx,
};
use firmware::tasks::{
    clock_task, host_rx_task, host_tx_task, keypad_task, meter_task, notice_task, player_task,
    progress_task, timekeeper_task, Meter,
};
use firmware::{App, Kernel, Peripherals, Shared};
use platform::config::{boot_banner, EEPROM_CAPACITY, KEY_QUEUE_DEPTH};
use platform::eeprom::FileEeprom;
use platform::storage_local::LocalFileStorage;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Time the sleep path gets to write the EEPROM image after `quit`.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    let mut eeprom = FileEeprom::open(&config.eeprom_path, EEPROM_CAPACITY)
        .with_context(|| format!("opening EEPROM image {}", config.eeprom_path.display()))?;

    if std::env::args().skip(1).any(|arg| arg == "--dump-settings") {
        let (state, error) = persist::load_or_default(&mut eeprom);
        if let Some(e) = error {
            tracing::warn!("EEPROM image unreadable ({e}), showing defaults");
        }
        println!("{}", serde_json::to_string_pretty(&state.settings)?);
        return Ok(());
    }

    tracing::info!(
        card = %config.card_root.display(),
        eeprom = %config.eeprom_path.display(),
        "{}",
        boot_banner()
    );

    let card = LocalFileStorage::new(&config.card_root.to_string_lossy());
    let (keys_tx, keys_rx) = mpsc::channel(KEY_QUEUE_DEPTH);
    let (host_tx, host_rx) = mpsc::channel(4);

    let kernel = Kernel::new();
    let peripherals = Peripherals::new(TerminalLcd::new(), SyntheticAdc::new(), card);
    let rtc = Shared::new(SystemClock::new());
    let mut audio = ConsoleAudio::new();

    let app = App::boot(&kernel, &peripherals, eeprom).await;

    let console = async {
        let result = console_task(keys_tx, host_tx).await;
        tokio::time::sleep(SHUTDOWN_GRACE).await;
        result
    };

    tokio::select! {
        never = app.run() => match never {},
        never = keypad_task(&kernel, ConsoleKeypad::new(keys_rx)) => match never {},
        never = meter_task(Meter::Volts, &kernel, &peripherals) => match never {},
        never = meter_task(Meter::Ohms, &kernel, &peripherals) => match never {},
        never = clock_task(&kernel, &rtc, &peripherals.display) => match never {},
        never = timekeeper_task(&kernel, &rtc) => match never {},
        never = progress_task(&kernel, &peripherals.display) => match never {},
        never = player_task(&kernel, &peripherals.card, &mut audio) => match never {},
        never = host_tx_task(&kernel, TraceTx::new()) => match never {},
        never = host_rx_task(&kernel, HostPort::new(host_rx)) => match never {},
        never = notice_task(&kernel, &peripherals.display) => match never {},
        result = console => {
            result?;
            tracing::info!("simulator stopped");
        }
    }
    Ok(())
}
