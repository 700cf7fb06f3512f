use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Command;

pub struct SimArgs {
    pub card: Option<PathBuf>,
    pub eeprom: Option<PathBuf>,
    pub dump_settings: bool,
    pub release: bool,
}

/// Run the simulator in the foreground with the terminal attached, so the
/// keypad console reads this process's stdin.
pub fn run(args: &SimArgs) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-p", "firmware", "--features", "emulator"]);
    if args.release {
        cmd.arg("--release");
    }
    if args.dump_settings {
        cmd.args(["--", "--dump-settings"]);
    }
    if let Some(card) = &args.card {
        anyhow::ensure!(card.is_dir(), "card root {} is not a directory", card.display());
        cmd.env("SDCARD_PATH", card);
    }
    if let Some(eeprom) = &args.eeprom {
        cmd.env("RPN_EEPROM", eeprom);
    }

    if !args.dump_settings {
        println!("{}", "▶ Starting simulator (type `quit` to save and exit)".cyan().bold());
    }
    let status = cmd.status().context("Failed to start the simulator")?;
    if !status.success() {
        anyhow::bail!("simulator exited with {status}");
    }
    Ok(())
}
