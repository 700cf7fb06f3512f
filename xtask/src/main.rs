// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod sim;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "RPN handheld development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the no_std core crates for the board target and the simulator for the host
    Check,
    /// Run the workspace tests
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Run the desktop simulator
    Sim {
        /// Directory served as the SD card root (SDCARD_PATH)
        #[arg(long)]
        card: Option<std::path::PathBuf>,
        /// EEPROM image file (RPN_EEPROM)
        #[arg(long)]
        eeprom: Option<std::path::PathBuf>,
        /// Print the saved settings as JSON and exit
        #[arg(long)]
        dump_settings: bool,
        /// Build with optimizations
        #[arg(short, long)]
        release: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Sim {
            card,
            eeprom,
            dump_settings,
            release,
        } => sim::run(&sim::SimArgs {
            card,
            eeprom,
            dump_settings,
            release,
        }),
    }
}
