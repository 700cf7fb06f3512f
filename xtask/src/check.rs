use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Cortex-M target the core crates must build for.
const BOARD_TARGET: &str = "thumbv7em-none-eabihf";

/// Crates that must stay `no_std`.
const CORE_CRATES: &[&str] = &["platform", "rpn", "persist", "playback", "hostlink", "modes"];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: core crates and the firmware library on the board target
    for krate in CORE_CRATES.iter().copied().chain(["firmware"]) {
        let mut cmd = Command::new("cargo");
        cmd.args(["check", "-p", krate, "--lib", "--target", BOARD_TARGET]);
        if krate == "firmware" {
            cmd.args(["--features", "defmt"]);
        }
        step(&format!("{krate} ({BOARD_TARGET})"), &mut cmd, true)?;
    }

    // Check 2: simulator binary on the host
    step(
        "simulator (host)",
        Command::new("cargo").args(["check", "-p", "firmware", "--features", "emulator", "--bins"]),
        true,
    )?;

    // Check 3: clippy, reported but not fatal
    step(
        "clippy",
        Command::new("cargo").args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]),
        false,
    )?;

    // Check 4: formatting, reported but not fatal
    if !step("rustfmt", Command::new("cargo").args(["fmt", "--all", "--check"]), false)? {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    println!();
    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Run one check. A failing `required` check aborts; an optional one only
/// warns. Returns whether it passed.
fn step(name: &str, cmd: &mut Command, required: bool) -> Result<bool> {
    println!("{}", format!("  Checking {name}...").cyan());
    let start = Instant::now();
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run check for {name}"))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {name} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
        return Ok(true);
    }
    if required {
        eprintln!("{}", format!("  ✗ {name} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{name} check failed");
    }
    eprintln!("{}", format!("  ⚠ {name} reported problems").yellow().bold());
    eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    Ok(false)
}
