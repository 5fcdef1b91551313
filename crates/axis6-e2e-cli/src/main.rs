//! axis6-e2e: browser regression suite for AXIS6
//!
//! ## Usage
//!
//! ```bash
//! axis6-e2e run                           # Full regression suite
//! axis6-e2e run --read-only --junit r.xml # Production-safe run
//! axis6-e2e run --filter responsive       # One tag
//! axis6-e2e probe --json probe.json       # Record optional features
//! axis6-e2e api                           # API liveness
//! axis6-e2e list                          # Scenario catalogue
//! ```

use axis6_e2e_cli::{execute, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
