//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// axis6-e2e: end-to-end browser suite for AXIS6
#[derive(Parser, Debug)]
#[command(name = "axis6-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Site under test (overrides file and environment)
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long, global = true)]
    pub headed: bool,

    /// Launch Chromium without its sandbox (containers, CI)
    #[arg(long, global = true)]
    pub no_sandbox: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the regression suite
    Run(RunArgs),

    /// Record which optional features the site exposes (never fails on absence)
    Probe(ProbeArgs),

    /// Check that the API endpoints answer below 500
    Api(ApiArgs),

    /// List regression scenarios
    List(ListArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Only scenarios whose name contains this, or that carry it as a tag
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop at the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip scenarios that create or change server-side data
    #[arg(long)]
    pub read_only: bool,

    /// Write a JUnit XML report
    #[arg(long, value_name = "PATH")]
    pub junit: Option<PathBuf>,

    /// Write a JSON report
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

/// Arguments for the probe command
#[derive(Parser, Debug, Default)]
pub struct ProbeArgs {
    /// Write observations as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

/// Arguments for the api command
#[derive(Parser, Debug, Default)]
pub struct ApiArgs {
    /// Endpoint to check instead of the defaults (repeatable)
    #[arg(long = "endpoint", value_name = "PATH")]
    pub endpoints: Vec<String>,
}

/// Arguments for the list command
#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Only scenarios whose name contains this, or that carry it as a tag
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
