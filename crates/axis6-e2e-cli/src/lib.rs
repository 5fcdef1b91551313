//! AXIS6 end-to-end suite CLI
//!
//! Runs the regression suite, the optional-feature probe and the API
//! liveness check against one configured site.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{ApiArgs, Cli, ColorArg, Commands, ListArgs, ProbeArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{observation_line, scenario_line, summary_line, ProgressReporter};
pub use runner::{browser_config, build_config, execute, list_lines, suite_config, Runner};
