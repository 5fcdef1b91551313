//! `tracing` subscriber setup

use crate::config::CliConfig;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Filter from `RUST_LOG`, else from the verbosity
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_level()))
}

/// Install the global subscriber, writing to stderr.
///
/// A second call is a no-op.
pub fn init(config: &CliConfig) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.use_color())
                .with_target(false),
        )
        .try_init();
}
