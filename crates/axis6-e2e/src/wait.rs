//! Wait Mechanisms
//!
//! Every wait in the suite is a poll loop bounded by an explicit timeout.
//! There are no fixed sleeps: the only pause is the poll interval between
//! two checks.

use crate::driver::PageDriver;
use crate::result::{HarnessError, HarnessResult};
use crate::url::UrlPattern;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for navigation waits (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `check` until it yields `Some`, or fail with `Timeout` once the
/// deadline passes. Errors from `check` abort the wait immediately.
///
/// `check` always runs at least once, even with a zero timeout.
pub async fn poll_until<T, F, Fut>(options: &WaitOptions, what: &str, mut check: F) -> HarnessResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HarnessResult<Option<T>>>,
{
    let deadline = Instant::now() + options.timeout();
    loop {
        if let Some(value) = check().await? {
            return Ok(value);
        }
        let now = Instant::now();
        if now >= deadline {
            debug!(what, timeout_ms = options.timeout_ms, "wait timed out");
            return Err(HarnessError::timeout(what, options.timeout_ms));
        }
        tokio::time::sleep(options.poll_interval().min(deadline - now)).await;
    }
}

/// Wait until the page URL matches any of `patterns`; returns that URL.
pub async fn wait_for_url(
    driver: &dyn PageDriver,
    patterns: &[UrlPattern],
    options: &WaitOptions,
) -> HarnessResult<String> {
    let what = format!(
        "url to match one of [{}]",
        patterns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    poll_until(options, &what, || async {
        let url = driver.current_url().await?;
        Ok(patterns.iter().any(|p| p.matches(&url)).then_some(url))
    })
    .await
}
