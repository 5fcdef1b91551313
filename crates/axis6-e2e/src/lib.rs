//! AXIS6 end-to-end suite: page objects, auth fixtures and browser scenarios
//!
//! Drives a Chromium page over CDP against a running AXIS6 deployment and
//! checks the landing, auth, dashboard, settings, profile, chat and My Day
//! routes. A separate site probe records which optional features are
//! deployed without failing on their absence.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    AXIS6 E2E Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Page       │    │ PageDriver │            │
//! │   │ (+ Auth    │───►│ Objects    │───►│ (chromium  │            │
//! │   │  Fixture)  │    │ + Locators │    │  or mock)  │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                                                        │
//! │         ▼                                                        │
//! │   ┌────────────┐    ┌────────────┐                               │
//! │   │ Reporter   │    │ Screenshot │                               │
//! │   │ JUnit/JSON │    │ Store      │                               │
//! │   └────────────┘    └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! # async fn demo(factory: &dyn axis6_e2e::DriverFactory) {
//! use axis6_e2e::{scenarios, Suite, SuiteConfig};
//!
//! let config = SuiteConfig::load(None).unwrap_or_default();
//! let report = Suite::new(config, scenarios::regression_suite())
//!     .with_filter("smoke")
//!     .run(factory)
//!     .await;
//! println!("{}", report.summary());
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// HTTP liveness checks for the API
pub mod api;
mod browser;
mod config;
mod diagnostics;
mod driver;
mod expect;
mod fixture;
mod locator;
/// Page objects for each AXIS6 route
pub mod pages;
mod performance;
/// Observational site health probe
pub mod probe;
mod reporter;
mod result;
mod scenario;
/// The regression catalogue
pub mod scenarios;
mod screenshot;
mod url;
mod user;
mod viewport;
mod wait;

#[cfg(test)]
mod testing;

#[cfg(feature = "api")]
pub use api::ApiProbe;
pub use api::{all_alive, ApiStatus, DEFAULT_ENDPOINTS};
pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{Browser, ChromiumDriver};
pub use config::{
    ConfigFile, SuiteConfig, DEFAULT_BASE_URL, DEFAULT_SCREENSHOT_DIR, ENV_BASE_URL,
    ENV_CHROMIUM_PATH, ENV_HEADLESS, ENV_PRODUCTION_URL, ENV_SCREENSHOT_DIR, ENV_TEST_EMAIL,
    ENV_TEST_PASSWORD,
};
pub use diagnostics::{
    ConsoleEntry, ConsoleLevel, Diagnostics, NetworkFailure, NoiseFilter, CAPTURE_SCRIPT,
    COLLECT_SCRIPT, DIAGNOSTICS_GLOBAL,
};
pub use driver::{
    ClickEffect, DriverFactory, MockDriver, MockDriverFactory, MockElement, MockPage, PageDriver,
};
pub use expect::{expect, Expect, ExpectAssertion};
pub use fixture::{AuthFixture, AuthMode, AuthenticatedSession, Fixture};
pub use locator::{Locator, LocatorOptions, Selector};
pub use pages::PageObject;
pub use performance::{BudgetViolation, NavigationTiming, PerformanceBudget, TIMING_SCRIPT};
pub use probe::{Observation, Presence, ProbeCheck, ProbePlan, ProbeReport, SiteProbe};
pub use reporter::{FailureMode, Reporter, ScenarioResult, ScenarioStatus};
pub use result::{HarnessError, HarnessResult};
pub use scenario::{
    LogEntry, LogLevel, Scenario, ScenarioContext, ScenarioFn, ScenarioLog, Suite, SuiteEvent,
};
pub use screenshot::{sanitize, ScreenshotStore};
pub use url::{path_of, UrlPattern};
pub use user::{TestUser, TEST_EMAIL_DOMAIN};
pub use viewport::{DeviceProfile, LayoutMetrics, LAYOUT_SCRIPT, OVERFLOW_TOLERANCE_PX};
pub use wait::{poll_until, wait_for_url, WaitOptions};
