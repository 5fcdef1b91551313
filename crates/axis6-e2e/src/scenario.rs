//! Scenarios and the suite runner.
//!
//! ```text
//! for each selected scenario:
//!   factory.new_page() ─► [AuthFixture::setup] ─► timeout(body) ─► record
//!                              │ error                 │ error
//!                              ▼                       ▼
//!                        FixtureFailed          Failed + failure-{name}.png
//! ```
//!
//! Scenarios run one after another, each on a fresh page.

use crate::config::SuiteConfig;
use crate::diagnostics::{Diagnostics, NoiseFilter};
use crate::driver::{DriverFactory, PageDriver};
use crate::fixture::{AuthFixture, AuthenticatedSession, Fixture};
use crate::reporter::{FailureMode, Reporter, ScenarioResult, ScenarioStatus};
use crate::result::{HarnessError, HarnessResult};
use crate::screenshot::ScreenshotStore;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Body of a scenario
pub type ScenarioFn = for<'a> fn(&'a ScenarioContext) -> BoxFuture<'a, HarnessResult<()>>;

/// One independent test recipe plus its metadata
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Unique name
    pub name: &'static str,
    /// Free-form tags (`smoke`, `auth`, `responsive`, ...)
    pub tags: &'static [&'static str],
    /// Run the auth fixture first
    pub requires_auth: bool,
    /// Creates or changes server-side data
    pub mutates_remote_state: bool,
    run: ScenarioFn,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("requires_auth", &self.requires_auth)
            .field("mutates_remote_state", &self.mutates_remote_state)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Scenario on public pages that leaves the server untouched
    #[must_use]
    pub const fn new(name: &'static str, run: ScenarioFn) -> Self {
        Self {
            name,
            tags: &[],
            requires_auth: false,
            mutates_remote_state: false,
            run,
        }
    }

    /// Set tags
    #[must_use]
    pub const fn with_tags(mut self, tags: &'static [&'static str]) -> Self {
        self.tags = tags;
        self
    }

    /// Require a signed-in session
    #[must_use]
    pub const fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Mark as changing server-side data
    #[must_use]
    pub const fn mutating(mut self) -> Self {
        self.mutates_remote_state = true;
        self
    }

    /// Whether `filter` selects this scenario (substring of name or a tag)
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.name.contains(filter) || self.tags.iter().any(|t| *t == filter)
    }
}

/// Severity of a scenario log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Step or note
    Info,
    /// Something suspicious that did not fail the scenario
    Warn,
}

/// One line of a scenario log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Message
    pub message: String,
}

/// Structured log of a single scenario, mirrored to `tracing`
#[derive(Debug)]
pub struct ScenarioLog {
    scenario: &'static str,
    entries: Mutex<Vec<LogEntry>>,
}

impl ScenarioLog {
    /// Empty log for `scenario`
    #[must_use]
    pub const fn new(scenario: &'static str) -> Self {
        Self {
            scenario,
            entries: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, level: LogLevel, message: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry { level, message });
    }

    /// Record a step
    pub fn step(&self, message: impl Into<String>) {
        let message = message.into();
        info!(scenario = self.scenario, "{message}");
        self.push(LogLevel::Info, message);
    }

    /// Record a warning
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(scenario = self.scenario, "{message}");
        self.push(LogLevel::Warn, message);
    }

    /// Attach captured console and network errors not matched by `filter`
    pub fn attach_diagnostics(&self, diagnostics: &Diagnostics, filter: &NoiseFilter) {
        for entry in diagnostics.unexpected_errors(filter) {
            self.warn(format!("console error: {}", entry.text));
        }
        for failure in diagnostics.unexpected_network_failures(filter) {
            self.warn(format!("HTTP {} for {}", failure.status, failure.url));
        }
    }

    /// Snapshot of the entries so far
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Everything a scenario body can use
#[derive(Debug)]
pub struct ScenarioContext {
    driver: Box<dyn PageDriver>,
    config: Arc<SuiteConfig>,
    session: Option<AuthenticatedSession>,
    log: ScenarioLog,
    screenshots: ScreenshotStore,
}

impl ScenarioContext {
    /// Context for `scenario` on `driver`
    #[must_use]
    pub fn new(scenario: &'static str, driver: Box<dyn PageDriver>, config: Arc<SuiteConfig>) -> Self {
        let screenshots = ScreenshotStore::new(config.screenshot_dir.clone());
        Self {
            driver,
            config,
            session: None,
            log: ScenarioLog::new(scenario),
            screenshots,
        }
    }

    /// Attach the fixture's session
    #[must_use]
    pub fn with_session(mut self, session: AuthenticatedSession) -> Self {
        self.session = Some(session);
        self
    }

    /// The page under test
    #[must_use]
    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Signed-in session
    ///
    /// # Errors
    ///
    /// Returns a fixture error when the scenario did not request one.
    pub fn session(&self) -> HarnessResult<&AuthenticatedSession> {
        self.session
            .as_ref()
            .ok_or_else(|| HarnessError::fixture("scenario has no authenticated session"))
    }

    /// Scenario log
    #[must_use]
    pub const fn log(&self) -> &ScenarioLog {
        &self.log
    }

    /// Screenshot store for this run
    #[must_use]
    pub const fn screenshots(&self) -> &ScreenshotStore {
        &self.screenshots
    }
}

/// Progress notifications from [`Suite::run_with`]
#[derive(Debug, Clone, Copy)]
pub enum SuiteEvent<'a> {
    /// A scenario is about to run
    Started(&'a Scenario),
    /// A scenario finished (or was skipped)
    Finished(&'a ScenarioResult),
}

/// Runs scenarios sequentially and collects their results
#[derive(Debug, Clone)]
pub struct Suite {
    config: Arc<SuiteConfig>,
    scenarios: Vec<Scenario>,
    filter: Option<String>,
    read_only: bool,
    failure_mode: FailureMode,
    noise: NoiseFilter,
}

impl Suite {
    /// Suite over `scenarios`
    #[must_use]
    pub fn new(config: SuiteConfig, scenarios: Vec<Scenario>) -> Self {
        Self {
            config: Arc::new(config),
            scenarios,
            filter: None,
            read_only: false,
            failure_mode: FailureMode::CollectAll,
            noise: NoiseFilter::default(),
        }
    }

    /// Only run scenarios whose name contains `filter` or that carry it as a tag
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Skip scenarios that would change server-side data
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Stop at the first failure, or collect all
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Replace the console noise filter
    #[must_use]
    pub fn with_noise_filter(mut self, noise: NoiseFilter) -> Self {
        self.noise = noise;
        self
    }

    /// Scenarios selected by the filter, in order
    #[must_use]
    pub fn selected(&self) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|s| self.filter.as_deref().map_or(true, |f| s.matches(f)))
            .collect()
    }

    /// Report name: `axis6-e2e`, plus the filter when one is set
    fn report_name(&self) -> String {
        match self.filter {
            Some(ref filter) => format!("axis6-e2e ({filter})"),
            None => "axis6-e2e".to_string(),
        }
    }

    /// Run every selected scenario
    pub async fn run(&self, factory: &dyn DriverFactory) -> Reporter {
        self.run_with(factory, |_| {}).await
    }

    /// Run every selected scenario, reporting progress to `on_event`
    pub async fn run_with<F>(&self, factory: &dyn DriverFactory, mut on_event: F) -> Reporter
    where
        F: FnMut(SuiteEvent<'_>),
    {
        let mut reporter = Reporter::with_mode(self.failure_mode).with_name(self.report_name());
        reporter.start();
        let fixture = AuthFixture::from_config(&self.config);

        for scenario in self.selected() {
            on_event(SuiteEvent::Started(scenario));
            let result = match self.skip_reason(scenario, &fixture) {
                Some(reason) => {
                    info!(scenario = scenario.name, reason, "scenario skipped");
                    ScenarioResult::skipped(scenario.name, reason)
                }
                None => self.run_one(factory, scenario, &fixture).await,
            };
            on_event(SuiteEvent::Finished(&result));
            if let Err(e) = reporter.record(result) {
                warn!(error = %e, "stopping run");
                break;
            }
        }

        info!("{}", reporter.summary());
        reporter
    }

    fn skip_reason(&self, scenario: &Scenario, fixture: &AuthFixture) -> Option<&'static str> {
        if !self.read_only {
            return None;
        }
        if scenario.mutates_remote_state {
            return Some("mutates remote state (read-only run)");
        }
        if scenario.requires_auth && fixture.mutates_remote_state() {
            return Some("needs a fixed test account in a read-only run");
        }
        None
    }

    async fn run_one(
        &self,
        factory: &dyn DriverFactory,
        scenario: &Scenario,
        fixture: &AuthFixture,
    ) -> ScenarioResult {
        info!(scenario = scenario.name, "scenario start");
        let start = Instant::now();

        let driver = match factory.new_page().await {
            Ok(driver) => driver,
            Err(e) => return ScenarioResult::failed(scenario.name, start.elapsed(), e.to_string()),
        };
        let mut ctx = ScenarioContext::new(scenario.name, driver, Arc::clone(&self.config));

        if scenario.requires_auth {
            match fixture.setup(ctx.driver(), &self.config).await {
                Ok(session) => ctx = ctx.with_session(session),
                Err(e) => {
                    warn!(scenario = scenario.name, error = %e, "fixture failed");
                    let result =
                        ScenarioResult::fixture_failed(scenario.name, start.elapsed(), e.to_string());
                    let result = self.attach_failure_screenshot(&ctx, result).await;
                    self.close(&ctx).await;
                    return result;
                }
            }
        }

        let outcome = tokio::time::timeout(self.config.scenario_timeout(), (scenario.run)(&ctx))
            .await
            .unwrap_or_else(|_| {
                Err(HarnessError::timeout(
                    format!("scenario {}", scenario.name),
                    self.config.scenario_timeout_ms,
                ))
            });

        match ctx.driver().diagnostics().await {
            Ok(diagnostics) => ctx.log().attach_diagnostics(&diagnostics, &self.noise),
            Err(e) => debug!(error = %e, "diagnostics unavailable"),
        }

        let result = match outcome {
            Ok(()) => ScenarioResult::passed(scenario.name, start.elapsed()),
            Err(e) => {
                let result = ScenarioResult::failed(scenario.name, start.elapsed(), e.to_string());
                self.attach_failure_screenshot(&ctx, result).await
            }
        };

        if let Ok(session) = ctx.session() {
            if let Err(e) = fixture.teardown(ctx.driver(), session).await {
                ctx.log().warn(format!("fixture teardown failed: {e}"));
            }
        }
        self.close(&ctx).await;

        let status = match result.status {
            ScenarioStatus::Passed => "passed",
            ScenarioStatus::Failed => "failed",
            ScenarioStatus::Skipped => "skipped",
            ScenarioStatus::FixtureFailed => "fixture_failed",
        };
        info!(
            scenario = scenario.name,
            status,
            duration_ms = u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
            "scenario end"
        );
        result
    }

    async fn attach_failure_screenshot(
        &self,
        ctx: &ScenarioContext,
        result: ScenarioResult,
    ) -> ScenarioResult {
        match ctx
            .screenshots()
            .capture(ctx.driver(), "failure", &result.name)
            .await
        {
            Ok(path) => result.with_screenshot(path),
            Err(e) => {
                warn!(scenario = %result.name, error = %e, "failure screenshot not captured");
                result
            }
        }
    }

    async fn close(&self, ctx: &ScenarioContext) {
        if let Err(e) = ctx.driver().close().await {
            debug!(error = %e, "closing page failed");
        }
    }
}
