//! Subcommand execution

use crate::commands::{ApiArgs, Cli, Commands, ListArgs, ProbeArgs, RunArgs};
use crate::config::{CliConfig, ColorChoice, Verbosity};
use crate::error::{CliError, CliResult};
use crate::logging;
use crate::output::ProgressReporter;
use axis6_e2e::{scenarios, BrowserConfig, Scenario, SuiteConfig};

/// CLI configuration from the global flags
#[must_use]
pub fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_no_sandbox(cli.no_sandbox)
}

/// Suite configuration: defaults, `--config` file, environment, then flags
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a base URL is
/// not http(s).
pub fn suite_config(cli: &Cli) -> CliResult<SuiteConfig> {
    let mut config = SuiteConfig::load(cli.config.as_deref()).map_err(|e| match cli.config {
        Some(ref path) => CliError::config(format!("{}: {e}", path.display())),
        None => e.into(),
    })?;
    if let Some(ref url) = cli.base_url {
        config = config.with_base_url(url)?;
    }
    if cli.headed {
        config = config.with_headless(false);
    }
    Ok(config)
}

/// Browser launch settings for this run
#[must_use]
pub fn browser_config(suite: &SuiteConfig, cli: &CliConfig) -> BrowserConfig {
    let config = BrowserConfig::from_suite(suite);
    if cli.no_sandbox {
        config.with_no_sandbox()
    } else {
        config
    }
}

/// One line per scenario for `list`
#[must_use]
pub fn list_lines(filter: Option<&str>) -> Vec<String> {
    scenarios::regression_suite()
        .iter()
        .filter(|s| filter.map_or(true, |f| s.matches(f)))
        .map(list_line)
        .collect()
}

fn list_line(scenario: &Scenario) -> String {
    let mut flags = Vec::new();
    if scenario.requires_auth {
        flags.push("auth");
    }
    if scenario.mutates_remote_state {
        flags.push("mutates");
    }
    let mut line = format!("{:<44} [{}]", scenario.name, scenario.tags.join(", "));
    if !flags.is_empty() {
        line.push_str(&format!(" ({})", flags.join(", ")));
    }
    line
}

/// Parse-independent entry point used by `main`
///
/// # Errors
///
/// Returns an error when configuration is invalid, the browser cannot be
/// launched, or any scenario or endpoint fails.
pub fn execute(cli: Cli) -> CliResult<()> {
    let config = build_config(&cli);
    logging::init(&config);

    if let Commands::List(ref args) = cli.command {
        return list(args);
    }

    let suite = suite_config(&cli)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let mut runner = Runner::new(config, suite);
    runner.describe_settings();

    runtime.block_on(async {
        match cli.command {
            Commands::Run(ref args) => runner.run_suite(args).await,
            Commands::Probe(ref args) => runner.probe(args).await,
            Commands::Api(ref args) => runner.api(args).await,
            Commands::List(ref args) => list(args),
        }
    })
}

fn list(args: &ListArgs) -> CliResult<()> {
    let lines = list_lines(args.filter.as_deref());
    if lines.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "no scenario matches '{}'",
            args.filter.as_deref().unwrap_or_default()
        )));
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Runs subcommands against one configured site
#[derive(Debug)]
pub struct Runner {
    config: CliConfig,
    suite: SuiteConfig,
    progress: ProgressReporter,
}

impl Runner {
    /// Create a runner
    #[must_use]
    pub fn new(config: CliConfig, suite: SuiteConfig) -> Self {
        let progress = ProgressReporter::new(config.use_color(), config.verbosity.is_quiet());
        Self {
            config,
            suite,
            progress,
        }
    }

    /// CLI configuration in effect
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Suite configuration in effect
    #[must_use]
    pub const fn suite_config(&self) -> &SuiteConfig {
        &self.suite
    }

    /// Effective settings, one per line; empty unless verbose
    #[must_use]
    pub fn settings_lines(&self) -> Vec<String> {
        if !self.config.verbosity.is_verbose() {
            return Vec::new();
        }
        let account = match self.suite.test_account {
            Some(ref user) => format!("fixed ({})", user.email),
            None => "generated per run".to_string(),
        };
        vec![
            format!("base url: {}", self.suite.base_url),
            format!("headless: {}", self.suite.headless),
            format!("sandbox: {}", !self.config.no_sandbox),
            format!("screenshots: {}", self.suite.screenshot_dir.display()),
            format!(
                "timeouts: element {}ms, navigation {}ms, scenario {}ms",
                self.suite.element_timeout_ms,
                self.suite.navigation_timeout_ms,
                self.suite.scenario_timeout_ms
            ),
            format!("test account: {account}"),
        ]
    }

    /// Print the effective settings when running verbose
    pub fn describe_settings(&self) {
        for line in self.settings_lines() {
            self.progress.info(&line);
        }
    }

    /// `run`: the regression suite in one Chromium instance
    #[cfg(feature = "browser")]
    pub async fn run_suite(&mut self, args: &RunArgs) -> CliResult<()> {
        use axis6_e2e::{Browser, FailureMode, Suite, SuiteEvent};

        let mode = if args.fail_fast {
            FailureMode::AndonCord
        } else {
            FailureMode::CollectAll
        };
        let mut suite = Suite::new(self.suite.clone(), scenarios::regression_suite())
            .with_read_only(args.read_only)
            .with_failure_mode(mode);
        if let Some(ref filter) = args.filter {
            suite = suite.with_filter(filter.clone());
        }
        let total = suite.selected().len();
        if total == 0 {
            return Err(CliError::invalid_argument(format!(
                "no scenario matches '{}'",
                args.filter.as_deref().unwrap_or_default()
            )));
        }

        self.progress
            .header(&format!("axis6-e2e against {}", self.suite.base_url));
        let browser = Browser::launch(browser_config(&self.suite, &self.config)).await?;

        self.progress.start_progress(total as u64, "starting");
        let progress = &self.progress;
        let report = suite
            .run_with(&browser, |event| match event {
                SuiteEvent::Started(scenario) => progress.set_message(scenario.name),
                SuiteEvent::Finished(result) => {
                    progress.scenario(result);
                    progress.increment(1);
                }
            })
            .await;
        progress.finish();

        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "closing browser failed");
        }

        self.write_reports(&report, args)?;
        self.progress.summary(
            report.passed_count(),
            report.failed_count(),
            report.skipped_count(),
            report.total_duration(),
        );

        if report.failed_count() > 0 {
            return Err(CliError::test_execution(format!(
                "{} of {} scenarios failed",
                report.failed_count(),
                report.total_count()
            )));
        }
        Ok(())
    }

    /// `run` without browser support
    #[cfg(not(feature = "browser"))]
    pub async fn run_suite(&mut self, _args: &RunArgs) -> CliResult<()> {
        Err(browser_missing())
    }

    #[cfg(feature = "browser")]
    fn write_reports(&self, report: &axis6_e2e::Reporter, args: &RunArgs) -> CliResult<()> {
        if let Some(ref path) = args.junit {
            report
                .generate_junit(path)
                .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            self.progress
                .info(&format!("JUnit report written to {}", path.display()));
        }
        if let Some(ref path) = args.json {
            report
                .generate_json(path)
                .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            self.progress
                .info(&format!("JSON report written to {}", path.display()));
        }
        Ok(())
    }

    /// `probe`: record optional features; absence never fails
    #[cfg(feature = "browser")]
    pub async fn probe(&self, args: &ProbeArgs) -> CliResult<()> {
        use axis6_e2e::{Browser, ProbePlan, SiteProbe};

        self.progress
            .header(&format!("probing {}", self.suite.base_url));
        let browser = Browser::launch(browser_config(&self.suite, &self.config)).await?;
        let report = SiteProbe::new(self.suite.clone())
            .run(&browser, &ProbePlan::axis6_default())
            .await;
        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "closing browser failed");
        }
        let report = report?;

        for observation in &report.observations {
            self.progress.observation(observation);
        }
        self.progress.info(&report.summary());
        if let Some(ref path) = args.json {
            report
                .write_json(path)
                .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            self.progress
                .info(&format!("probe report written to {}", path.display()));
        }
        Ok(())
    }

    /// `probe` without browser support
    #[cfg(not(feature = "browser"))]
    pub async fn probe(&self, _args: &ProbeArgs) -> CliResult<()> {
        Err(browser_missing())
    }

    /// `api`: fail when any endpoint answers 5xx or not at all
    #[cfg(feature = "api")]
    pub async fn api(&self, args: &ApiArgs) -> CliResult<()> {
        use axis6_e2e::ApiProbe;

        let mut probe = ApiProbe::new(&self.suite)?;
        if !args.endpoints.is_empty() {
            probe = probe.with_endpoints(args.endpoints.iter().cloned());
        }
        self.progress
            .header(&format!("API liveness of {}", self.suite.base_url));

        let statuses = probe.check_all().await;
        for status in &statuses {
            self.progress.api_status(status);
        }
        let failing = statuses.iter().filter(|s| !s.is_alive()).count();
        if failing > 0 {
            return Err(CliError::test_execution(format!(
                "{failing} of {} endpoints failing",
                statuses.len()
            )));
        }
        self.progress
            .success(&format!("{} endpoints alive", statuses.len()));
        Ok(())
    }

    /// `api` without HTTP support
    #[cfg(not(feature = "api"))]
    pub async fn api(&self, _args: &ApiArgs) -> CliResult<()> {
        Err(CliError::config(
            "API probing not enabled. Rebuild with --features api",
        ))
    }
}

#[cfg(not(feature = "browser"))]
fn browser_missing() -> CliError {
    CliError::config("Browser support not enabled. Rebuild with --features browser")
}
