//! Output formatting and progress reporting

use axis6_e2e::{ApiStatus, Observation, Presence, ScenarioResult, ScenarioStatus};
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for suite execution; writes to stderr
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write_line(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(|| {
                let _ = self.term.write_line(line);
            }),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    fn prefixed(&self, symbol: &str, plain: &str, color: Style, message: &str) -> String {
        let prefix = if self.use_color {
            color.bold().apply_to(symbol).to_string()
        } else {
            plain.to_string()
        };
        format!("{prefix} {message}")
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write_line(&self.prefixed("✓", "PASS", Style::new().green(), message));
    }

    /// Print a failure message (also in quiet mode)
    pub fn failure(&self, message: &str) {
        self.write_line(&self.prefixed("✗", "FAIL", Style::new().red(), message));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write_line(&self.prefixed("⚠", "WARN", Style::new().yellow(), message));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write_line(&self.prefixed("ℹ", "INFO", Style::new().blue(), message));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.write_line("");
        self.write_line(&styled);
    }

    /// Print one finished scenario
    pub fn scenario(&self, result: &ScenarioResult) {
        let line = scenario_line(result);
        match result.status {
            ScenarioStatus::Passed => self.success(&line),
            ScenarioStatus::Skipped => self.warning(&line),
            ScenarioStatus::Failed | ScenarioStatus::FixtureFailed => self.failure(&line),
        }
    }

    /// Print one probe observation
    pub fn observation(&self, observation: &Observation) {
        let line = observation_line(observation);
        match observation.presence {
            Presence::Present => self.success(&line),
            Presence::Absent => self.warning(&line),
        }
    }

    /// Print one API status
    pub fn api_status(&self, status: &ApiStatus) {
        if status.is_alive() {
            self.success(&status.to_string());
        } else {
            self.failure(&status.to_string());
        }
    }

    /// Print suite summary
    pub fn summary(&self, passed: usize, failed: usize, skipped: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        self.write_line("");

        let total = passed + failed + skipped;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            self.write_line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            self.write_line(&summary_line(passed, failed, skipped, duration));
        }
    }
}

/// Plain one-line description of a scenario result
#[must_use]
pub fn scenario_line(result: &ScenarioResult) -> String {
    let ms = result.duration.as_millis();
    let mut line = match result.status {
        ScenarioStatus::Skipped => format!("{} (skipped)", result.name),
        ScenarioStatus::FixtureFailed => format!("{} ({ms}ms, fixture failed)", result.name),
        _ => format!("{} ({ms}ms)", result.name),
    };
    if let Some(ref error) = result.error {
        line.push_str(": ");
        line.push_str(error);
    }
    if let Some(ref path) = result.screenshot {
        line.push_str(&format!(" [screenshot {}]", path.display()));
    }
    line
}

/// Plain one-line description of a probe observation
#[must_use]
pub fn observation_line(observation: &Observation) -> String {
    let state = match observation.presence {
        Presence::Present => "present",
        Presence::Absent => "absent",
    };
    let mut line = format!(
        "{} on {}: {state} ({})",
        observation.check, observation.path, observation.selector
    );
    if let Some(ref note) = observation.note {
        line.push_str(&format!(" - {note}"));
    }
    line
}

/// Uncolored summary line
#[must_use]
pub fn summary_line(passed: usize, failed: usize, skipped: usize, duration: Duration) -> String {
    let total = passed + failed + skipped;
    let status = if failed > 0 { "FAILED" } else { "PASSED" };
    format!(
        "{status} {total} scenarios in {:.2}s ({passed} passed, {failed} failed, {skipped} skipped)",
        duration.as_secs_f64()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    mod line_tests {
        use super::*;

        #[test]
        fn test_scenario_lines() {
            let passed = ScenarioResult::passed("landing_renders_hero", Duration::from_millis(812));
            assert_eq!(scenario_line(&passed), "landing_renders_hero (812ms)");

            let failed = ScenarioResult::failed(
                "dashboard_shows_hexagon",
                Duration::from_millis(5_000),
                "Assertion failed: expected 6 elements, found 4",
            )
            .with_screenshot(PathBuf::from("shots/failure-dashboard-shows-hexagon.png"));
            assert_eq!(
                scenario_line(&failed),
                "dashboard_shows_hexagon (5000ms): Assertion failed: expected 6 elements, found 4 \
                 [screenshot shots/failure-dashboard-shows-hexagon.png]"
            );

            let skipped = ScenarioResult::skipped("register_new_user_reaches_app", "read-only");
            assert!(scenario_line(&skipped).starts_with("register_new_user_reaches_app (skipped)"));
        }

        #[test]
        fn test_observation_line() {
            let observation = Observation {
                check: "profile avatar".to_string(),
                path: "/profile".to_string(),
                selector: "[data-testid=\"profile-avatar\"]".to_string(),
                presence: Presence::Absent,
                note: None,
            };
            assert_eq!(
                observation_line(&observation),
                "profile avatar on /profile: absent ([data-testid=\"profile-avatar\"])"
            );
        }

        #[test]
        fn test_summary_line() {
            assert_eq!(
                summary_line(18, 2, 1, Duration::from_millis(41_250)),
                "FAILED 21 scenarios in 41.25s (18 passed, 2 failed, 1 skipped)"
            );
            assert!(summary_line(3, 0, 0, Duration::ZERO).starts_with("PASSED 3 scenarios"));
        }
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_progress_bar() {
            let mut reporter = ProgressReporter::new(false, false);
            reporter.start_progress(3, "running");
            reporter.set_message("landing_renders_hero");
            reporter.scenario(&ScenarioResult::passed("landing_renders_hero", Duration::ZERO));
            reporter.increment(1);
            reporter.finish();
        }

        #[test]
        fn test_quiet_mode_skips_progress() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(10, "running");
            assert!(reporter.progress_bar.is_none());
            reporter.success("hidden");
            reporter.failure("shown");
            reporter.api_status(&ApiStatus::responded("/api/health", 503));
        }
    }
}
