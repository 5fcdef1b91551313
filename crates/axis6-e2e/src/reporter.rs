//! Reporter - Scenario Reporting with Andon Cord Support
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  FailureMode::AndonCord        FailureMode::CollectAll             │
//! │  stop the run on the first     run every scenario and report       │
//! │  failed scenario               all failures at the end             │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results render as a one-line summary, JUnit XML for CI, or JSON.

use crate::result::{HarnessError, HarnessResult};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Failure mode for a suite run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop on first failure
    AndonCord,
    /// Run everything and collect all failures
    #[default]
    CollectAll,
}

/// Scenario result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Body ran and every assertion held
    Passed,
    /// Body ran and an assertion, wait or browser call failed
    Failed,
    /// Not run (filtered out of a read-only run)
    Skipped,
    /// The fixture could not provide its resource; body never ran
    FixtureFailed,
}

impl ScenarioStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status counts as a failure
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed | Self::FixtureFailed)
    }
}

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Status
    pub status: ScenarioStatus,
    /// Wall-clock time
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Error message for failures, reason for skips
    pub error: Option<String>,
    /// Failure screenshot, if one was captured
    pub screenshot: Option<PathBuf>,
}

impl ScenarioResult {
    /// Create a passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Passed,
            duration,
            error: None,
            screenshot: None,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Failed,
            duration,
            error: Some(error.into()),
            screenshot: None,
        }
    }

    /// Create a fixture failure
    #[must_use]
    pub fn fixture_failed(
        name: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            status: ScenarioStatus::FixtureFailed,
            ..Self::failed(name, duration, error)
        }
    }

    /// Create a skipped result
    #[must_use]
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Skipped,
            duration: Duration::ZERO,
            error: Some(reason.into()),
            screenshot: None,
        }
    }

    /// Attach a failure screenshot
    #[must_use]
    pub fn with_screenshot(mut self, path: PathBuf) -> Self {
        self.screenshot = Some(path);
        self
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    suite: &'a str,
    started_at: Option<DateTime<Utc>>,
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    duration_ms: u128,
    results: &'a [ScenarioResult],
}

/// Scenario reporter with Andon Cord support
#[derive(Debug, Default)]
pub struct Reporter {
    results: Vec<ScenarioResult>,
    failure_mode: FailureMode,
    suite_name: String,
    started_at: Option<DateTime<Utc>>,
}

impl Reporter {
    /// Create new reporter (CollectAll mode)
    #[must_use]
    pub fn new() -> Self {
        Self {
            suite_name: "axis6-e2e".to_string(),
            ..Default::default()
        }
    }

    /// Create reporter for a failure mode
    #[must_use]
    pub fn with_mode(mode: FailureMode) -> Self {
        Self {
            failure_mode: mode,
            ..Self::new()
        }
    }

    /// Set suite name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Failure mode in effect
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Mark the start of the run
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    /// Record a scenario result
    ///
    /// # Errors
    ///
    /// In AndonCord mode, returns error if the scenario failed
    pub fn record(&mut self, result: ScenarioResult) -> HarnessResult<()> {
        let failure = result
            .status
            .is_failed()
            .then(|| (result.name.clone(), result.error.clone().unwrap_or_default()));

        self.results.push(result);

        if self.failure_mode == FailureMode::AndonCord {
            if let Some((name, error)) = failure {
                return Err(HarnessError::assertion(format!(
                    "ANDON CORD PULLED: scenario '{name}' failed: {error}"
                )));
            }
        }
        Ok(())
    }

    /// Get number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Get number of failed scenarios, fixture failures included
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Get number of skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Pass rate over scenarios that ran (0.0 to 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let ran = self.total_count() - self.skipped_count();
        if ran == 0 {
            return 1.0;
        }
        self.passed_count() as f64 / ran as f64
    }

    /// Check if no scenario failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get total duration
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// Get scenario results
    #[must_use]
    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    /// Get failing scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed, {} failed, {} skipped ({:.1}%)",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.pass_rate() * 100.0
        )
    }

    /// Generate JUnit XML for CI integration
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn generate_junit(&self, output_path: &Path) -> HarnessResult<()> {
        write_report(output_path, &self.render_junit())
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="{}" tests="{}" failures="{}" errors="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.suite_name),
            self.total_count(),
            self.count(ScenarioStatus::Failed),
            self.count(ScenarioStatus::FixtureFailed),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        ));
        xml.push('\n');

        for result in &self.results {
            xml.push_str(&format!(
                r#"  <testcase name="{}" time="{:.3}">"#,
                escape_xml(&result.name),
                result.duration.as_secs_f64()
            ));
            xml.push('\n');

            let message = result.error.as_deref().unwrap_or_default();
            match result.status {
                ScenarioStatus::Passed => {}
                ScenarioStatus::Failed => xml.push_str(&format!(
                    "    <failure message=\"{0}\">{0}</failure>\n",
                    escape_xml(message)
                )),
                ScenarioStatus::FixtureFailed => xml.push_str(&format!(
                    "    <error type=\"fixture\" message=\"{0}\">{0}</error>\n",
                    escape_xml(message)
                )),
                ScenarioStatus::Skipped => xml.push_str(&format!(
                    "    <skipped message=\"{}\"/>\n",
                    escape_xml(message)
                )),
            }
            if let Some(path) = &result.screenshot {
                xml.push_str(&format!(
                    "    <system-out>[[ATTACHMENT|{}]]</system-out>\n",
                    escape_xml(&path.display().to_string())
                ));
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Render the JSON report
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn render_json(&self) -> HarnessResult<String> {
        let report = JsonReport {
            suite: &self.suite_name,
            started_at: self.started_at,
            total: self.total_count(),
            passed: self.passed_count(),
            failed: self.failed_count(),
            skipped: self.skipped_count(),
            duration_ms: self.total_duration().as_millis(),
            results: &self.results,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Write the JSON report
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn generate_json(&self, output_path: &Path) -> HarnessResult<()> {
        write_report(output_path, &self.render_json()?)
    }
}

/// Write a report, creating its parent directory
pub(crate) fn write_report(path: &Path, content: &str) -> HarnessResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    mod failure_mode_tests {
        use super::*;

        #[test]
        fn test_default_collects_all() {
            let mut r = Reporter::new();
            assert_eq!(r.failure_mode(), FailureMode::CollectAll);
            r.record(ScenarioResult::failed("a", ms(1), "x")).unwrap();
            r.record(ScenarioResult::passed("b", ms(1))).unwrap();
            assert_eq!(r.failed_count(), 1);
            assert_eq!(r.total_count(), 2);
        }

        #[test]
        fn test_andon_cord_pulls_on_failure() {
            let mut r = Reporter::with_mode(FailureMode::AndonCord);
            r.record(ScenarioResult::passed("a", ms(1))).unwrap();
            let err = r
                .record(ScenarioResult::fixture_failed("b", ms(1), "login rejected"))
                .unwrap_err();
            assert!(err.to_string().contains("ANDON CORD PULLED"));
            assert!(err.to_string().contains("login rejected"));
            assert_eq!(r.total_count(), 2);
        }

        #[test]
        fn test_skips_do_not_pull_the_cord() {
            let mut r = Reporter::with_mode(FailureMode::AndonCord);
            r.record(ScenarioResult::skipped("a", "read-only run")).unwrap();
            assert!(r.all_passed());
        }
    }

    mod counting_tests {
        use super::*;

        #[test]
        fn test_summary_and_rate() {
            let mut r = Reporter::new().with_name("regression");
            r.record(ScenarioResult::passed("a", ms(10))).unwrap();
            r.record(ScenarioResult::passed("b", ms(10))).unwrap();
            r.record(ScenarioResult::failed("c", ms(10), "boom")).unwrap();
            r.record(ScenarioResult::fixture_failed("d", ms(10), "no session")).unwrap();
            r.record(ScenarioResult::skipped("e", "read-only")).unwrap();

            assert_eq!(r.passed_count(), 2);
            assert_eq!(r.failed_count(), 2);
            assert_eq!(r.skipped_count(), 1);
            assert!((r.pass_rate() - 0.5).abs() < f64::EPSILON);
            assert_eq!(r.summary(), "regression: 2/5 passed, 2 failed, 1 skipped (50.0%)");
            assert_eq!(r.failures().len(), 2);
            assert_eq!(r.total_duration(), ms(40));
        }

        #[test]
        fn test_empty_rate_is_one() {
            assert!((Reporter::new().pass_rate() - 1.0).abs() < f64::EPSILON);
        }
    }

    mod render_tests {
        use super::*;

        fn mixed() -> Reporter {
            let mut r = Reporter::new();
            r.record(ScenarioResult::passed("landing_renders_hero", ms(1200))).unwrap();
            r.record(
                ScenarioResult::failed("dashboard_shows_hexagon", ms(500), "Expected count 6 but got <5>")
                    .with_screenshot(PathBuf::from("shots/failure-dashboard-shows-hexagon.png")),
            )
            .unwrap();
            r.record(ScenarioResult::fixture_failed("profile_shows_user", ms(30), "rejected")).unwrap();
            r.record(ScenarioResult::skipped("register_new_user_reaches_app", "read-only run")).unwrap();
            r
        }

        #[test]
        fn test_junit_shape() {
            let xml = mixed().render_junit();
            assert!(xml.starts_with("<?xml"));
            assert!(xml.contains(r#"tests="4" failures="1" errors="1" skipped="1""#));
            assert!(xml.contains("&lt;5&gt;"));
            assert!(xml.contains(r#"<error type="fixture" message="rejected">"#));
            assert!(xml.contains(r#"<skipped message="read-only run"/>"#));
            assert!(xml.contains("[[ATTACHMENT|shots/failure-dashboard-shows-hexagon.png]]"));
        }

        #[test]
        fn test_json_shape() {
            let json: serde_json::Value = serde_json::from_str(&mixed().render_json().unwrap()).unwrap();
            assert_eq!(json["total"], 4);
            assert_eq!(json["failed"], 2);
            assert_eq!(json["results"][0]["status"], "passed");
            assert_eq!(json["results"][0]["duration_ms"], 1200);
            assert_eq!(json["results"][2]["status"], "fixture_failed");
        }

        #[test]
        fn test_generate_files() {
            let tmp = tempfile::tempdir().unwrap();
            let r = mixed();
            let junit = tmp.path().join("reports").join("junit.xml");
            let json = tmp.path().join("reports").join("results.json");
            r.generate_junit(&junit).unwrap();
            r.generate_json(&json).unwrap();
            assert!(std::fs::read_to_string(junit).unwrap().contains("<testsuite"));
            assert!(std::fs::read_to_string(json).unwrap().contains("\"suite\""));
        }

        #[test]
        fn test_escape_xml() {
            assert_eq!(escape_xml(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
        }
    }
}
