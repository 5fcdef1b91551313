//! Site health probe.
//!
//! Observational checks for features that may or may not be deployed. Each
//! check is recorded as an [`Observation`] that is either present or absent
//! and logged as one line; an absent element never fails the probe. The
//! regression suite never contains checks like these.

use crate::config::SuiteConfig;
use crate::driver::{DriverFactory, PageDriver};
use crate::fixture::{AuthFixture, Fixture};
use crate::locator::Locator;
use crate::pages::{ChatPage, DashboardPage, LandingPage, MyDayPage, ProfilePage, SettingsPage};
use crate::reporter::write_report;
use crate::result::{HarnessError, HarnessResult};
use crate::url::path_of;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// One soft check
#[derive(Debug, Clone)]
pub struct ProbeCheck {
    /// Check name
    pub name: String,
    /// Route to visit
    pub path: String,
    /// Element looked for
    pub locator: Locator,
    /// Whether the route needs a signed-in session
    pub requires_auth: bool,
}

impl ProbeCheck {
    /// Check on a public route
    #[must_use]
    pub fn public(name: impl Into<String>, path: impl Into<String>, locator: Locator) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            locator,
            requires_auth: false,
        }
    }

    /// Check on a signed-in route
    #[must_use]
    pub fn authenticated(
        name: impl Into<String>,
        path: impl Into<String>,
        locator: Locator,
    ) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(name, path, locator)
        }
    }
}

/// Ordered list of soft checks
#[derive(Debug, Clone, Default)]
pub struct ProbePlan {
    checks: Vec<ProbeCheck>,
}

impl ProbePlan {
    /// Empty plan
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check
    #[must_use]
    pub fn with_check(mut self, check: ProbeCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Checks in plan order
    #[must_use]
    pub fn checks(&self) -> &[ProbeCheck] {
        &self.checks
    }

    /// Optional AXIS6 features worth tracking
    #[must_use]
    pub fn axis6_default() -> Self {
        let cfg = SuiteConfig::default();
        let landing = LandingPage::new(&cfg);
        let dashboard = DashboardPage::new(&cfg);
        Self::new()
            .with_check(ProbeCheck::public("landing features", "/", landing.features_section()))
            .with_check(ProbeCheck::public("landing testimonials", "/", landing.testimonials()))
            .with_check(ProbeCheck::authenticated(
                "dashboard streak counter",
                "/dashboard",
                dashboard.streak_counter(),
            ))
            .with_check(ProbeCheck::authenticated(
                "dashboard quick check-in",
                "/dashboard",
                dashboard.quick_checkin(),
            ))
            .with_check(ProbeCheck::authenticated(
                "my day time blocks",
                "/my-day",
                MyDayPage::new(&cfg).time_block_list(),
            ))
            .with_check(ProbeCheck::authenticated(
                "analytics chart",
                "/analytics",
                Locator::test_id("analytics-chart"),
            ))
            .with_check(ProbeCheck::authenticated(
                "achievement grid",
                "/achievements",
                Locator::test_id("achievement-grid"),
            ))
            .with_check(ProbeCheck::authenticated(
                "chat conversations",
                "/chat",
                ChatPage::new(&cfg).conversation_list(),
            ))
            .with_check(ProbeCheck::authenticated(
                "profile avatar",
                "/profile",
                ProfilePage::new(&cfg).avatar(),
            ))
            .with_check(ProbeCheck::authenticated(
                "settings theme toggle",
                "/settings",
                SettingsPage::new(&cfg).theme_toggle(),
            ))
    }
}

/// Whether a probed element was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Visible within the element timeout
    Present,
    /// Not visible, or the route could not be reached
    Absent,
}

/// Outcome of one probe check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Check name
    pub check: String,
    /// Route visited
    pub path: String,
    /// Selector looked for
    pub selector: String,
    /// Result
    pub presence: Presence,
    /// Why the element could not be looked for, if it could not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Observation {
    fn log(self) -> Self {
        info!(
            check = %self.check,
            path = %self.path,
            selector = %self.selector,
            present = self.presence == Presence::Present,
            note = self.note.as_deref().unwrap_or(""),
            "probe observation"
        );
        self
    }
}

/// Every observation of one probe run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Site probed
    pub base_url: String,
    /// Public checks, then signed-in checks, each group in plan order
    pub observations: Vec<Observation>,
}

impl ProbeReport {
    /// Number of present elements
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.count(Presence::Present)
    }

    /// Number of absent elements
    #[must_use]
    pub fn absent_count(&self) -> usize {
        self.count(Presence::Absent)
    }

    fn count(&self, presence: Presence) -> usize {
        self.observations
            .iter()
            .filter(|o| o.presence == presence)
            .count()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "probe {}: {} present, {} absent",
            self.base_url,
            self.present_count(),
            self.absent_count()
        )
    }

    /// Pretty JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to a file
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn write_json(&self, path: &Path) -> HarnessResult<()> {
        write_report(path, &self.to_json()?)
    }
}

/// Runs a [`ProbePlan`] on a single page
#[derive(Debug, Clone)]
pub struct SiteProbe {
    config: SuiteConfig,
}

impl SiteProbe {
    /// Probe the configured site
    #[must_use]
    pub const fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    /// Visit every check's route and record what is there.
    ///
    /// Public checks run first. Signed-in checks run after the auth fixture;
    /// if it fails they are all recorded absent with the fixture error.
    ///
    /// # Errors
    ///
    /// Only when no page can be opened; absent elements and unreachable
    /// routes are observations, not errors.
    pub async fn run(
        &self,
        factory: &dyn DriverFactory,
        plan: &ProbePlan,
    ) -> HarnessResult<ProbeReport> {
        let driver = factory.new_page().await?;
        let mut observations = Vec::with_capacity(plan.checks().len());

        for check in plan.checks().iter().filter(|c| !c.requires_auth) {
            observations.push(self.observe(driver.as_ref(), check).await.log());
        }

        let signed_in: Vec<&ProbeCheck> = plan.checks().iter().filter(|c| c.requires_auth).collect();
        if !signed_in.is_empty() {
            match AuthFixture::from_config(&self.config)
                .setup(driver.as_ref(), &self.config)
                .await
            {
                Ok(_) => {
                    for check in signed_in {
                        observations.push(self.observe(driver.as_ref(), check).await.log());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "probe could not sign in");
                    for check in signed_in {
                        observations.push(absent(check, Some(e.to_string())).log());
                    }
                }
            }
        }

        if let Err(e) = driver.close().await {
            warn!(error = %e, "closing probe page failed");
        }

        Ok(ProbeReport {
            base_url: self.config.base_url.clone(),
            observations,
        })
    }

    async fn observe(&self, driver: &dyn PageDriver, check: &ProbeCheck) -> Observation {
        match self.look(driver, check).await {
            Ok(true) => Observation {
                presence: Presence::Present,
                ..absent(check, None)
            },
            Ok(false) => absent(check, None),
            Err(e) => absent(check, Some(e.to_string())),
        }
    }

    async fn look(&self, driver: &dyn PageDriver, check: &ProbeCheck) -> HarnessResult<bool> {
        let current = driver.current_url().await?;
        if path_of(&current) != check.path {
            driver.navigate(&self.config.url(&check.path)).await?;
        }
        let locator = check
            .locator
            .clone()
            .with_timeout(self.config.element_timeout())
            .with_poll_interval(self.config.poll_interval());
        match locator.wait_for_visible(driver).await {
            Ok(()) => Ok(true),
            Err(HarnessError::Timeout { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn absent(check: &ProbeCheck, note: Option<String>) -> Observation {
    Observation {
        check: check.name.clone(),
        path: check.path.clone(),
        selector: check.locator.selector().to_string(),
        presence: Presence::Absent,
        note,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockDriverFactory};
    use crate::testing::{fast_config, known_user, site};

    fn present_names(report: &ProbeReport) -> Vec<&str> {
        report
            .observations
            .iter()
            .filter(|o| o.presence == Presence::Present)
            .map(|o| o.check.as_str())
            .collect()
    }

    #[test]
    fn test_default_plan_covers_optional_features() {
        let plan = ProbePlan::axis6_default();
        assert_eq!(plan.checks().len(), 10);
        assert_eq!(plan.checks().iter().filter(|c| !c.requires_auth).count(), 2);
        assert!(plan.checks().iter().any(|c| c.path == "/achievements"));
    }

    #[tokio::test]
    async fn test_probe_records_every_check() {
        let cfg = fast_config().with_test_account(known_user());
        let factory = MockDriverFactory::new(site());
        let report = SiteProbe::new(cfg)
            .run(&factory, &ProbePlan::axis6_default())
            .await
            .unwrap();

        assert_eq!(report.observations.len(), 10);
        assert_eq!(report.present_count() + report.absent_count(), 10);
        assert_eq!(
            present_names(&report),
            vec![
                "landing features",
                "dashboard streak counter",
                "my day time blocks",
                "chat conversations",
                "settings theme toggle",
            ]
        );
        assert!(report.observations.iter().all(|o| o.note.is_none()));
    }

    #[tokio::test]
    async fn test_failed_sign_in_marks_private_checks_absent() {
        let mut user = known_user();
        user.password = user.wrong_password();
        let cfg = fast_config().with_test_account(user);
        let factory = MockDriverFactory::new(site());
        let report = SiteProbe::new(cfg)
            .run(&factory, &ProbePlan::axis6_default())
            .await
            .unwrap();

        assert_eq!(present_names(&report), vec!["landing features"]);
        let private: Vec<&Observation> = report
            .observations
            .iter()
            .filter(|o| o.path != "/")
            .collect();
        assert_eq!(private.len(), 8);
        assert!(private
            .iter()
            .all(|o| o.note.as_deref().is_some_and(|n| n.contains("rejected"))));
    }

    #[tokio::test]
    async fn test_public_observations_come_first() {
        let plan = ProbePlan::new()
            .with_check(ProbeCheck::authenticated(
                "streak",
                "/dashboard",
                Locator::test_id("streak-counter"),
            ))
            .with_check(ProbeCheck::public("hero", "/", Locator::test_id("hero-heading")))
            .with_check(ProbeCheck::authenticated(
                "avatar",
                "/profile",
                Locator::test_id("profile-avatar"),
            ));
        let cfg = fast_config().with_test_account(known_user());
        let report = SiteProbe::new(cfg)
            .run(&MockDriverFactory::new(site()), &plan)
            .await
            .unwrap();
        let order: Vec<&str> = report.observations.iter().map(|o| o.check.as_str()).collect();
        assert_eq!(order, vec!["hero", "streak", "avatar"]);
    }

    #[tokio::test]
    async fn test_report_json() {
        let factory = MockDriverFactory::new(MockDriver::new());
        let plan = ProbePlan::new().with_check(ProbeCheck::public(
            "hero",
            "/",
            Locator::test_id("hero-heading"),
        ));
        let report = SiteProbe::new(fast_config()).run(&factory, &plan).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["observations"][0]["presence"], "absent");
        assert_eq!(json["observations"][0]["selector"], "[data-testid=\"hero-heading\"]");
        assert_eq!(report.summary(), "probe http://localhost:3000: 0 present, 1 absent");

        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("probe.json");
        report.write_json(&out).unwrap();
        assert!(out.exists());
    }
}
