//! Page objects for the AXIS6 routes.
//!
//! Each page exposes its elements as [`Locator`]s and bundles multi-step
//! interactions (`LoginPage::login`, `RegisterPage::register`) as composite
//! actions. Selectors prefer `data-testid` and there is exactly one per
//! element.

mod chat;
mod dashboard;
mod landing;
mod login;
mod my_day;
mod profile;
mod register;
mod settings;

pub use chat::ChatPage;
pub use dashboard::{DashboardPage, CATEGORY_COUNT};
pub use landing::LandingPage;
pub use login::{LoginOutcome, LoginPage};
pub use my_day::MyDayPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;
pub use settings::{SettingsPage, SettingsSection};

use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::expect::expect;
use crate::locator::{Locator, Selector};
use crate::result::{HarnessError, HarnessResult};
use crate::url::UrlPattern;
use crate::wait::{wait_for_url, WaitOptions};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Default page load timeout (30 seconds)
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 30_000;

/// Routes a signed-in user lands on
#[must_use]
pub fn authenticated_routes() -> [UrlPattern; 2] {
    [UrlPattern::path("/dashboard"), UrlPattern::path("/my-day")]
}

/// Timeouts shared by every locator a page hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTimeouts {
    /// Per-element auto-wait
    pub element: Duration,
    /// Page load (URL match and landmarks)
    pub load: Duration,
    /// Polling interval
    pub poll: Duration,
}

impl Default for PageTimeouts {
    fn default() -> Self {
        Self {
            element: Duration::from_millis(crate::locator::DEFAULT_TIMEOUT_MS),
            load: Duration::from_millis(DEFAULT_LOAD_TIMEOUT_MS),
            poll: Duration::from_millis(crate::locator::DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl PageTimeouts {
    /// Timeouts from the suite configuration
    #[must_use]
    pub const fn from_config(config: &SuiteConfig) -> Self {
        Self {
            element: config.element_timeout(),
            load: config.navigation_timeout(),
            poll: config.poll_interval(),
        }
    }

    /// Locator carrying these timeouts
    #[must_use]
    pub fn locate(&self, selector: Selector) -> Locator {
        Locator::from_selector(selector)
            .with_timeout(self.element)
            .with_poll_interval(self.poll)
    }

    /// Wait options bounded by the load timeout
    #[must_use]
    pub fn load_wait(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(duration_ms(self.load))
            .with_poll_interval(duration_ms(self.poll))
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// A page or route of the application under test
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Route, relative to the base URL
    fn path(&self) -> &str;

    /// Name for logs and screenshots
    fn page_name(&self) -> &'static str;

    /// Timeouts for this page's locators
    fn timeouts(&self) -> &PageTimeouts;

    /// Elements that must be visible once the page has loaded
    fn landmarks(&self) -> Vec<Locator>;

    /// Pattern matching the URL while this page is active
    fn url_pattern(&self) -> UrlPattern {
        UrlPattern::path(self.path())
    }

    /// Upper bound for `verify_loaded`
    fn load_timeout(&self) -> Duration {
        self.timeouts().load
    }

    /// Navigate to this page
    async fn goto(&self, driver: &dyn PageDriver, config: &SuiteConfig) -> HarnessResult<()> {
        let url = config.url(self.path());
        debug!(page = self.page_name(), %url, "goto");
        driver.navigate(&url).await
    }

    /// Assert the page is active and its landmarks are visible
    async fn verify_loaded(&self, driver: &dyn PageDriver) -> HarnessResult<()> {
        let pattern = self.url_pattern();
        let wait = self.timeouts().load_wait();
        if let Err(e) = wait_for_url(driver, std::slice::from_ref(&pattern), &wait).await {
            return Err(match e {
                HarnessError::Timeout { ms, .. } => {
                    let url = driver.current_url().await?;
                    HarnessError::assertion(format!(
                        "{} did not load within {ms}ms: expected {pattern}, on {url}",
                        self.page_name()
                    ))
                }
                other => other,
            });
        }
        for landmark in self.landmarks() {
            expect(landmark.with_timeout(self.load_timeout()))
                .to_be_visible()
                .check(driver)
                .await?;
        }
        debug!(page = self.page_name(), "loaded");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing::{fast_config, site};

    #[test]
    fn test_timeouts_from_config() {
        let cfg = SuiteConfig::default();
        let t = PageTimeouts::from_config(&cfg);
        assert_eq!(t, PageTimeouts::default());
        let loc = t.locate(Selector::test_id("x"));
        assert_eq!(loc.options().timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_verify_loaded_reports_wrong_page() {
        let cfg = fast_config();
        let driver = site();
        let dashboard = DashboardPage::new(&cfg);
        dashboard.goto(&driver, &cfg).await.unwrap();

        // unauthenticated: redirected to the login page
        let err = dashboard.verify_loaded(&driver).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("dashboard did not load"), "{msg}");
        assert!(msg.contains("/auth/login"), "{msg}");
    }

    #[tokio::test]
    async fn test_every_public_page_loads() {
        let cfg = fast_config();
        let driver = site();
        let landing = LandingPage::new(&cfg);
        landing.goto(&driver, &cfg).await.unwrap();
        landing.verify_loaded(&driver).await.unwrap();

        let login = LoginPage::new(&cfg);
        login.goto(&driver, &cfg).await.unwrap();
        login.verify_loaded(&driver).await.unwrap();

        let register = RegisterPage::new(&cfg);
        register.goto(&driver, &cfg).await.unwrap();
        register.verify_loaded(&driver).await.unwrap();
    }
}
