//! `/auth/login`: credential sign-in.

use super::{authenticated_routes, PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::locator::{Locator, Selector};
use crate::result::HarnessResult;
use crate::wait::{poll_until, WaitOptions};
use tracing::debug;

/// How a submitted login form resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Landed on an authenticated route
    SignedIn {
        /// Landing URL
        url: String,
    },
    /// Stayed on the login page with a visible error
    Rejected {
        /// Error text, if any
        message: Option<String>,
    },
}

/// Login page
#[derive(Debug, Clone)]
pub struct LoginPage {
    timeouts: PageTimeouts,
}

impl LoginPage {
    /// Create the page object
    #[must_use]
    pub const fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
        }
    }

    /// Email input
    #[must_use]
    pub fn email_input(&self) -> Locator {
        self.timeouts.locate(Selector::css("input[type=email]"))
    }

    /// Password input
    #[must_use]
    pub fn password_input(&self) -> Locator {
        self.timeouts.locate(Selector::css("input[type=password]"))
    }

    /// Submit button
    #[must_use]
    pub fn submit(&self) -> Locator {
        self.timeouts.locate(Selector::css("button[type=submit]"))
    }

    /// Error banner shown for rejected credentials
    #[must_use]
    pub fn error_message(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("login-error"))
    }

    /// Link to the registration page
    #[must_use]
    pub fn register_link(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("register-link"))
    }

    /// Fill both fields and submit
    pub async fn login(
        &self,
        driver: &dyn PageDriver,
        email: &str,
        password: &str,
    ) -> HarnessResult<()> {
        debug!(email, "login");
        self.email_input().fill(driver, email).await?;
        self.password_input().fill(driver, password).await?;
        self.submit().click(driver).await
    }

    /// Wait for a submitted form to land on an app route or show an error
    pub async fn await_outcome(
        &self,
        driver: &dyn PageDriver,
        wait: &WaitOptions,
    ) -> HarnessResult<LoginOutcome> {
        let routes = authenticated_routes();
        let login_route = self.url_pattern();
        let error = self.error_message();
        poll_until(wait, "login to land on an app route or show an error", || async {
            let url = driver.current_url().await?;
            if routes.iter().any(|r| r.matches(&url)) {
                return Ok(Some(LoginOutcome::SignedIn { url }));
            }
            if login_route.matches(&url) && error.is_visible(driver).await? {
                let message = error.text(driver).await?;
                return Ok(Some(LoginOutcome::Rejected { message }));
            }
            Ok(None)
        })
        .await
    }
}

impl PageObject for LoginPage {
    fn path(&self) -> &str {
        "/auth/login"
    }

    fn page_name(&self) -> &'static str {
        "login"
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        vec![self.email_input(), self.password_input(), self.submit()]
    }
}
