//! `/auth/register`: account creation.

use super::{PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::locator::{Locator, Selector};
use crate::result::HarnessResult;
use crate::user::TestUser;
use tracing::debug;

/// Registration page
#[derive(Debug, Clone)]
pub struct RegisterPage {
    timeouts: PageTimeouts,
}

impl RegisterPage {
    /// Create the page object
    #[must_use]
    pub const fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
        }
    }

    /// Display-name input
    #[must_use]
    pub fn name_input(&self) -> Locator {
        self.timeouts.locate(Selector::css("input[name=name]"))
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

    /// Error banner
    #[must_use]
    pub fn error_message(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("register-error"))
    }

    /// Fill the form for `user` and submit
    pub async fn register(&self, driver: &dyn PageDriver, user: &TestUser) -> HarnessResult<()> {
        debug!(email = %user.email, "register");
        self.name_input().fill(driver, &user.display_name).await?;
        self.email_input().fill(driver, &user.email).await?;
        self.password_input().fill(driver, &user.password).await?;
        self.submit().click(driver).await
    }
}

impl PageObject for RegisterPage {
    fn path(&self) -> &str {
        "/auth/register"
    }

    fn page_name(&self) -> &'static str {
        "register"
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        vec![
            self.name_input(),
            self.email_input(),
            self.password_input(),
            self.submit(),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing::{fast_config, site};

    #[tokio::test]
    async fn test_register_fills_every_field() {
        let cfg = fast_config();
        let driver = site();
        let page = RegisterPage::new(&cfg);
        page.goto(&driver, &cfg).await.unwrap();

        let user = TestUser::generate("reg");
        page.register(&driver, &user).await.unwrap();

        assert!(driver.was_called("fill:input[name=name]"));
        assert!(driver.was_called("fill:input[type=password]"));
        assert!(driver.is_authenticated());
        assert!(driver.current_url().await.unwrap().ends_with("/dashboard"));
    }
}
