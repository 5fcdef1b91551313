//! `/profile`: account details of the signed-in user.

use super::{PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};

/// Profile page
#[derive(Debug, Clone)]
pub struct ProfilePage {
    timeouts: PageTimeouts,
}

impl ProfilePage {
    /// Create the page object
    #[must_use]
    pub const fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
        }
    }

    /// Profile form
    #[must_use]
    pub fn form(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("profile-form"))
    }

    /// Display name shown in the profile header
    #[must_use]
    pub fn display_name(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("profile-name"))
    }

    /// Email shown in the profile header
    #[must_use]
    pub fn email(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("profile-email"))
    }

    /// Avatar image
    #[must_use]
    pub fn avatar(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("profile-avatar"))
    }
}

impl PageObject for ProfilePage {
    fn path(&self) -> &str {
        "/profile"
    }

    fn page_name(&self) -> &'static str {
        "profile"
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        vec![self.form()]
    }
}
