//! `/`: marketing landing page.

use super::{PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};

/// Landing page
#[derive(Debug, Clone)]
pub struct LandingPage {
    timeouts: PageTimeouts,
}

impl LandingPage {
    /// Create the page object
    #[must_use]
    pub const fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
        }
    }

    /// Hero heading
    #[must_use]
    pub fn hero_heading(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("hero-heading"))
    }

    /// Primary "get started" call to action
    #[must_use]
    pub fn get_started(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("get-started-cta"))
    }

    /// Header link to the login page
    #[must_use]
    pub fn login_link(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("login-link"))
    }

    /// Feature overview section
    #[must_use]
    pub fn features_section(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("features-section"))
    }

    /// Testimonials section
    #[must_use]
    pub fn testimonials(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("testimonials-section"))
    }
}

impl PageObject for LandingPage {
    fn path(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &'static str {
        "landing"
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        vec![self.hero_heading(), self.get_started()]
    }
}
