//! `/dashboard`: the six-axis overview.

use super::{PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};

/// Number of life categories on the hexagon
pub const CATEGORY_COUNT: usize = 6;

/// Dashboard page
#[derive(Debug, Clone)]
pub struct DashboardPage {
    timeouts: PageTimeouts,
}

impl DashboardPage {
    /// Create the page object
    #[must_use]
    pub const fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
        }
    }

    /// Hexagon progress chart
    #[must_use]
    pub fn hexagon_chart(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("hexagon-chart"))
    }

    /// One card per category
    #[must_use]
    pub fn category_cards(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("category-card"))
    }

    /// Current streak counter
    #[must_use]
    pub fn streak_counter(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("streak-counter"))
    }

    /// Quick check-in button
    #[must_use]
    pub fn quick_checkin(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("quick-checkin-button"))
    }
}

impl PageObject for DashboardPage {
    fn path(&self) -> &str {
        "/dashboard"
    }

    fn page_name(&self) -> &'static str {
        "dashboard"
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        vec![self.hexagon_chart()]
    }
}
