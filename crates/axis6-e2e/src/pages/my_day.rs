//! `/my-day`: daily time-block planner.

use super::{PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};

/// My Day planner page
#[derive(Debug, Clone)]
pub struct MyDayPage {
    timeouts: PageTimeouts,
}

impl MyDayPage {
    /// Create the page object
    #[must_use]
    pub const fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
        }
    }

    /// Planner container
    #[must_use]
    pub fn planner(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("day-planner"))
    }

    /// Scheduled time blocks
    #[must_use]
    pub fn time_blocks(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("time-block"))
    }

    /// List holding the time blocks
    #[must_use]
    pub fn time_block_list(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("time-block-list"))
    }

    /// Button opening the new-block dialog
    #[must_use]
    pub fn add_block_button(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("add-time-block"))
    }
}

impl PageObject for MyDayPage {
    fn path(&self) -> &str {
        "/my-day"
    }

    fn page_name(&self) -> &'static str {
        "my-day"
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        vec![self.planner()]
    }
}
