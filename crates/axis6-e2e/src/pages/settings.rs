//! `/settings` and its sections.

use super::{PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};

/// A settings subpage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsSection {
    /// `/settings/account`
    Account,
    /// `/settings/privacy`
    Privacy,
    /// `/settings/security`
    Security,
    /// `/settings/notifications`
    Notifications,
    /// `/settings/focus`
    Focus,
    /// `/settings/axis-customization`
    AxisCustomization,
}

impl SettingsSection {
    /// Every section, in navigation order
    pub const ALL: [Self; 6] = [
        Self::Account,
        Self::Privacy,
        Self::Security,
        Self::Notifications,
        Self::Focus,
        Self::AxisCustomization,
    ];

    /// Path segment
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Privacy => "privacy",
            Self::Security => "security",
            Self::Notifications => "notifications",
            Self::Focus => "focus",
            Self::AxisCustomization => "axis-customization",
        }
    }

    /// Route of the section
    #[must_use]
    pub fn path(self) -> String {
        format!("/settings/{}", self.slug())
    }
}

impl std::fmt::Display for SettingsSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Settings page, either the index or one section
#[derive(Debug, Clone)]
pub struct SettingsPage {
    timeouts: PageTimeouts,
    section: Option<SettingsSection>,
    path: String,
}

impl SettingsPage {
    /// The settings index
    #[must_use]
    pub fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
            section: None,
            path: "/settings".to_string(),
        }
    }

    /// One settings section
    #[must_use]
    pub fn at(config: &SuiteConfig, section: SettingsSection) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
            section: Some(section),
            path: section.path(),
        }
    }

    /// Section this page object targets, if any
    #[must_use]
    pub const fn current_section(&self) -> Option<SettingsSection> {
        self.section
    }

    /// Side navigation listing the sections
    #[must_use]
    pub fn navigation(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("settings-nav"))
    }

    /// Heading of a section
    #[must_use]
    pub fn section(&self, section: SettingsSection) -> Locator {
        self.timeouts
            .locate(Selector::test_id(format!("settings-{}-heading", section.slug())))
    }

    /// Light/dark theme toggle
    #[must_use]
    pub fn theme_toggle(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("theme-toggle"))
    }
}

impl PageObject for SettingsPage {
    fn path(&self) -> &str {
        &self.path
    }

    fn page_name(&self) -> &'static str {
        match self.section {
            None => "settings",
            Some(SettingsSection::Account) => "settings-account",
            Some(SettingsSection::Privacy) => "settings-privacy",
            Some(SettingsSection::Security) => "settings-security",
            Some(SettingsSection::Notifications) => "settings-notifications",
            Some(SettingsSection::Focus) => "settings-focus",
            Some(SettingsSection::AxisCustomization) => "settings-axis-customization",
        }
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        match self.section {
            None => vec![self.navigation()],
            Some(section) => vec![self.section(section)],
        }
    }
}
