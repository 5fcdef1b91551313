//! Locator abstraction for element selection and interaction.
//!
//! A `Locator` is a lazily-resolved reference to elements on the current
//! page: nothing is queried until an action or assertion runs, and every
//! use re-evaluates the selector.
//!
//! Each locator carries exactly one `Selector`. There is no fallback chain;
//! a page that lacks the element fails the wait instead of silently matching
//! something else.

use crate::driver::PageDriver;
use crate::result::HarnessResult;
use crate::wait::{poll_until, WaitOptions};
use std::time::Duration;
use tracing::debug;

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for auto-waiting (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "input[type=email]")
    Css(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Any element whose own text contains the string
    Text(String),
    /// ARIA role with an accessible-name substring
    Role {
        /// Role name (button, link, heading, textbox, ...)
        role: String,
        /// Accessible name substring
        name: String,
    },
    /// Input placeholder text
    Placeholder(String),
    /// CSS selector narrowed by text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Create a placeholder selector
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder(text.into())
    }

    /// JavaScript expression evaluating to the array of matching elements
    #[must_use]
    pub fn to_all_query(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({s:?}))"),
            Self::TestId(id) => {
                let css = format!("[data-testid={id:?}]");
                format!("Array.from(document.querySelectorAll({css:?}))")
            }
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('body *')).filter(el => \
                 Array.from(el.childNodes).some(n => n.nodeType === 3 && n.textContent.includes({t:?})))"
            ),
            Self::Role { role, name } => {
                let css = role_css(role);
                format!(
                    "Array.from(document.querySelectorAll({css:?})).filter(el => \
                     ((el.getAttribute('aria-label') || el.innerText || el.value || '').trim()).includes({name:?}))"
                )
            }
            Self::Placeholder(p) => {
                let css = format!("[placeholder={p:?}]");
                format!("Array.from(document.querySelectorAll({css:?}))")
            }
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?}))"
            ),
        }
    }

    /// JavaScript expression evaluating to the first match or `undefined`
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("({})[0]", self.to_all_query())
    }

    /// JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("({}).length", self.to_all_query())
    }

    /// JavaScript expression: first match is rendered and takes up space
    #[must_use]
    pub fn to_visible_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; \
             const s = window.getComputedStyle(el); const r = el.getBoundingClientRect(); \
             return s.visibility !== 'hidden' && s.display !== 'none' && Number(s.opacity) > 0 \
             && r.width > 0 && r.height > 0; }})()",
            self.to_query()
        )
    }

    /// JavaScript expression: text of the first match, or null.
    ///
    /// Form fields yield their current value.
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return null; \
             if (['INPUT', 'TEXTAREA', 'SELECT'].includes(el.tagName)) return el.value; \
             return el.innerText ?? el.textContent; }})()",
            self.to_query()
        )
    }

    /// JavaScript expression clicking the first match; evaluates to false if none
    #[must_use]
    pub fn to_click_script(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; \
             el.scrollIntoView({{block: 'center'}}); el.click(); return true; }})()",
            self.to_query()
        )
    }

    /// JavaScript expression filling the first match.
    ///
    /// Uses the native value setter so framework-controlled inputs see the
    /// change, then dispatches `input` and `change`.
    #[must_use]
    pub fn to_fill_script(&self, value: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; el.focus(); \
             const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             const setter = Object.getOwnPropertyDescriptor(proto, 'value').set; \
             setter.call(el, {value:?}); \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); return true; }})()",
            self.to_query()
        )
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::TestId(id) => write!(f, "[data-testid=\"{id}\"]"),
            Self::Text(t) => write!(f, "text=\"{t}\""),
            Self::Role { role, name } => write!(f, "role={role}[name=\"{name}\"]"),
            Self::Placeholder(p) => write!(f, "[placeholder=\"{p}\"]"),
            Self::CssWithText { css, text } => write!(f, "{css}:has-text(\"{text}\")"),
        }
    }
}

fn role_css(role: &str) -> String {
    let implicit = match role {
        "button" => "button, input[type=submit], input[type=button]",
        "link" => "a[href]",
        "heading" => "h1, h2, h3, h4, h5, h6",
        "textbox" => "input:not([type]), input[type=text], input[type=email], input[type=password], textarea",
        "checkbox" => "input[type=checkbox]",
        "navigation" => "nav",
        "main" => "main",
        "dialog" => "dialog",
        _ => "",
    };
    if implicit.is_empty() {
        format!("[role=\"{role}\"]")
    } else {
        format!("[role=\"{role}\"], {implicit}")
    }
}

/// Locator options for customizing behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting
    pub timeout: Duration,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl LocatorOptions {
    /// As wait options
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.timeout.as_millis() as u64)
            .with_poll_interval(self.poll_interval.as_millis() as u64)
    }
}

/// A locator for finding and interacting with elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Locator for a `data-testid`
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::test_id(id))
    }

    /// Filter by text content.
    ///
    /// Text and role selectors already match on text or accessible name
    /// and are returned unchanged.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let selector = match self.selector {
            Selector::Css(css) => Selector::CssWithText {
                css,
                text: text.into(),
            },
            Selector::TestId(id) => Selector::CssWithText {
                css: format!("[data-testid=\"{id}\"]"),
                text: text.into(),
            },
            Selector::Placeholder(p) => Selector::CssWithText {
                css: format!("[placeholder={p:?}]"),
                text: text.into(),
            },
            Selector::CssWithText { css, .. } => Selector::CssWithText {
                css,
                text: text.into(),
            },
            unchanged @ (Selector::Text(_) | Selector::Role { .. }) => unchanged,
        };
        Self {
            selector,
            options: self.options,
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Number of elements currently matching
    pub async fn count(&self, driver: &dyn PageDriver) -> HarnessResult<usize> {
        driver.count(&self.selector).await
    }

    /// Whether the first match is currently visible
    pub async fn is_visible(&self, driver: &dyn PageDriver) -> HarnessResult<bool> {
        driver.is_visible(&self.selector).await
    }

    /// Text of the first match, if any
    pub async fn text(&self, driver: &dyn PageDriver) -> HarnessResult<Option<String>> {
        driver.text_content(&self.selector).await
    }

    /// Wait until the first match is visible
    pub async fn wait_for_visible(&self, driver: &dyn PageDriver) -> HarnessResult<()> {
        debug!(selector = %self.selector, "waiting for visible");
        poll_until(
            &self.options.wait_options(),
            &format!("{} to be visible", self.selector),
            || async { Ok(driver.is_visible(&self.selector).await?.then_some(())) },
        )
        .await
    }

    /// Wait until nothing matching is visible
    pub async fn wait_for_hidden(&self, driver: &dyn PageDriver) -> HarnessResult<()> {
        poll_until(
            &self.options.wait_options(),
            &format!("{} to be hidden", self.selector),
            || async { Ok((!driver.is_visible(&self.selector).await?).then_some(())) },
        )
        .await
    }

    /// Wait for the element, then click it
    pub async fn click(&self, driver: &dyn PageDriver) -> HarnessResult<()> {
        self.wait_for_visible(driver).await?;
        debug!(selector = %self.selector, "click");
        driver.click(&self.selector).await
    }

    /// Wait for the element, then fill it
    pub async fn fill(&self, driver: &dyn PageDriver, value: &str) -> HarnessResult<()> {
        self.wait_for_visible(driver).await?;
        debug!(selector = %self.selector, "fill");
        driver.fill(&self.selector, value).await
    }
}
