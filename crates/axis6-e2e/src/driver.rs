//! PageDriver: the seam between scenarios and the browser.
//!
//! Page objects, fixtures and scenarios only talk to `dyn PageDriver`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Scenario → PageObject → Locator ──► dyn PageDriver          │
//! │                                       ├─ ChromiumDriver (CDP)│
//! │                                       └─ MockDriver (memory) │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `MockDriver` models a small site: pages keyed by path, elements keyed
//! by selector, click effects (navigate, sign in, reveal an element,
//! branch on a filled field) and auth-guarded path prefixes.

use crate::diagnostics::Diagnostics;
use crate::locator::Selector;
use crate::performance::NavigationTiming;
use crate::result::{HarnessError, HarnessResult};
use crate::url::{path_of, UrlPattern};
use crate::viewport::{DeviceProfile, LayoutMetrics};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Browser automation primitives used by the suite
#[async_trait]
pub trait PageDriver: Send + Sync + std::fmt::Debug {
    /// Navigate to an absolute URL and wait for the load event
    async fn navigate(&self, url: &str) -> HarnessResult<()>;

    /// Current page URL
    async fn current_url(&self) -> HarnessResult<String>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &Selector) -> HarnessResult<usize>;

    /// Whether the first match is rendered and visible
    async fn is_visible(&self, selector: &Selector) -> HarnessResult<bool>;

    /// Text of the first match
    async fn text_content(&self, selector: &Selector) -> HarnessResult<Option<String>>;

    /// Click the first match
    async fn click(&self, selector: &Selector) -> HarnessResult<()>;

    /// Replace the value of the first matching input
    async fn fill(&self, selector: &Selector, value: &str) -> HarnessResult<()>;

    /// Emulate a device viewport
    async fn set_viewport(&self, profile: &DeviceProfile) -> HarnessResult<()>;

    /// Viewport and content widths
    async fn layout_metrics(&self) -> HarnessResult<LayoutMetrics>;

    /// Page-load timings of the current document
    async fn navigation_timing(&self) -> HarnessResult<NavigationTiming>;

    /// Console and network errors captured so far
    async fn diagnostics(&self) -> HarnessResult<Diagnostics>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> HarnessResult<Vec<u8>>;

    /// Close the page
    async fn close(&self) -> HarnessResult<()>;
}

/// Hands out a fresh page per scenario
#[async_trait]
pub trait DriverFactory: Send + Sync + std::fmt::Debug {
    /// Open a new page
    async fn new_page(&self) -> HarnessResult<Box<dyn PageDriver>>;
}

// ============================================================================
// Mock driver
// ============================================================================

/// State of one element (or group of elements) on a mock page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Number of matches
    pub count: usize,
    /// Whether the first match is visible
    pub visible: bool,
    /// Text of the first match; the current value for form fields
    pub text: String,
    /// Form field: `fill` replaces what `text_content` reads
    pub input: bool,
}

impl MockElement {
    /// One visible element with text
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            count: 1,
            visible: true,
            text: text.into(),
            input: false,
        }
    }

    /// One visible form field holding `value`
    #[must_use]
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            count: 1,
            visible: true,
            text: value.into(),
            input: true,
        }
    }

    /// One element that is present but hidden
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            count: 1,
            visible: false,
            text: String::new(),
            input: false,
        }
    }

    /// `n` visible elements
    #[must_use]
    pub fn many(n: usize) -> Self {
        Self {
            count: n,
            visible: n > 0,
            text: String::new(),
            input: false,
        }
    }
}

/// What happens when an element on a mock page is clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// Go to a path on the same origin
    Navigate(String),
    /// Mark the session authenticated, then go to a path
    SignIn(String),
    /// Show an element on the current page
    Reveal(Selector, MockElement),
    /// Branch on the value last filled into `field`
    WhenFilled {
        /// Field to inspect
        field: Selector,
        /// Expected value
        equals: String,
        /// Effect when the value matches
        then: Box<ClickEffect>,
        /// Effect otherwise
        otherwise: Box<ClickEffect>,
    },
}

/// One page of the mock site
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    elements: HashMap<String, MockElement>,
    clicks: HashMap<String, ClickEffect>,
    diagnostics: Diagnostics,
    timing: NavigationTiming,
    min_content_width: u32,
    widens_viewport: bool,
}

impl MockPage {
    /// Empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element
    #[must_use]
    pub fn with_element(mut self, selector: Selector, element: MockElement) -> Self {
        let _ = self.elements.insert(selector.to_string(), element);
        self
    }

    /// Register a click effect for an element
    #[must_use]
    pub fn on_click(mut self, selector: Selector, effect: ClickEffect) -> Self {
        let _ = self.clicks.insert(selector.to_string(), effect);
        self
    }

    /// Captured diagnostics reported for this page
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Page-load timings reported for this page
    #[must_use]
    pub const fn with_timing(mut self, timing: NavigationTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Content never narrower than `px`, whatever the viewport
    #[must_use]
    pub const fn with_content_width(mut self, px: u32) -> Self {
        self.min_content_width = px;
        self
    }

    /// Report `innerWidth` as wide as the content, the way a mobile
    /// browser zooms out a page that overflows
    #[must_use]
    pub const fn widening_viewport(mut self) -> Self {
        self.widens_viewport = true;
        self
    }
}

#[derive(Debug, Clone)]
struct MockState {
    pages: HashMap<String, MockPage>,
    guards: Vec<(UrlPattern, String)>,
    /// Sign-in state of the browser context the page belongs to
    session: Arc<AtomicBool>,
    url: String,
    fields: HashMap<String, String>,
    revealed: HashMap<String, MockElement>,
    viewport: (u32, u32),
    screenshot: Vec<u8>,
    history: Vec<String>,
    closed: bool,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
            guards: Vec::new(),
            session: Arc::new(AtomicBool::new(false)),
            url: "about:blank".to_string(),
            fields: HashMap::new(),
            revealed: HashMap::new(),
            viewport: (1440, 900),
            screenshot: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
            history: Vec::new(),
            closed: false,
        }
    }
}

impl MockState {
    fn signed_in(&self) -> bool {
        self.session.load(Ordering::SeqCst)
    }

    fn page(&self) -> Option<&MockPage> {
        self.pages.get(path_of(&self.url))
    }

    fn element(&self, selector: &Selector) -> Option<MockElement> {
        let key = selector.to_string();
        self.revealed
            .get(&key)
            .or_else(|| self.page().and_then(|p| p.elements.get(&key)))
            .cloned()
    }

    fn go(&mut self, target: &str) {
        let mut path = path_of(target).to_string();
        if !self.signed_in() {
            if let Some((_, redirect)) = self.guards.iter().find(|(g, _)| g.matches(&path)) {
                path = redirect.clone();
            }
        }
        let origin = origin_of(target)
            .or_else(|| origin_of(&self.url))
            .unwrap_or_default()
            .to_string();
        self.url = format!("{origin}{path}");
        self.fields.clear();
        self.revealed.clear();
    }

    fn apply(&mut self, effect: &ClickEffect) {
        match effect {
            ClickEffect::Navigate(path) => self.go(path),
            ClickEffect::SignIn(path) => {
                self.session.store(true, Ordering::SeqCst);
                self.go(path);
            }
            ClickEffect::Reveal(selector, element) => {
                let _ = self.revealed.insert(selector.to_string(), element.clone());
            }
            ClickEffect::WhenFilled {
                field,
                equals,
                then,
                otherwise,
            } => {
                let matched = self
                    .fields
                    .get(&field.to_string())
                    .is_some_and(|v| v == equals);
                self.apply(if matched { then } else { otherwise });
            }
        }
    }
}

fn origin_of(url: &str) -> Option<&str> {
    let idx = url.find("://")?;
    let host_start = idx + 3;
    let end = url[host_start..]
        .find('/')
        .map_or(url.len(), |slash| host_start + slash);
    Some(&url[..end])
}

/// In-memory driver for unit tests
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl Clone for MockDriver {
    /// Deep copy in a browser context of its own
    fn clone(&self) -> Self {
        let mut state = self.state().clone();
        state.session = Arc::new(AtomicBool::new(state.signed_in()));
        Self {
            state: Mutex::new(state),
        }
    }
}

impl MockDriver {
    /// Create an empty mock site
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a page at `path`
    #[must_use]
    pub fn with_page(self, path: &str, page: MockPage) -> Self {
        let _ = self.state().pages.insert(path.to_string(), page);
        self
    }

    /// Redirect unauthenticated visits under `prefix` to `redirect`
    #[must_use]
    pub fn with_guard(self, prefix: &str, redirect: &str) -> Self {
        self.state()
            .guards
            .push((UrlPattern::path(prefix), redirect.to_string()));
        self
    }

    /// Bytes returned by `screenshot`
    #[must_use]
    pub fn with_screenshot(self, png: Vec<u8>) -> Self {
        self.state().screenshot = png;
        self
    }

    /// Call history for verification
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Check if a call was made (prefix match on the history entry)
    #[must_use]
    pub fn was_called(&self, call: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(call))
    }

    /// Value last filled into `selector` on the current page
    #[must_use]
    pub fn filled(&self, selector: &Selector) -> Option<String> {
        self.state().fields.get(&selector.to_string()).cloned()
    }

    /// Whether a sign-in click has happened in this page's context
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().signed_in()
    }

    /// A blank tab in the same browser context: sign-in carries over,
    /// page state does not
    #[must_use]
    pub fn new_tab(&self) -> Self {
        let template = self.state();
        let state = MockState {
            pages: template.pages.clone(),
            guards: template.guards.clone(),
            session: Arc::clone(&template.session),
            screenshot: template.screenshot.clone(),
            ..MockState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn ensure_open(state: &MockState) -> HarnessResult<()> {
        if state.closed {
            return Err(HarnessError::Page {
                message: "page is closed".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&self, url: &str) -> HarnessResult<()> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        state.history.push(format!("navigate:{url}"));
        state.go(url);
        Ok(())
    }

    async fn current_url(&self) -> HarnessResult<String> {
        Ok(self.state().url.clone())
    }

    async fn count(&self, selector: &Selector) -> HarnessResult<usize> {
        Ok(self.state().element(selector).map_or(0, |e| e.count))
    }

    async fn is_visible(&self, selector: &Selector) -> HarnessResult<bool> {
        Ok(self
            .state()
            .element(selector)
            .is_some_and(|e| e.count > 0 && e.visible))
    }

    async fn text_content(&self, selector: &Selector) -> HarnessResult<Option<String>> {
        let state = self.state();
        Ok(state
            .element(selector)
            .filter(|e| e.count > 0)
            .map(|e| match state.fields.get(&selector.to_string()) {
                Some(value) if e.input => value.clone(),
                _ => e.text,
            }))
    }

    async fn click(&self, selector: &Selector) -> HarnessResult<()> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        if state.element(selector).map_or(0, |e| e.count) == 0 {
            return Err(HarnessError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        state.history.push(format!("click:{selector}"));
        let effect = state
            .page()
            .and_then(|p| p.clicks.get(&selector.to_string()))
            .cloned();
        if let Some(effect) = effect {
            state.apply(&effect);
        }
        Ok(())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> HarnessResult<()> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        if state.element(selector).map_or(0, |e| e.count) == 0 {
            return Err(HarnessError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        state.history.push(format!("fill:{selector}"));
        let _ = state.fields.insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn set_viewport(&self, profile: &DeviceProfile) -> HarnessResult<()> {
        let mut state = self.state();
        state
            .history
            .push(format!("viewport:{}x{}", profile.width, profile.height));
        state.viewport = (profile.width, profile.height);
        Ok(())
    }

    async fn layout_metrics(&self) -> HarnessResult<LayoutMetrics> {
        let state = self.state();
        let min = state.page().map_or(0, |p| p.min_content_width);
        let content_width = state.viewport.0.max(min);
        let widens = state.page().is_some_and(|p| p.widens_viewport);
        Ok(LayoutMetrics {
            viewport_width: if widens { content_width } else { state.viewport.0 },
            content_width,
        })
    }

    async fn navigation_timing(&self) -> HarnessResult<NavigationTiming> {
        Ok(self.state().page().map(|p| p.timing).unwrap_or_default())
    }

    async fn diagnostics(&self) -> HarnessResult<Diagnostics> {
        Ok(self
            .state()
            .page()
            .map(|p| p.diagnostics.clone())
            .unwrap_or_default())
    }

    async fn screenshot(&self) -> HarnessResult<Vec<u8>> {
        let state = self.state();
        Self::ensure_open(&state)?;
        Ok(state.screenshot.clone())
    }

    async fn close(&self) -> HarnessResult<()> {
        let mut state = self.state();
        state.history.push("close".to_string());
        state.closed = true;
        Ok(())
    }
}

/// Factory serving the template mock site, one isolated context per page
#[derive(Debug, Clone, Default)]
pub struct MockDriverFactory {
    template: MockDriver,
    shared_context: bool,
}

impl MockDriverFactory {
    /// Serve copies of `template`
    #[must_use]
    pub const fn new(template: MockDriver) -> Self {
        Self {
            template,
            shared_context: false,
        }
    }

    /// Open every page as a tab of the template's context, so a sign-in
    /// on one page is visible on all later ones
    #[must_use]
    pub const fn with_shared_context(mut self) -> Self {
        self.shared_context = true;
        self
    }
}

#[async_trait]
impl DriverFactory for MockDriverFactory {
    async fn new_page(&self) -> HarnessResult<Box<dyn PageDriver>> {
        if self.shared_context {
            Ok(Box::new(self.template.new_tab()))
        } else {
            Ok(Box::new(self.template.clone()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::diagnostics::ConsoleEntry;

    fn login_site() -> MockDriver {
        let email = Selector::css("input[type=email]");
        let password = Selector::css("input[type=password]");
        let submit = Selector::css("button[type=submit]");
        let error = Selector::test_id("login-error");

        MockDriver::new()
            .with_page(
                "/auth/login",
                MockPage::new()
                    .with_element(email, MockElement::visible(""))
                    .with_element(password.clone(), MockElement::visible(""))
                    .with_element(submit.clone(), MockElement::visible("Sign in"))
                    .on_click(
                        submit,
                        ClickEffect::WhenFilled {
                            field: password,
                            equals: "right".into(),
                            then: Box::new(ClickEffect::SignIn("/dashboard".into())),
                            otherwise: Box::new(ClickEffect::Reveal(
                                error,
                                MockElement::visible("Invalid credentials"),
                            )),
                        },
                    ),
            )
            .with_page("/dashboard", MockPage::new())
            .with_guard("/dashboard", "/auth/login")
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_records_history() {
            let d = login_site();
            d.navigate("http://localhost:3000/auth/login").await.unwrap();
            assert_eq!(
                d.current_url().await.unwrap(),
                "http://localhost:3000/auth/login"
            );
            assert!(d.was_called("navigate:http://localhost:3000/auth/login"));
        }

        #[tokio::test]
        async fn test_guard_redirects_until_signed_in() {
            let d = login_site();
            d.navigate("http://localhost:3000/dashboard").await.unwrap();
            assert_eq!(
                d.current_url().await.unwrap(),
                "http://localhost:3000/auth/login"
            );
        }

        #[tokio::test]
        async fn test_unknown_page_is_empty() {
            let d = MockDriver::new();
            d.navigate("http://localhost:3000/nowhere").await.unwrap();
            assert_eq!(d.count(&Selector::css("body")).await.unwrap(), 0);
        }

        #[test]
        fn test_origin_of() {
            assert_eq!(origin_of("https://axis6.app/x/y"), Some("https://axis6.app"));
            assert_eq!(origin_of("http://localhost:3000"), Some("http://localhost:3000"));
            assert_eq!(origin_of("/relative"), None);
        }
    }

    mod interaction_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_branches_on_filled_value() {
            let d = login_site();
            d.navigate("http://localhost:3000/auth/login").await.unwrap();
            d.fill(&Selector::css("input[type=password]"), "wrong")
                .await
                .unwrap();
            d.click(&Selector::css("button[type=submit]")).await.unwrap();
            assert!(d.is_visible(&Selector::test_id("login-error")).await.unwrap());
            assert!(!d.is_authenticated());

            d.fill(&Selector::css("input[type=password]"), "right")
                .await
                .unwrap();
            d.click(&Selector::css("button[type=submit]")).await.unwrap();
            assert!(d.is_authenticated());
            assert_eq!(
                d.current_url().await.unwrap(),
                "http://localhost:3000/dashboard"
            );
        }

        #[tokio::test]
        async fn test_navigation_clears_fields() {
            let d = login_site();
            d.navigate("http://localhost:3000/auth/login").await.unwrap();
            let email = Selector::css("input[type=email]");
            d.fill(&email, "a@b.c").await.unwrap();
            assert_eq!(d.filled(&email).as_deref(), Some("a@b.c"));
            d.navigate("http://localhost:3000/auth/login").await.unwrap();
            assert_eq!(d.filled(&email), None);
        }

        #[tokio::test]
        async fn test_input_text_is_its_value() {
            let name = Selector::test_id("profile-name");
            let d = MockDriver::new().with_page(
                "/profile",
                MockPage::new().with_element(name.clone(), MockElement::input("AXIS6 Tester")),
            );
            d.navigate("http://localhost:3000/profile").await.unwrap();
            assert_eq!(d.text_content(&name).await.unwrap().as_deref(), Some("AXIS6 Tester"));
            d.fill(&name, "Renamed").await.unwrap();
            assert_eq!(d.text_content(&name).await.unwrap().as_deref(), Some("Renamed"));
        }

        #[tokio::test]
        async fn test_click_missing_element() {
            let d = login_site();
            d.navigate("http://localhost:3000/auth/login").await.unwrap();
            let err = d.click(&Selector::test_id("nope")).await.unwrap_err();
            assert!(matches!(err, HarnessError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_closed_page_rejects_calls() {
            let d = login_site();
            d.close().await.unwrap();
            assert!(d.navigate("http://localhost:3000/").await.is_err());
            assert!(d.screenshot().await.is_err());
        }
    }

    mod measurement_tests {
        use super::*;

        #[tokio::test]
        async fn test_layout_follows_viewport() {
            let d = MockDriver::new()
                .with_page("/", MockPage::new())
                .with_page("/wide", MockPage::new().with_content_width(900));
            d.set_viewport(&DeviceProfile::IPHONE_SE).await.unwrap();

            d.navigate("http://localhost:3000/").await.unwrap();
            let m = d.layout_metrics().await.unwrap();
            assert_eq!((m.viewport_width, m.content_width), (375, 375));

            d.navigate("http://localhost:3000/wide").await.unwrap();
            assert_eq!(d.layout_metrics().await.unwrap().content_width, 900);
        }

        #[tokio::test]
        async fn test_widening_viewport_follows_content() {
            let d = MockDriver::new().with_page(
                "/",
                MockPage::new().with_content_width(900).widening_viewport(),
            );
            d.set_viewport(&DeviceProfile::IPHONE_SE).await.unwrap();
            d.navigate("http://localhost:3000/").await.unwrap();
            let m = d.layout_metrics().await.unwrap();
            assert_eq!((m.viewport_width, m.content_width), (900, 900));
        }

        #[tokio::test]
        async fn test_diagnostics_per_page() {
            let diag = Diagnostics {
                console: vec![ConsoleEntry::error("boom")],
                network: vec![],
            };
            let d = MockDriver::new().with_page("/", MockPage::new().with_diagnostics(diag.clone()));
            d.navigate("http://localhost:3000/").await.unwrap();
            assert_eq!(d.diagnostics().await.unwrap(), diag);
        }
    }

    mod factory_tests {
        use super::*;

        #[tokio::test]
        async fn test_factory_hands_out_fresh_pages() {
            let factory = MockDriverFactory::new(login_site());
            let first = factory.new_page().await.unwrap();
            first.navigate("http://localhost:3000/auth/login").await.unwrap();
            first
                .fill(&Selector::css("input[type=password]"), "right")
                .await
                .unwrap();
            first.click(&Selector::css("button[type=submit]")).await.unwrap();

            let second = factory.new_page().await.unwrap();
            assert_eq!(second.current_url().await.unwrap(), "about:blank");
            second.navigate("http://localhost:3000/dashboard").await.unwrap();
            assert!(second.current_url().await.unwrap().ends_with("/auth/login"));
        }

        #[tokio::test]
        async fn test_shared_context_carries_sign_in() {
            let factory = MockDriverFactory::new(login_site()).with_shared_context();
            let first = factory.new_page().await.unwrap();
            first.navigate("http://localhost:3000/auth/login").await.unwrap();
            first
                .fill(&Selector::css("input[type=password]"), "right")
                .await
                .unwrap();
            first.click(&Selector::css("button[type=submit]")).await.unwrap();
            first.close().await.unwrap();

            let second = factory.new_page().await.unwrap();
            assert_eq!(second.current_url().await.unwrap(), "about:blank");
            second.navigate("http://localhost:3000/dashboard").await.unwrap();
            assert!(second.current_url().await.unwrap().ends_with("/dashboard"));
        }

        #[test]
        fn test_clone_does_not_share_sign_in() {
            let tab = login_site().new_tab();
            let copy = tab.clone();
            tab.state().session.store(true, Ordering::SeqCst);
            assert!(tab.is_authenticated());
            assert!(!copy.is_authenticated());
            assert!(tab.new_tab().is_authenticated());
        }
    }
}
