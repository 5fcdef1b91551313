//! In-memory model of the AXIS6 site shared by unit tests.

use crate::config::SuiteConfig;
use crate::diagnostics::{ConsoleEntry, Diagnostics, NetworkFailure};
use crate::driver::{ClickEffect, MockDriver, MockElement, MockPage};
use crate::locator::Selector;
use crate::pages::SettingsSection;
use crate::performance::NavigationTiming;
use crate::user::TestUser;

pub const KNOWN_EMAIL: &str = "tester@axis6-e2e.test";
pub const KNOWN_PASSWORD: &str = "Axis6!KnownQz9";
pub const KNOWN_NAME: &str = "AXIS6 Tester";

pub fn known_user() -> TestUser {
    TestUser::fixed(KNOWN_EMAIL, KNOWN_PASSWORD, KNOWN_NAME)
}

/// Short timeouts so failing waits finish quickly
pub fn fast_config() -> SuiteConfig {
    let mut cfg = SuiteConfig::default();
    cfg.element_timeout_ms = 40;
    cfg.navigation_timeout_ms = 120;
    cfg.auth_timeout_ms = 120;
    cfg.scenario_timeout_ms = 3_000;
    cfg.poll_interval_ms = 5;
    cfg
}

fn id(test_id: &str) -> Selector {
    Selector::test_id(test_id)
}

pub fn landing() -> MockPage {
    MockPage::new()
        .with_element(id("hero-heading"), MockElement::visible("Balance your life across six axes"))
        .with_element(id("get-started-cta"), MockElement::visible("Get started"))
        .with_element(id("login-link"), MockElement::visible("Log in"))
        .with_element(id("features-section"), MockElement::visible(""))
        .on_click(id("login-link"), ClickEffect::Navigate("/auth/login".into()))
        .with_timing(NavigationTiming {
            ttfb_ms: Some(90.0),
            dom_content_loaded_ms: Some(820.0),
            load_ms: Some(1_450.0),
            first_contentful_paint_ms: Some(610.0),
        })
}

fn login() -> MockPage {
    let password = Selector::css("input[type=password]");
    let submit = Selector::css("button[type=submit]");
    MockPage::new()
        .with_element(Selector::css("input[type=email]"), MockElement::visible(""))
        .with_element(password.clone(), MockElement::visible(""))
        .with_element(submit.clone(), MockElement::visible("Sign in"))
        .with_element(id("register-link"), MockElement::visible("Create account"))
        .on_click(
            submit,
            ClickEffect::WhenFilled {
                field: password,
                equals: KNOWN_PASSWORD.into(),
                then: Box::new(ClickEffect::SignIn("/dashboard".into())),
                otherwise: Box::new(ClickEffect::Reveal(
                    id("login-error"),
                    MockElement::visible("Invalid email or password"),
                )),
            },
        )
}

fn register() -> MockPage {
    let submit = Selector::css("button[type=submit]");
    MockPage::new()
        .with_element(Selector::css("input[name=name]"), MockElement::visible(""))
        .with_element(Selector::css("input[type=email]"), MockElement::visible(""))
        .with_element(Selector::css("input[type=password]"), MockElement::visible(""))
        .with_element(submit.clone(), MockElement::visible("Create account"))
        .on_click(submit, ClickEffect::SignIn("/dashboard".into()))
}

pub fn dashboard() -> MockPage {
    MockPage::new()
        .with_element(id("hexagon-chart"), MockElement::visible(""))
        .with_element(id("category-card"), MockElement::many(6))
        .with_element(id("streak-counter"), MockElement::visible("3"))
        .with_diagnostics(Diagnostics {
            console: vec![
                ConsoleEntry::error("ResizeObserver loop completed with undelivered notifications."),
                ConsoleEntry::warning("React DevTools not installed"),
            ],
            network: vec![NetworkFailure {
                url: "http://localhost:3000/favicon.ico".into(),
                status: 404,
            }],
        })
}

fn settings_index() -> MockPage {
    MockPage::new()
        .with_element(id("settings-nav"), MockElement::visible(""))
        .with_element(id("theme-toggle"), MockElement::visible(""))
}

fn settings_section(section: SettingsSection) -> MockPage {
    MockPage::new().with_element(
        id(&format!("settings-{}-heading", section.slug())),
        MockElement::visible(section.slug()),
    )
}

/// The application as the suite expects it to behave
pub fn site() -> MockDriver {
    let mut driver = MockDriver::new()
        .with_page("/", landing())
        .with_page("/auth/login", login())
        .with_page("/auth/register", register())
        .with_page("/dashboard", dashboard())
        .with_page(
            "/my-day",
            MockPage::new()
                .with_element(id("day-planner"), MockElement::visible(""))
                .with_element(id("time-block-list"), MockElement::visible(""))
                .with_element(id("time-block"), MockElement::many(2))
                .with_element(id("add-time-block"), MockElement::visible("Add block")),
        )
        .with_page(
            "/chat",
            MockPage::new()
                .with_element(id("new-chat-button"), MockElement::visible("New chat"))
                .with_element(id("conversation-list"), MockElement::visible(""))
                .on_click(id("new-chat-button"), ClickEffect::Navigate("/chat/new".into())),
        )
        .with_page(
            "/chat/new",
            MockPage::new()
                .with_element(id("new-chat-button"), MockElement::visible("New chat"))
                .with_element(id("message-input"), MockElement::visible("")),
        )
        .with_page(
            "/profile",
            MockPage::new()
                .with_element(id("profile-form"), MockElement::visible(""))
                .with_element(id("profile-name"), MockElement::input(KNOWN_NAME))
                .with_element(id("profile-email"), MockElement::input(KNOWN_EMAIL)),
        )
        .with_page("/settings", settings_index())
        .with_page("/analytics", MockPage::new())
        .with_page("/achievements", MockPage::new());

    for section in SettingsSection::ALL {
        driver = driver.with_page(&section.path(), settings_section(section));
    }
    for guarded in [
        "/dashboard",
        "/my-day",
        "/chat",
        "/profile",
        "/settings",
        "/analytics",
        "/achievements",
    ] {
        driver = driver.with_guard(guarded, "/auth/login");
    }
    driver
}
