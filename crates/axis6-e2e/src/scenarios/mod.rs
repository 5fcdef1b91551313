//! The AXIS6 regression catalogue.
//!
//! Every scenario here is a hard check: one selector per element, no
//! presence-gated branches. Soft checks live in [`crate::probe`].

mod app;
mod layout;
mod public;

use crate::scenario::Scenario;

const SMOKE: &[&str] = &["smoke", "public"];
const PUBLIC: &[&str] = &["public"];
const AUTH_FLOW: &[&str] = &["auth", "public"];
const APP: &[&str] = &["app"];
const RESPONSIVE: &[&str] = &["responsive", "public"];

/// Every regression scenario, in run order
#[must_use]
pub fn regression_suite() -> Vec<Scenario> {
    #[cfg_attr(not(feature = "api"), allow(unused_mut))]
    let mut suite = vec![
        Scenario::new("landing_renders_hero", public::landing_renders_hero).with_tags(SMOKE),
        Scenario::new("landing_links_to_login", public::landing_links_to_login).with_tags(PUBLIC),
        Scenario::new("login_form_renders", public::login_form_renders).with_tags(SMOKE),
        Scenario::new(
            "login_with_credentials_lands_or_errors",
            public::login_with_credentials_lands_or_errors,
        )
        .with_tags(AUTH_FLOW),
        Scenario::new("login_rejects_bad_password", public::login_rejects_bad_password)
            .with_tags(AUTH_FLOW),
        Scenario::new("register_form_renders", public::register_form_renders).with_tags(SMOKE),
        Scenario::new(
            "register_new_user_reaches_app",
            public::register_new_user_reaches_app,
        )
        .with_tags(AUTH_FLOW)
        .mutating(),
        Scenario::new("dashboard_shows_hexagon", app::dashboard_shows_hexagon)
            .with_tags(&["app", "dashboard"])
            .authenticated(),
        Scenario::new(
            "dashboard_has_no_unexpected_console_errors",
            app::dashboard_has_no_unexpected_console_errors,
        )
        .with_tags(&["app", "dashboard", "console"])
        .authenticated(),
        Scenario::new("settings_sections_load", app::settings_sections_load)
            .with_tags(&["app", "settings"])
            .authenticated(),
        Scenario::new("profile_shows_user", app::profile_shows_user)
            .with_tags(APP)
            .authenticated(),
        Scenario::new("my_day_renders_planner", app::my_day_renders_planner)
            .with_tags(APP)
            .authenticated(),
        Scenario::new("chat_new_conversation", app::chat_new_conversation)
            .with_tags(&["app", "chat"])
            .authenticated(),
        Scenario::new(
            "unauthenticated_dashboard_redirects",
            public::unauthenticated_dashboard_redirects,
        )
        .with_tags(AUTH_FLOW),
        Scenario::new(
            "responsive_layout_iphone_se",
            layout::responsive_layout_iphone_se,
        )
        .with_tags(RESPONSIVE),
        Scenario::new(
            "responsive_layout_iphone_12",
            layout::responsive_layout_iphone_12,
        )
        .with_tags(RESPONSIVE),
        Scenario::new("responsive_layout_android", layout::responsive_layout_android)
            .with_tags(RESPONSIVE),
        Scenario::new("responsive_layout_ipad", layout::responsive_layout_ipad)
            .with_tags(RESPONSIVE),
        Scenario::new("responsive_layout_desktop", layout::responsive_layout_desktop)
            .with_tags(RESPONSIVE),
        Scenario::new(
            "landing_performance_budget",
            layout::landing_performance_budget,
        )
        .with_tags(&["performance", "public"]),
    ];

    #[cfg(feature = "api")]
    suite.push(Scenario::new("api_health_below_500", layout::api_health_below_500).with_tags(&["api"]));

    suite
}

/// Look a scenario up by exact name
#[must_use]
pub fn find(name: &str) -> Option<Scenario> {
    regression_suite().into_iter().find(|s| s.name == name)
}
