//! Signed-in application pages.

use crate::diagnostics::NoiseFilter;
use crate::expect::expect;
use crate::pages::{
    ChatPage, DashboardPage, MyDayPage, PageObject, ProfilePage, SettingsPage, SettingsSection,
    CATEGORY_COUNT,
};
use crate::result::{HarnessError, HarnessResult};
use crate::scenario::ScenarioContext;
use crate::wait::{wait_for_url, WaitOptions};
use futures::future::BoxFuture;

pub(super) fn dashboard_shows_hexagon(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let dashboard = DashboardPage::new(ctx.config());
        dashboard.goto(ctx.driver(), ctx.config()).await?;
        dashboard.verify_loaded(ctx.driver()).await?;
        expect(dashboard.hexagon_chart())
            .to_be_visible()
            .check(ctx.driver())
            .await?;
        expect(dashboard.category_cards())
            .to_have_count(CATEGORY_COUNT)
            .check(ctx.driver())
            .await
    })
}

pub(super) fn dashboard_has_no_unexpected_console_errors(
    ctx: &ScenarioContext,
) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let dashboard = DashboardPage::new(ctx.config());
        dashboard.goto(ctx.driver(), ctx.config()).await?;
        dashboard.verify_loaded(ctx.driver()).await?;

        let diagnostics = ctx.driver().diagnostics().await?;
        let filter = NoiseFilter::default();
        let errors = diagnostics.unexpected_errors(&filter);
        ctx.log().step(format!(
            "{} console errors, {} unexpected",
            diagnostics.error_count(),
            errors.len()
        ));
        if errors.is_empty() {
            return Ok(());
        }
        let listed: Vec<&str> = errors.iter().map(|e| e.text.as_str()).collect();
        Err(HarnessError::assertion(format!(
            "{} unexpected console errors on /dashboard: {}",
            errors.len(),
            listed.join(" | ")
        )))
    })
}

pub(super) fn settings_sections_load(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        for section in SettingsSection::ALL {
            let page = SettingsPage::at(ctx.config(), section);
            page.goto(ctx.driver(), ctx.config()).await?;
            page.verify_loaded(ctx.driver()).await?;
            ctx.log().step(format!("{section} loaded"));
        }
        Ok(())
    })
}

pub(super) fn profile_shows_user(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let user = &ctx.session()?.user;
        let profile = ProfilePage::new(ctx.config());
        profile.goto(ctx.driver(), ctx.config()).await?;
        profile.verify_loaded(ctx.driver()).await?;

        let name = profile.display_name().text(ctx.driver()).await?.unwrap_or_default();
        let email = profile.email().text(ctx.driver()).await?.unwrap_or_default();
        if name.contains(&user.display_name) || email.contains(&user.email) {
            return Ok(());
        }
        Err(HarnessError::assertion(format!(
            "profile shows name {name:?} and email {email:?}, expected {:?} or {:?}",
            user.display_name, user.email
        )))
    })
}

pub(super) fn my_day_renders_planner(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let my_day = MyDayPage::new(ctx.config());
        my_day.goto(ctx.driver(), ctx.config()).await?;
        my_day.verify_loaded(ctx.driver()).await?;
        expect(my_day.add_block_button())
            .to_be_visible()
            .check(ctx.driver())
            .await
    })
}

pub(super) fn chat_new_conversation(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let chat = ChatPage::new(ctx.config());
        chat.goto(ctx.driver(), ctx.config()).await?;
        chat.verify_loaded(ctx.driver()).await?;
        chat.new_chat().click(ctx.driver()).await?;

        let wait = WaitOptions::new()
            .with_timeout(ctx.config().navigation_timeout_ms)
            .with_poll_interval(ctx.config().poll_interval_ms);
        let routes = [
            ChatPage::new_conversation_route(),
            ChatPage::conversation_route(),
        ];
        let url = wait_for_url(ctx.driver(), &routes, &wait).await?;
        ctx.log().step(format!("new conversation at {url}"));

        expect(chat.message_input())
            .to_be_visible()
            .check(ctx.driver())
            .await
    })
}
