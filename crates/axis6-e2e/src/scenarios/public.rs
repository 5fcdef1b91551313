//! Public pages: landing, login, registration.

use crate::expect::expect;
use crate::pages::{authenticated_routes, LandingPage, LoginOutcome, LoginPage, PageObject, RegisterPage};
use crate::result::{HarnessError, HarnessResult};
use crate::scenario::ScenarioContext;
use crate::url::UrlPattern;
use crate::user::TestUser;
use crate::wait::{wait_for_url, WaitOptions};
use futures::future::BoxFuture;

fn auth_wait(ctx: &ScenarioContext) -> WaitOptions {
    WaitOptions::new()
        .with_timeout(ctx.config().auth_timeout_ms)
        .with_poll_interval(ctx.config().poll_interval_ms)
}

/// Credentials for login attempts: the configured account, else a fresh one
fn login_user(ctx: &ScenarioContext) -> TestUser {
    ctx.config()
        .test_account
        .clone()
        .unwrap_or_else(|| TestUser::generate("e2e-login"))
}

pub(super) fn landing_renders_hero(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let landing = LandingPage::new(ctx.config());
        landing.goto(ctx.driver(), ctx.config()).await?;
        landing.verify_loaded(ctx.driver()).await?;
        expect(landing.hero_heading())
            .to_be_visible()
            .check(ctx.driver())
            .await?;
        expect(landing.get_started())
            .to_be_visible()
            .check(ctx.driver())
            .await
    })
}

pub(super) fn landing_links_to_login(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let landing = LandingPage::new(ctx.config());
        landing.goto(ctx.driver(), ctx.config()).await?;
        landing.verify_loaded(ctx.driver()).await?;
        landing.login_link().click(ctx.driver()).await?;
        ctx.log().step("clicked login link");
        LoginPage::new(ctx.config()).verify_loaded(ctx.driver()).await
    })
}

pub(super) fn login_form_renders(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let login = LoginPage::new(ctx.config());
        login.goto(ctx.driver(), ctx.config()).await?;
        login.verify_loaded(ctx.driver()).await
    })
}

pub(super) fn login_with_credentials_lands_or_errors(
    ctx: &ScenarioContext,
) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let user = login_user(ctx);
        let login = LoginPage::new(ctx.config());
        login.goto(ctx.driver(), ctx.config()).await?;
        login.verify_loaded(ctx.driver()).await?;
        login.login(ctx.driver(), &user.email, &user.password).await?;

        match login.await_outcome(ctx.driver(), &auth_wait(ctx)).await? {
            LoginOutcome::SignedIn { url } => ctx.log().step(format!("signed in, on {url}")),
            LoginOutcome::Rejected { message } => ctx.log().step(format!(
                "rejected: {}",
                message.as_deref().unwrap_or("(no message)")
            )),
        }
        Ok(())
    })
}

pub(super) fn login_rejects_bad_password(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let user = login_user(ctx);
        let login = LoginPage::new(ctx.config());
        login.goto(ctx.driver(), ctx.config()).await?;
        login.verify_loaded(ctx.driver()).await?;
        login
            .login(ctx.driver(), &user.email, &user.wrong_password())
            .await?;

        match login.await_outcome(ctx.driver(), &auth_wait(ctx)).await? {
            LoginOutcome::SignedIn { url } => Err(HarnessError::assertion(format!(
                "wrong password for {} was accepted, landed on {url}",
                user.email
            ))),
            LoginOutcome::Rejected { .. } => {
                let url = ctx.driver().current_url().await?;
                if !login.url_pattern().matches(&url) {
                    return Err(HarnessError::assertion(format!(
                        "expected to stay on /auth/login, on {url}"
                    )));
                }
                expect(login.error_message())
                    .to_be_visible()
                    .check(ctx.driver())
                    .await
            }
        }
    })
}

pub(super) fn register_form_renders(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let register = RegisterPage::new(ctx.config());
        register.goto(ctx.driver(), ctx.config()).await?;
        register.verify_loaded(ctx.driver()).await?;
        for control in [
            register.name_input(),
            register.email_input(),
            register.password_input(),
            register.submit(),
        ] {
            expect(control).to_be_visible().check(ctx.driver()).await?;
        }
        Ok(())
    })
}

pub(super) fn register_new_user_reaches_app(
    ctx: &ScenarioContext,
) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let user = TestUser::generate("e2e-register");
        let register = RegisterPage::new(ctx.config());
        register.goto(ctx.driver(), ctx.config()).await?;
        register.verify_loaded(ctx.driver()).await?;
        register.register(ctx.driver(), &user).await?;
        ctx.log().step(format!("registered {}", user.email));

        let routes = authenticated_routes();
        match wait_for_url(ctx.driver(), &routes, &auth_wait(ctx)).await {
            Ok(url) => {
                ctx.log().step(format!("landed on {url}"));
                Ok(())
            }
            Err(HarnessError::Timeout { ms, .. }) => {
                let url = ctx.driver().current_url().await?;
                Err(HarnessError::assertion(format!(
                    "registration did not reach the app within {ms}ms, on {url}"
                )))
            }
            Err(e) => Err(e),
        }
    })
}

pub(super) fn unauthenticated_dashboard_redirects(
    ctx: &ScenarioContext,
) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        ctx.driver().navigate(&ctx.config().url("/dashboard")).await?;
        let wait = WaitOptions::new()
            .with_timeout(ctx.config().navigation_timeout_ms)
            .with_poll_interval(ctx.config().poll_interval_ms);
        let login = UrlPattern::path("/auth/login");
        match wait_for_url(ctx.driver(), std::slice::from_ref(&login), &wait).await {
            Ok(_) => Ok(()),
            Err(HarnessError::Timeout { .. }) => {
                let url = ctx.driver().current_url().await?;
                Err(HarnessError::assertion(format!(
                    "signed-out visit to /dashboard was not redirected to /auth/login, on {url}"
                )))
            }
            Err(e) => Err(e),
        }
    })
}
