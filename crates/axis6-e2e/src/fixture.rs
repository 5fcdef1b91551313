//! Fixture Management
//!
//! Fixtures prepare state a scenario depends on before its body runs. The
//! only fixture the suite needs is [`AuthFixture`], which yields a signed-in
//! browser session. A failing fixture is reported as `FixtureFailed` and
//! the scenario body never runs.

use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::pages::{authenticated_routes, LoginOutcome, LoginPage, PageObject, RegisterPage};
use crate::result::{HarnessError, HarnessResult};
use crate::user::TestUser;
use crate::wait::{wait_for_url, WaitOptions};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

/// Trait for scenario fixtures that can be set up and torn down.
#[async_trait]
pub trait Fixture: Send + Sync {
    /// What a successful setup hands to the scenario
    type Resource: Send + Sync;

    /// Set up the fixture on the scenario's page.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture setup fails.
    async fn setup(
        &self,
        driver: &dyn PageDriver,
        config: &SuiteConfig,
    ) -> HarnessResult<Self::Resource>;

    /// Tear down the fixture after the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture teardown fails.
    async fn teardown(
        &self,
        _driver: &dyn PageDriver,
        _resource: &Self::Resource,
    ) -> HarnessResult<()> {
        Ok(())
    }

    /// Get the fixture name for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// How the fixture obtains a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Register a fresh, unique account
    RegisterNew {
        /// Local-part prefix of the generated email
        prefix: String,
    },
    /// Sign in with a known account
    Login(TestUser),
}

/// A signed-in browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedSession {
    /// Account in use
    pub user: TestUser,
    /// URL the application landed on after signing in
    pub landed_on: String,
}

/// Provides an [`AuthenticatedSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFixture {
    mode: AuthMode,
}

impl AuthFixture {
    /// Register a new account per scenario
    #[must_use]
    pub fn register_new(prefix: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::RegisterNew {
                prefix: prefix.into(),
            },
        }
    }

    /// Sign in with a known account
    #[must_use]
    pub const fn login(user: TestUser) -> Self {
        Self {
            mode: AuthMode::Login(user),
        }
    }

    /// Log in with the configured account, or register when none is set
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        config
            .test_account
            .clone()
            .map_or_else(|| Self::register_new("e2e"), Self::login)
    }

    /// Selected mode
    #[must_use]
    pub const fn mode(&self) -> &AuthMode {
        &self.mode
    }

    /// Whether setup creates an account on the server
    #[must_use]
    pub const fn mutates_remote_state(&self) -> bool {
        matches!(self.mode, AuthMode::RegisterNew { .. })
    }

    async fn register(
        driver: &dyn PageDriver,
        config: &SuiteConfig,
        prefix: &str,
        wait: &WaitOptions,
    ) -> HarnessResult<AuthenticatedSession> {
        let user = TestUser::generate(prefix);
        let page = RegisterPage::new(config);
        page.goto(driver, config).await?;
        page.verify_loaded(driver).await?;
        page.register(driver, &user).await?;

        let landed_on = wait_for_url(driver, &authenticated_routes(), wait)
            .await
            .map_err(|e| match e {
                HarnessError::Timeout { ms, .. } => HarnessError::fixture(format!(
                    "registering {} did not reach the app within {ms}ms",
                    user.email
                )),
                other => other,
            })?;
        Ok(AuthenticatedSession { user, landed_on })
    }

    async fn sign_in(
        driver: &dyn PageDriver,
        config: &SuiteConfig,
        user: &TestUser,
        wait: &WaitOptions,
    ) -> HarnessResult<AuthenticatedSession> {
        let page = LoginPage::new(config);
        page.goto(driver, config).await?;
        page.verify_loaded(driver).await?;
        page.login(driver, &user.email, &user.password).await?;

        match page.await_outcome(driver, wait).await? {
            LoginOutcome::SignedIn { url } => Ok(AuthenticatedSession {
                user: user.clone(),
                landed_on: url,
            }),
            LoginOutcome::Rejected { message } => Err(HarnessError::fixture(format!(
                "login as {} rejected: {}",
                user.email,
                message.as_deref().unwrap_or("no message")
            ))),
        }
    }
}

#[async_trait]
impl Fixture for AuthFixture {
    type Resource = AuthenticatedSession;

    async fn setup(
        &self,
        driver: &dyn PageDriver,
        config: &SuiteConfig,
    ) -> HarnessResult<AuthenticatedSession> {
        let wait = WaitOptions::new()
            .with_timeout(config.auth_timeout_ms)
            .with_poll_interval(config.poll_interval_ms);

        let session = match &self.mode {
            AuthMode::RegisterNew { prefix } => Self::register(driver, config, prefix, &wait).await,
            AuthMode::Login(user) => Self::sign_in(driver, config, user, &wait).await,
        }
        .map_err(|e| match e {
            HarnessError::Fixture { .. } => e,
            other => HarnessError::fixture(format!("{}: {other}", self.name())),
        })?;

        info!(email = %session.user.email, landed_on = %session.landed_on, "authenticated");
        Ok(session)
    }

    async fn teardown(
        &self,
        _driver: &dyn PageDriver,
        session: &AuthenticatedSession,
    ) -> HarnessResult<()> {
        // accounts are left in place; the application has no self-service deletion
        debug!(email = %session.user.email, "auth fixture teardown");
        Ok(())
    }

    fn name(&self) -> &str {
        "auth"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing::{fast_config, known_user, site};

    mod mode_tests {
        use super::*;

        #[test]
        fn test_from_config_without_account_registers() {
            let fixture = AuthFixture::from_config(&SuiteConfig::default());
            assert!(fixture.mutates_remote_state());
            assert_eq!(
                fixture.mode(),
                &AuthMode::RegisterNew {
                    prefix: "e2e".into()
                }
            );
        }

        #[test]
        fn test_from_config_with_account_logs_in() {
            let cfg = SuiteConfig::default().with_test_account(known_user());
            let fixture = AuthFixture::from_config(&cfg);
            assert!(!fixture.mutates_remote_state());
            assert_eq!(fixture.mode(), &AuthMode::Login(known_user()));
        }
    }

    mod setup_tests {
        use super::*;

        #[tokio::test]
        async fn test_login_session() {
            let cfg = fast_config();
            let driver = site();
            let session = AuthFixture::login(known_user())
                .setup(&driver, &cfg)
                .await
                .unwrap();
            assert_eq!(session.user, known_user());
            assert_eq!(session.landed_on, "http://localhost:3000/dashboard");
        }

        #[tokio::test]
        async fn test_register_session() {
            let cfg = fast_config();
            let driver = site();
            let session = AuthFixture::register_new("fx")
                .setup(&driver, &cfg)
                .await
                .unwrap();
            assert!(session.user.email.starts_with("fx+"));
            assert!(authenticated_routes()
                .iter()
                .any(|r| r.matches(&session.landed_on)));
        }

        #[tokio::test]
        async fn test_rejected_login_is_fixture_error() {
            let cfg = fast_config();
            let driver = site();
            let mut user = known_user();
            user.password = user.wrong_password();
            let err = AuthFixture::login(user).setup(&driver, &cfg).await.unwrap_err();
            match err {
                HarnessError::Fixture { message } => {
                    assert!(message.contains("rejected"), "{message}");
                    assert!(message.contains("Invalid email or password"), "{message}");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_missing_form_is_fixture_error() {
            let cfg = fast_config();
            let driver = crate::driver::MockDriver::new();
            let err = AuthFixture::login(known_user())
                .setup(&driver, &cfg)
                .await
                .unwrap_err();
            assert!(matches!(err, HarnessError::Fixture { .. }));
            assert!(err.to_string().contains("auth: "));
        }
    }
}
