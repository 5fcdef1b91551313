//! Test-user descriptors.
//!
//! Generated users carry a millisecond timestamp plus a random suffix so
//! parallel workers and repeated runs never collide on the same email.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mail domain for generated accounts
pub const TEST_EMAIL_DOMAIN: &str = "axis6-e2e.test";

/// Credentials and profile data used to drive the auth forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUser {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Display name entered at registration
    pub display_name: String,
}

impl TestUser {
    /// Generate a fresh, unique user.
    ///
    /// The email has the form `{prefix}+{unix_millis}-{uuid8}@axis6-e2e.test`.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let nonce = Uuid::new_v4().simple().to_string();
        let suffix = &nonce[..8];
        let local = sanitize_local_part(prefix);

        Self {
            email: format!("{local}+{millis}-{suffix}@{TEST_EMAIL_DOMAIN}"),
            password: format!("Axis6!{}{}", &nonce[8..16], "Qz9"),
            display_name: format!("E2E {suffix}"),
        }
    }

    /// A known account (e.g. from `AXIS6_TEST_EMAIL`/`AXIS6_TEST_PASSWORD`)
    #[must_use]
    pub fn fixed(
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            display_name: display_name.into(),
        }
    }

    /// Password that the application must reject for this user
    #[must_use]
    pub fn wrong_password(&self) -> String {
        format!("{}-wrong", self.password)
    }
}

fn sanitize_local_part(prefix: &str) -> String {
    let cleaned: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        "e2e".to_string()
    } else {
        cleaned
    }
}
