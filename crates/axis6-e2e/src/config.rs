//! Suite configuration.
//!
//! Layered: built-in defaults, then an optional YAML file, then environment
//! variables, then explicit overrides from the caller (CLI flags).
//!
//! The base URL follows a fixed chain: `AXIS6_PRODUCTION_URL` wins over
//! `BASE_URL`, which wins over the local development server.

use crate::performance::PerformanceBudget;
use crate::result::{HarnessError, HarnessResult};
use crate::user::TestUser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Production base URL override
pub const ENV_PRODUCTION_URL: &str = "AXIS6_PRODUCTION_URL";
/// Generic base URL
pub const ENV_BASE_URL: &str = "BASE_URL";
/// `0`/`false` runs a headed browser
pub const ENV_HEADLESS: &str = "AXIS6_HEADLESS";
/// Browser executable path
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";
/// Screenshot output directory
pub const ENV_SCREENSHOT_DIR: &str = "AXIS6_SCREENSHOT_DIR";
/// Fixed login account email
pub const ENV_TEST_EMAIL: &str = "AXIS6_TEST_EMAIL";
/// Fixed login account password
pub const ENV_TEST_PASSWORD: &str = "AXIS6_TEST_PASSWORD";

/// Base URL used when no environment override is set
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default screenshot directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "test-results/screenshots";

/// Configuration shared by every scenario in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Base URL of the application under test, without trailing slash
    pub base_url: String,
    /// Run the browser headless
    pub headless: bool,
    /// Browser executable (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Where screenshots are written
    pub screenshot_dir: PathBuf,
    /// Default viewport width
    pub viewport_width: u32,
    /// Default viewport height
    pub viewport_height: u32,
    /// Element wait timeout
    pub element_timeout_ms: u64,
    /// Navigation wait timeout
    pub navigation_timeout_ms: u64,
    /// Time allowed for the auth fixture to reach an authenticated route
    pub auth_timeout_ms: u64,
    /// Upper bound on one scenario body
    pub scenario_timeout_ms: u64,
    /// Poll interval for bounded waits
    pub poll_interval_ms: u64,
    /// HTTP request timeout for API probes
    pub request_timeout_ms: u64,
    /// Fixed account; when set the auth fixture logs in instead of registering
    pub test_account: Option<TestUser>,
    /// Page-load performance budget
    pub budget: PerformanceBudget,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            chromium_path: None,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            viewport_width: 1440,
            viewport_height: 900,
            element_timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
            auth_timeout_ms: 30_000,
            scenario_timeout_ms: 120_000,
            poll_interval_ms: 100,
            request_timeout_ms: 10_000,
            test_account: None,
            budget: PerformanceBudget::default(),
        }
    }
}

/// On-disk configuration; every field is optional and overrides the default
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL
    pub base_url: Option<String>,
    /// Headless mode
    pub headless: Option<bool>,
    /// Browser executable
    pub chromium_path: Option<String>,
    /// Screenshot directory
    pub screenshot_dir: Option<PathBuf>,
    /// Viewport width
    pub viewport_width: Option<u32>,
    /// Viewport height
    pub viewport_height: Option<u32>,
    /// Element timeout
    pub element_timeout_ms: Option<u64>,
    /// Navigation timeout
    pub navigation_timeout_ms: Option<u64>,
    /// Auth timeout
    pub auth_timeout_ms: Option<u64>,
    /// Scenario timeout
    pub scenario_timeout_ms: Option<u64>,
    /// Poll interval
    pub poll_interval_ms: Option<u64>,
    /// HTTP request timeout
    pub request_timeout_ms: Option<u64>,
    /// Performance budget
    pub budget: Option<PerformanceBudget>,
}

impl SuiteConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then the optional file, then the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// resulting base URL is not an http(s) URL.
    pub fn load(path: Option<&Path>) -> HarnessResult<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            let text = std::fs::read_to_string(path)?;
            config = config.merge_file(serde_yaml_ng::from_str(&text)?);
        }
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from a parsed config file
    #[must_use]
    pub fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(v) = file.base_url {
            self.base_url = v;
        }
        if let Some(v) = file.headless {
            self.headless = v;
        }
        if file.chromium_path.is_some() {
            self.chromium_path = file.chromium_path;
        }
        if let Some(v) = file.screenshot_dir {
            self.screenshot_dir = v;
        }
        if let Some(v) = file.viewport_width {
            self.viewport_width = v;
        }
        if let Some(v) = file.viewport_height {
            self.viewport_height = v;
        }
        if let Some(v) = file.element_timeout_ms {
            self.element_timeout_ms = v;
        }
        if let Some(v) = file.navigation_timeout_ms {
            self.navigation_timeout_ms = v;
        }
        if let Some(v) = file.auth_timeout_ms {
            self.auth_timeout_ms = v;
        }
        if let Some(v) = file.scenario_timeout_ms {
            self.scenario_timeout_ms = v;
        }
        if let Some(v) = file.poll_interval_ms {
            self.poll_interval_ms = v;
        }
        if let Some(v) = file.request_timeout_ms {
            self.request_timeout_ms = v;
        }
        if let Some(v) = file.budget {
            self.budget = v;
        }
        self
    }

    /// Overlay environment values read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting base URL is invalid.
    pub fn apply_env<F>(mut self, lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_PRODUCTION_URL).or_else(|| non_empty(ENV_BASE_URL)) {
            self.base_url = url;
        }
        if let Some(flag) = non_empty(ENV_HEADLESS) {
            self.headless = !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false");
        }
        if let Some(path) = non_empty(ENV_CHROMIUM_PATH) {
            self.chromium_path = Some(path);
        }
        if let Some(dir) = non_empty(ENV_SCREENSHOT_DIR) {
            self.screenshot_dir = PathBuf::from(dir);
        }
        if let (Some(email), Some(password)) = (non_empty(ENV_TEST_EMAIL), non_empty(ENV_TEST_PASSWORD))
        {
            self.test_account = Some(TestUser::fixed(email, password, "AXIS6 Tester"));
        }

        self.base_url = normalize_base_url(&self.base_url)?;
        Ok(self)
    }

    /// Override the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s).
    pub fn with_base_url(mut self, url: &str) -> HarnessResult<Self> {
        self.base_url = normalize_base_url(url)?;
        Ok(self)
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set the element timeout
    #[must_use]
    pub const fn with_element_timeout(mut self, ms: u64) -> Self {
        self.element_timeout_ms = ms;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the fixed login account
    #[must_use]
    pub fn with_test_account(mut self, user: TestUser) -> Self {
        self.test_account = Some(user);
        self
    }

    /// Absolute URL for an application path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() || path == "/" {
            return format!("{}/", self.base_url);
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Element timeout as Duration
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    /// Navigation timeout as Duration
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Auth timeout as Duration
    #[must_use]
    pub const fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    /// Scenario timeout as Duration
    #[must_use]
    pub const fn scenario_timeout(&self) -> Duration {
        Duration::from_millis(self.scenario_timeout_ms)
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as Duration
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn normalize_base_url(url: &str) -> HarnessResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            HarnessError::config(format!(
                "base URL must start with http:// or https://, got '{url}'"
            ))
        })?;
    if host.is_empty() {
        return Err(HarnessError::config(format!("base URL has no host: '{url}'")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod base_url_chain_tests {
        use super::*;

        #[test]
        fn test_fallback_to_localhost() {
            let config = SuiteConfig::default().apply_env(env(&[])).unwrap();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }

        #[test]
        fn test_base_url_variable() {
            let config = SuiteConfig::default()
                .apply_env(env(&[(ENV_BASE_URL, "https://staging.axis6.app/")]))
                .unwrap();
            assert_eq!(config.base_url, "https://staging.axis6.app");
        }

        #[test]
        fn test_production_override_wins() {
            let config = SuiteConfig::default()
                .apply_env(env(&[
                    (ENV_BASE_URL, "https://staging.axis6.app"),
                    (ENV_PRODUCTION_URL, "https://axis6.app"),
                ]))
                .unwrap();
            assert_eq!(config.base_url, "https://axis6.app");
        }

        #[test]
        fn test_empty_production_falls_through() {
            let config = SuiteConfig::default()
                .apply_env(env(&[
                    (ENV_PRODUCTION_URL, "  "),
                    (ENV_BASE_URL, "http://127.0.0.1:8080"),
                ]))
                .unwrap();
            assert_eq!(config.base_url, "http://127.0.0.1:8080");
        }

        #[test]
        fn test_invalid_scheme_rejected() {
            let err = SuiteConfig::default()
                .apply_env(env(&[(ENV_BASE_URL, "axis6.app")]))
                .unwrap_err();
            assert!(matches!(err, HarnessError::Config { .. }));
        }
    }

    mod env_tests {
        use super::*;

        #[test]
        fn test_headless_flag() {
            let headed = SuiteConfig::default()
                .apply_env(env(&[(ENV_HEADLESS, "false")]))
                .unwrap();
            assert!(!headed.headless);

            let zero = SuiteConfig::default()
                .apply_env(env(&[(ENV_HEADLESS, "0")]))
                .unwrap();
            assert!(!zero.headless);

            let yes = SuiteConfig::default()
                .apply_env(env(&[(ENV_HEADLESS, "1")]))
                .unwrap();
            assert!(yes.headless);
        }

        #[test]
        fn test_account_needs_both_values() {
            let only_email = SuiteConfig::default()
                .apply_env(env(&[(ENV_TEST_EMAIL, "qa@axis6.app")]))
                .unwrap();
            assert!(only_email.test_account.is_none());

            let both = SuiteConfig::default()
                .apply_env(env(&[
                    (ENV_TEST_EMAIL, "qa@axis6.app"),
                    (ENV_TEST_PASSWORD, "Secret123!"),
                ]))
                .unwrap();
            let account = both.test_account.unwrap();
            assert_eq!(account.email, "qa@axis6.app");
            assert_eq!(account.password, "Secret123!");
        }

        #[test]
        fn test_screenshot_dir_and_chromium() {
            let config = SuiteConfig::default()
                .apply_env(env(&[
                    (ENV_SCREENSHOT_DIR, "/tmp/shots"),
                    (ENV_CHROMIUM_PATH, "/usr/bin/chromium"),
                ]))
                .unwrap();
            assert_eq!(config.screenshot_dir, PathBuf::from("/tmp/shots"));
            assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        }
    }

    mod file_tests {
        use super::*;

        #[test]
        fn test_merge_file_partial() {
            let file: ConfigFile = serde_yaml_ng::from_str(
                "base_url: https://preview.axis6.app\nelement_timeout_ms: 8000\n",
            )
            .unwrap();
            let config = SuiteConfig::default().merge_file(file);
            assert_eq!(config.base_url, "https://preview.axis6.app");
            assert_eq!(config.element_timeout_ms, 8000);
            assert_eq!(config.navigation_timeout_ms, 30_000);
        }

        #[test]
        fn test_unknown_key_rejected() {
            let parsed: Result<ConfigFile, _> = serde_yaml_ng::from_str("bogus: 1\n");
            assert!(parsed.is_err());
        }

        #[test]
        fn test_load_from_disk() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("axis6.yaml");
            std::fs::write(&path, "headless: false\npoll_interval_ms: 250\n").unwrap();

            let file: ConfigFile =
                serde_yaml_ng::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            let config = SuiteConfig::default().merge_file(file);
            assert!(!config.headless);
            assert_eq!(config.poll_interval(), Duration::from_millis(250));
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_url_join() {
            let config = SuiteConfig::default()
                .with_base_url("https://axis6.app/")
                .unwrap();
            assert_eq!(config.url("/dashboard"), "https://axis6.app/dashboard");
            assert_eq!(config.url("my-day"), "https://axis6.app/my-day");
            assert_eq!(config.url("/"), "https://axis6.app/");
            assert_eq!(config.url(""), "https://axis6.app/");
        }

        #[test]
        fn test_absolute_passthrough() {
            let config = SuiteConfig::default();
            assert_eq!(
                config.url("https://other.example/x"),
                "https://other.example/x"
            );
        }
    }
}
