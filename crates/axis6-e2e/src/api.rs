//! API liveness checks.
//!
//! An endpoint is alive when it answers with any status below 500. Auth
//! failures (401/403) and missing routes (404) still count as alive: the
//! server handled the request. Transport errors are reported with no status.

use serde::Serialize;

/// Endpoints checked by default
pub const DEFAULT_ENDPOINTS: [&str; 6] = [
    "/api/health",
    "/api/categories",
    "/api/checkins",
    "/api/auth/user",
    "/api/analytics",
    "/api/settings",
];

/// Result of one liveness request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiStatus {
    /// Endpoint path
    pub path: String,
    /// HTTP status, `None` when no response arrived
    pub status: Option<u16>,
    /// Transport error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiStatus {
    /// The endpoint answered
    #[must_use]
    pub fn responded(path: impl Into<String>, status: u16) -> Self {
        Self {
            path: path.into(),
            status: Some(status),
            error: None,
        }
    }

    /// No response arrived
    #[must_use]
    pub fn unreachable(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: None,
            error: Some(error.into()),
        }
    }

    /// Status below 500
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status.is_some_and(|s| s < 500)
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.status, &self.error) {
            (Some(status), _) => write!(f, "{} {status}", self.path),
            (None, Some(error)) => write!(f, "{} unreachable: {error}", self.path),
            (None, None) => write!(f, "{} unreachable", self.path),
        }
    }
}

/// Whether every endpoint is alive
#[must_use]
pub fn all_alive(statuses: &[ApiStatus]) -> bool {
    statuses.iter().all(ApiStatus::is_alive)
}

#[cfg(feature = "api")]
mod client {
    use super::{ApiStatus, DEFAULT_ENDPOINTS};
    use crate::config::SuiteConfig;
    use crate::result::{HarnessError, HarnessResult};
    use tracing::{info, warn};

    /// Issues GET requests against the configured site
    #[derive(Debug, Clone)]
    pub struct ApiProbe {
        client: reqwest::Client,
        base_url: String,
        endpoints: Vec<String>,
    }

    impl ApiProbe {
        /// Probe for the configured base URL and request timeout
        ///
        /// # Errors
        ///
        /// Returns error if the HTTP client cannot be built
        pub fn new(config: &SuiteConfig) -> HarnessResult<Self> {
            let client = reqwest::Client::builder()
                .timeout(config.request_timeout())
                .build()
                .map_err(|e| HarnessError::Http {
                    message: e.to_string(),
                })?;
            Ok(Self {
                client,
                base_url: config.base_url.clone(),
                endpoints: DEFAULT_ENDPOINTS.iter().map(ToString::to_string).collect(),
            })
        }

        /// Replace the endpoint list
        #[must_use]
        pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.endpoints = endpoints.into_iter().map(Into::into).collect();
            self
        }

        /// Endpoints in check order
        #[must_use]
        pub fn endpoints(&self) -> &[String] {
            &self.endpoints
        }

        /// GET one endpoint
        pub async fn check(&self, path: &str) -> ApiStatus {
            let url = format!("{}{path}", self.base_url);
            match self.client.get(&url).send().await {
                Ok(resp) => {
                    let status = ApiStatus::responded(path, resp.status().as_u16());
                    if status.is_alive() {
                        info!(path, status = resp.status().as_u16(), "api endpoint alive");
                    } else {
                        warn!(path, status = resp.status().as_u16(), "api endpoint failing");
                    }
                    status
                }
                Err(e) => {
                    warn!(path, error = %e, "api endpoint unreachable");
                    ApiStatus::unreachable(path, e.to_string())
                }
            }
        }

        /// GET every endpoint, in order
        pub async fn check_all(&self) -> Vec<ApiStatus> {
            let mut statuses = Vec::with_capacity(self.endpoints.len());
            for path in &self.endpoints {
                statuses.push(self.check(path).await);
            }
            statuses
        }
    }
}

#[cfg(feature = "api")]
pub use client::ApiProbe;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod status_tests {
        use super::*;

        #[test]
        fn test_alive_boundary() {
            assert!(ApiStatus::responded("/api/health", 200).is_alive());
            assert!(ApiStatus::responded("/api/auth/user", 401).is_alive());
            assert!(ApiStatus::responded("/api/health", 499).is_alive());
            assert!(!ApiStatus::responded("/api/health", 500).is_alive());
            assert!(!ApiStatus::unreachable("/api/health", "refused").is_alive());
        }

        #[test]
        fn test_all_alive() {
            let ok = vec![
                ApiStatus::responded("/a", 200),
                ApiStatus::responded("/b", 404),
            ];
            assert!(all_alive(&ok));
            let bad = vec![ApiStatus::responded("/a", 200), ApiStatus::responded("/b", 502)];
            assert!(!all_alive(&bad));
        }

        #[test]
        fn test_display_and_json() {
            assert_eq!(ApiStatus::responded("/api/health", 204).to_string(), "/api/health 204");
            let down = ApiStatus::unreachable("/api/health", "connection refused");
            assert_eq!(down.to_string(), "/api/health unreachable: connection refused");
            let json = serde_json::to_value(ApiStatus::responded("/x", 200)).unwrap();
            assert!(json.get("error").is_none());
        }
    }

    #[cfg(feature = "api")]
    mod client_tests {
        use super::*;
        use crate::config::SuiteConfig;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        async fn serve(status_line: &'static str) -> String {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let _server = tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let response =
                        format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                    let _ = socket.write_all(response.as_bytes()).await;
                }
            });
            format!("http://{addr}")
        }

        #[tokio::test]
        async fn test_server_error_is_not_alive() {
            let base = serve("503 Service Unavailable").await;
            let cfg = SuiteConfig::default().with_base_url(&base).unwrap();
            let probe = ApiProbe::new(&cfg).unwrap().with_endpoints(["/api/health"]);
            let statuses = probe.check_all().await;
            assert_eq!(statuses, vec![ApiStatus::responded("/api/health", 503)]);
            assert!(!all_alive(&statuses));
        }

        #[tokio::test]
        async fn test_unauthorized_is_alive() {
            let base = serve("401 Unauthorized").await;
            let cfg = SuiteConfig::default().with_base_url(&base).unwrap();
            let probe = ApiProbe::new(&cfg).unwrap();
            assert_eq!(probe.endpoints().len(), DEFAULT_ENDPOINTS.len());
            assert!(probe.check("/api/auth/user").await.is_alive());
        }

        #[tokio::test]
        async fn test_refused_connection_has_no_status() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            let cfg = SuiteConfig::default()
                .with_base_url(&format!("http://{addr}"))
                .unwrap();
            let status = ApiProbe::new(&cfg).unwrap().check("/api/health").await;
            assert_eq!(status.status, None);
            assert!(status.error.is_some());
        }
    }
}
