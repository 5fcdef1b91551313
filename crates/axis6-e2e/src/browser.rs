//! Browser control for headless testing.
//!
//! With the `browser` feature this module drives Chromium over the Chrome
//! `DevTools` Protocol via chromiumoxide. `Browser` is a [`DriverFactory`]:
//! every scenario gets its own page with the diagnostics capture script
//! installed before any application script runs.
//!
//! [`DriverFactory`]: crate::driver::DriverFactory

use crate::config::SuiteConfig;
use std::time::Duration;

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Upper bound for a single navigation
    pub navigation_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1440,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

impl BrowserConfig {
    /// Browser settings taken from the suite configuration
    #[must_use]
    pub fn from_suite(config: &SuiteConfig) -> Self {
        Self {
            headless: config.headless,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            chromium_path: config.chromium_path.clone(),
            sandbox: true,
            navigation_timeout: config.navigation_timeout(),
        }
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// CDP implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(
    clippy::significant_drop_tightening,
    clippy::missing_errors_doc,
    clippy::cast_possible_wrap
)]
mod cdp {
    use super::BrowserConfig;
    use crate::diagnostics::{Diagnostics, CAPTURE_SCRIPT, COLLECT_SCRIPT};
    use crate::driver::{DriverFactory, PageDriver};
    use crate::locator::Selector;
    use crate::performance::{NavigationTiming, TIMING_SCRIPT};
    use crate::result::{HarnessError, HarnessResult};
    use crate::viewport::{DeviceProfile, LayoutMetrics, LAYOUT_SCRIPT};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::page::{
        AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
    use chromiumoxide::cdp::browser_protocol::target::{
        CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> HarnessResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .request_timeout(config.navigation_timeout);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| HarnessError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| HarnessError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            info!(headless = config.headless, "browser launched");
            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Open a page with diagnostics capture installed.
        ///
        /// Every page gets its own browser context, so cookies and storage
        /// never carry over from one scenario to the next. Closing the page
        /// disposes the context.
        pub async fn new_page(&self) -> HarnessResult<ChromiumDriver> {
            let (page, context) = {
                let browser = self.inner.lock().await;
                let context = browser
                    .execute(CreateBrowserContextParams::default())
                    .await
                    .map_err(|e| HarnessError::Page {
                        message: format!("cannot create browser context: {e}"),
                    })?
                    .result
                    .browser_context_id;
                let target = CreateTargetParams::builder()
                    .url("about:blank")
                    .browser_context_id(context.clone())
                    .build()
                    .map_err(|message| HarnessError::Page { message })?;
                let page = browser.new_page(target).await.map_err(|e| HarnessError::Page {
                    message: e.to_string(),
                })?;
                (page, context)
            };
            debug!(context = ?context, "page opened in fresh context");

            let driver = ChromiumDriver {
                page,
                context,
                browser: Arc::clone(&self.inner),
                navigation_timeout: self.config.navigation_timeout,
            };
            if let Err(e) = driver.prepare(&self.config).await {
                let _ = driver.close().await;
                return Err(e);
            }
            Ok(driver)
        }

        /// Close the browser
        pub async fn close(self) -> HarnessResult<()> {
            {
                let mut browser = self.inner.lock().await;
                browser
                    .close()
                    .await
                    .map_err(|e| HarnessError::BrowserLaunch {
                        message: e.to_string(),
                    })?;
            }
            self.handle.abort();
            Ok(())
        }
    }

    #[async_trait]
    impl DriverFactory for Browser {
        async fn new_page(&self) -> HarnessResult<Box<dyn PageDriver>> {
            Ok(Box::new(Self::new_page(self).await?))
        }
    }

    /// One Chromium tab
    #[derive(Debug)]
    pub struct ChromiumDriver {
        page: CdpPage,
        context: BrowserContextId,
        browser: Arc<Mutex<CdpBrowser>>,
        navigation_timeout: Duration,
    }

    impl ChromiumDriver {
        async fn prepare(&self, config: &BrowserConfig) -> HarnessResult<()> {
            self.page
                .execute(AddScriptToEvaluateOnNewDocumentParams::new(CAPTURE_SCRIPT))
                .await
                .map_err(|e| HarnessError::Page {
                    message: e.to_string(),
                })?;
            self.set_viewport(&DeviceProfile::desktop(
                config.viewport_width,
                config.viewport_height,
            ))
            .await
        }

        async fn eval<T: DeserializeOwned>(&self, expr: &str) -> HarnessResult<T> {
            let result = self
                .page
                .evaluate(expr)
                .await
                .map_err(|e| HarnessError::Evaluation {
                    message: e.to_string(),
                })?;
            let value = result.value().cloned().unwrap_or(serde_json::Value::Null);
            serde_json::from_value(value).map_err(|e| HarnessError::Evaluation {
                message: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl PageDriver for ChromiumDriver {
        async fn navigate(&self, url: &str) -> HarnessResult<()> {
            debug!(url, "navigate");
            match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(HarnessError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
                Err(_) => Err(HarnessError::Navigation {
                    url: url.to_string(),
                    message: format!(
                        "no load event within {}ms",
                        self.navigation_timeout.as_millis()
                    ),
                }),
            }
        }

        async fn current_url(&self) -> HarnessResult<String> {
            let url = self.page.url().await.map_err(|e| HarnessError::Page {
                message: e.to_string(),
            })?;
            Ok(url.unwrap_or_else(|| "about:blank".to_string()))
        }

        async fn count(&self, selector: &Selector) -> HarnessResult<usize> {
            self.eval(&selector.to_count_query()).await
        }

        async fn is_visible(&self, selector: &Selector) -> HarnessResult<bool> {
            self.eval(&selector.to_visible_query()).await
        }

        async fn text_content(&self, selector: &Selector) -> HarnessResult<Option<String>> {
            self.eval(&selector.to_text_query()).await
        }

        async fn click(&self, selector: &Selector) -> HarnessResult<()> {
            let clicked: bool = self.eval(&selector.to_click_script()).await?;
            if clicked {
                Ok(())
            } else {
                Err(HarnessError::ElementNotFound {
                    selector: selector.to_string(),
                })
            }
        }

        async fn fill(&self, selector: &Selector, value: &str) -> HarnessResult<()> {
            let filled: bool = self.eval(&selector.to_fill_script(value)).await?;
            if filled {
                Ok(())
            } else {
                Err(HarnessError::ElementNotFound {
                    selector: selector.to_string(),
                })
            }
        }

        async fn set_viewport(&self, profile: &DeviceProfile) -> HarnessResult<()> {
            let params = SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(profile.width))
                .height(i64::from(profile.height))
                .device_scale_factor(profile.device_scale_factor)
                .mobile(profile.is_mobile)
                .build()
                .map_err(|message| HarnessError::Page { message })?;
            self.page
                .execute(params)
                .await
                .map_err(|e| HarnessError::Page {
                    message: e.to_string(),
                })?;
            debug!(device = profile.name, profile.width, profile.height, "viewport set");
            Ok(())
        }

        async fn layout_metrics(&self) -> HarnessResult<LayoutMetrics> {
            self.eval(LAYOUT_SCRIPT).await
        }

        async fn navigation_timing(&self) -> HarnessResult<NavigationTiming> {
            self.eval(TIMING_SCRIPT).await
        }

        async fn diagnostics(&self) -> HarnessResult<Diagnostics> {
            self.eval(COLLECT_SCRIPT).await
        }

        async fn screenshot(&self) -> HarnessResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                self.page
                    .execute(params)
                    .await
                    .map_err(|e| HarnessError::Screenshot {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| HarnessError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn close(&self) -> HarnessResult<()> {
            let closed = self
                .page
                .clone()
                .close()
                .await
                .map_err(|e| HarnessError::Page {
                    message: e.to_string(),
                });
            let browser = self.browser.lock().await;
            browser
                .execute(DisposeBrowserContextParams::new(self.context.clone()))
                .await
                .map_err(|e| HarnessError::Page {
                    message: format!("cannot dispose browser context: {e}"),
                })?;
            closed
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, ChromiumDriver};
