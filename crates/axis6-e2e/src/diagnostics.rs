//! Console and network diagnostics captured from the page.
//!
//! A capture script is installed before any application script runs. It
//! records `console.error`/`console.warn`, uncaught errors, unhandled
//! rejections and resources that finished with an HTTP error status. The
//! driver collects the buffer on demand.

use serde::{Deserialize, Serialize};

/// Global the capture script writes into
pub const DIAGNOSTICS_GLOBAL: &str = "__AXIS6_DIAGNOSTICS__";

/// Installed via `Page.addScriptToEvaluateOnNewDocument`
pub const CAPTURE_SCRIPT: &str = r"
(function() {
    if (window.__AXIS6_DIAGNOSTICS__) return;
    const sink = { console: [], network: [] };
    window.__AXIS6_DIAGNOSTICS__ = sink;

    function text(args) {
        return Array.from(args).map(a => {
            try {
                return typeof a === 'object' ? JSON.stringify(a) : String(a);
            } catch (e) {
                return String(a);
            }
        }).join(' ');
    }

    const originalError = console.error.bind(console);
    const originalWarn = console.warn.bind(console);
    console.error = function(...args) {
        sink.console.push({ level: 'error', text: text(args), source: null });
        originalError(...args);
    };
    console.warn = function(...args) {
        sink.console.push({ level: 'warning', text: text(args), source: null });
        originalWarn(...args);
    };

    window.addEventListener('error', function(e) {
        if (e.message) {
            sink.console.push({ level: 'error', text: 'Uncaught: ' + e.message, source: e.filename || null });
        }
    });
    window.addEventListener('unhandledrejection', function(e) {
        sink.console.push({ level: 'error', text: 'Unhandled rejection: ' + e.reason, source: null });
    });

    if (window.PerformanceObserver) {
        new PerformanceObserver(list => {
            for (const entry of list.getEntries()) {
                if (entry.responseStatus && entry.responseStatus >= 400) {
                    sink.network.push({ url: entry.name, status: entry.responseStatus });
                }
            }
        }).observe({ type: 'resource', buffered: true });
    }
})();
";

/// Evaluates to the captured buffer as a plain object
pub const COLLECT_SCRIPT: &str =
    "JSON.parse(JSON.stringify(window.__AXIS6_DIAGNOSTICS__ || { console: [], network: [] }))";

/// Console message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    /// console.error, uncaught errors, unhandled rejections
    Error,
    /// console.warn
    Warning,
}

/// One captured console message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    /// Severity
    pub level: ConsoleLevel,
    /// Message text
    pub text: String,
    /// Script URL, when known
    #[serde(default)]
    pub source: Option<String>,
}

impl ConsoleEntry {
    /// Error-level entry
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Error,
            text: text.into(),
            source: None,
        }
    }

    /// Warning-level entry
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Warning,
            text: text.into(),
            source: None,
        }
    }

    /// Attach the script source
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A sub-resource that finished with an HTTP error status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFailure {
    /// Resource URL
    pub url: String,
    /// HTTP status
    pub status: u16,
}

/// Everything captured on a page so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Console messages
    #[serde(default)]
    pub console: Vec<ConsoleEntry>,
    /// Failed resources
    #[serde(default)]
    pub network: Vec<NetworkFailure>,
}

impl Diagnostics {
    /// Parse the value produced by [`COLLECT_SCRIPT`]
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not have the expected shape.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Error-level entries not matched by `filter`
    #[must_use]
    pub fn unexpected_errors(&self, filter: &NoiseFilter) -> Vec<&ConsoleEntry> {
        self.console
            .iter()
            .filter(|e| e.level == ConsoleLevel::Error && !filter.is_noise(e))
            .collect()
    }

    /// Network failures not matched by `filter`
    #[must_use]
    pub fn unexpected_network_failures(&self, filter: &NoiseFilter) -> Vec<&NetworkFailure> {
        self.network
            .iter()
            .filter(|f| !filter.is_noise_url(&f.url))
            .collect()
    }

    /// Number of error-level entries
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.console
            .iter()
            .filter(|e| e.level == ConsoleLevel::Error)
            .count()
    }
}

/// Known-benign messages that never count as unexpected errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseFilter {
    text_patterns: Vec<String>,
    url_patterns: Vec<String>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self {
            text_patterns: vec![
                "third-party cookie".to_string(),
                "ResizeObserver loop".to_string(),
                "favicon".to_string(),
                "chrome-extension://".to_string(),
                "moz-extension://".to_string(),
            ],
            url_patterns: vec![
                "favicon".to_string(),
                "chrome-extension://".to_string(),
                "moz-extension://".to_string(),
            ],
        }
    }
}

impl NoiseFilter {
    /// Filter that treats nothing as noise
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            text_patterns: Vec::new(),
            url_patterns: Vec::new(),
        }
    }

    /// Add a message substring to ignore
    #[must_use]
    pub fn ignore_text(mut self, pattern: impl Into<String>) -> Self {
        self.text_patterns.push(pattern.into());
        self
    }

    /// Add a resource URL substring to ignore
    #[must_use]
    pub fn ignore_url(mut self, pattern: impl Into<String>) -> Self {
        self.url_patterns.push(pattern.into());
        self
    }

    /// Whether a console entry is benign
    #[must_use]
    pub fn is_noise(&self, entry: &ConsoleEntry) -> bool {
        let text = entry.text.to_ascii_lowercase();
        let source = entry.source.as_deref().unwrap_or_default();
        self.text_patterns.iter().any(|p| {
            text.contains(&p.to_ascii_lowercase()) || (!source.is_empty() && source.contains(p.as_str()))
        })
    }

    /// Whether a resource URL is benign
    #[must_use]
    pub fn is_noise_url(&self, url: &str) -> bool {
        self.url_patterns.iter().any(|p| url.contains(p.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_collected_value() {
        let value = json!({
            "console": [
                { "level": "error", "text": "Uncaught: boom", "source": "https://axis6.app/app.js" },
                { "level": "warning", "text": "deprecated", "source": null }
            ],
            "network": [ { "url": "https://axis6.app/api/checkins", "status": 500 } ]
        });
        let diag = Diagnostics::from_value(value).unwrap();
        assert_eq!(diag.console.len(), 2);
        assert_eq!(diag.console[0].source.as_deref(), Some("https://axis6.app/app.js"));
        assert_eq!(diag.network[0].status, 500);
        assert_eq!(diag.error_count(), 1);
    }

    #[test]
    fn test_parse_empty_object() {
        let diag = Diagnostics::from_value(json!({})).unwrap();
        assert_eq!(diag, Diagnostics::default());
    }

    #[test]
    fn test_default_filter_drops_known_noise() {
        let diag = Diagnostics {
            console: vec![
                ConsoleEntry::error("ResizeObserver loop completed with undelivered notifications."),
                ConsoleEntry::error("Chrome is moving towards a new experience that restricts Third-Party Cookies"),
                ConsoleEntry::error("Cannot read properties of undefined (reading 'map')"),
                ConsoleEntry::error("x").with_source("chrome-extension://abc/content.js"),
                ConsoleEntry::warning("slow render"),
            ],
            network: vec![
                NetworkFailure { url: "https://axis6.app/favicon.ico".into(), status: 404 },
                NetworkFailure { url: "https://axis6.app/api/streaks".into(), status: 502 },
            ],
        };
        let filter = NoiseFilter::default();
        let unexpected = diag.unexpected_errors(&filter);
        assert_eq!(unexpected.len(), 1);
        assert!(unexpected[0].text.contains("reading 'map'"));

        let failures = diag.unexpected_network_failures(&filter);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].status, 502);
    }

    #[test]
    fn test_strict_filter_keeps_everything() {
        let diag = Diagnostics {
            console: vec![ConsoleEntry::error("ResizeObserver loop limit exceeded")],
            network: vec![],
        };
        assert_eq!(diag.unexpected_errors(&NoiseFilter::strict()).len(), 1);
        let custom = NoiseFilter::strict().ignore_text("resizeobserver");
        assert!(diag.unexpected_errors(&custom).is_empty());
    }

    #[test]
    fn test_capture_script_shape() {
        assert!(CAPTURE_SCRIPT.contains(DIAGNOSTICS_GLOBAL));
        assert!(COLLECT_SCRIPT.contains(DIAGNOSTICS_GLOBAL));
        assert!(CAPTURE_SCRIPT.contains("unhandledrejection"));
    }
}
