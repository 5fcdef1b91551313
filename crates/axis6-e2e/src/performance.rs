//! Page-load timings and budgets.

use serde::{Deserialize, Serialize};

/// Reads the Navigation Timing Level 2 entry and first-contentful-paint
pub const TIMING_SCRIPT: &str = r"(() => {
    const nav = performance.getEntriesByType('navigation')[0];
    const fcp = performance.getEntriesByName('first-contentful-paint')[0];
    const pos = v => (typeof v === 'number' && v > 0) ? v : null;
    return {
        ttfb_ms: nav ? pos(nav.responseStart - nav.requestStart) : null,
        dom_content_loaded_ms: nav ? pos(nav.domContentLoadedEventEnd - nav.startTime) : null,
        load_ms: nav ? pos(nav.loadEventEnd - nav.startTime) : null,
        first_contentful_paint_ms: fcp ? pos(fcp.startTime) : null
    };
})()";

/// Timings of the current document; a metric the browser has not reported
/// yet is `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationTiming {
    /// Request start to first response byte
    #[serde(default)]
    pub ttfb_ms: Option<f64>,
    /// Navigation start to DOMContentLoaded end
    #[serde(default)]
    pub dom_content_loaded_ms: Option<f64>,
    /// Navigation start to load end
    #[serde(default)]
    pub load_ms: Option<f64>,
    /// First contentful paint
    #[serde(default)]
    pub first_contentful_paint_ms: Option<f64>,
}

/// Upper bounds for page-load metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceBudget {
    /// Max DOMContentLoaded (ms)
    pub max_dom_content_loaded_ms: f64,
    /// Max load (ms)
    pub max_load_ms: f64,
    /// Max first contentful paint (ms)
    pub max_first_contentful_paint_ms: f64,
}

impl Default for PerformanceBudget {
    fn default() -> Self {
        Self {
            max_dom_content_loaded_ms: 3000.0,
            max_load_ms: 5000.0,
            max_first_contentful_paint_ms: 2500.0,
        }
    }
}

/// A metric over its limit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetViolation {
    /// Metric name
    pub metric: &'static str,
    /// Measured value (ms)
    pub actual_ms: f64,
    /// Budget (ms)
    pub limit_ms: f64,
}

impl std::fmt::Display for BudgetViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} took {:.0}ms (budget {:.0}ms)",
            self.metric, self.actual_ms, self.limit_ms
        )
    }
}

impl PerformanceBudget {
    /// Metrics over budget. Missing metrics are not violations.
    #[must_use]
    pub fn check(&self, timing: &NavigationTiming) -> Vec<BudgetViolation> {
        [
            (
                "DOMContentLoaded",
                timing.dom_content_loaded_ms,
                self.max_dom_content_loaded_ms,
            ),
            ("load", timing.load_ms, self.max_load_ms),
            (
                "first-contentful-paint",
                timing.first_contentful_paint_ms,
                self.max_first_contentful_paint_ms,
            ),
        ]
        .into_iter()
        .filter_map(|(metric, actual, limit)| {
            actual
                .filter(|ms| *ms > limit)
                .map(|actual_ms| BudgetViolation {
                    metric,
                    actual_ms,
                    limit_ms: limit,
                })
        })
        .collect()
    }
}
