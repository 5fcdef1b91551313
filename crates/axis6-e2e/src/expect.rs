//! Hard assertions on locators.
//!
//! `expect(locator).to_be_visible().check(driver).await?` polls until the
//! condition holds or the locator's timeout runs out, then fails with
//! `HarnessError::AssertionFailed` describing what was last observed.

use crate::driver::PageDriver;
use crate::locator::Locator;
use crate::result::{HarnessError, HarnessResult};
use crate::wait::poll_until;

/// Assertion builder for locators
#[derive(Debug, Clone)]
pub struct Expect {
    locator: Locator,
}

impl Expect {
    /// Create a new expectation for a locator
    #[must_use]
    pub const fn new(locator: Locator) -> Self {
        Self { locator }
    }

    /// Assert the element has specific text (whitespace-trimmed)
    pub fn to_have_text(&self, expected: impl Into<String>) -> ExpectAssertion {
        ExpectAssertion::HasText {
            locator: self.locator.clone(),
            expected: expected.into(),
        }
    }

    /// Assert the element is visible
    pub fn to_be_visible(&self) -> ExpectAssertion {
        ExpectAssertion::IsVisible {
            locator: self.locator.clone(),
        }
    }

    /// Assert the element is hidden or absent
    pub fn to_be_hidden(&self) -> ExpectAssertion {
        ExpectAssertion::IsHidden {
            locator: self.locator.clone(),
        }
    }

    /// Assert the element count
    pub fn to_have_count(&self, count: usize) -> ExpectAssertion {
        ExpectAssertion::HasCount {
            locator: self.locator.clone(),
            expected: count,
        }
    }

    /// Assert the element contains text
    pub fn to_contain_text(&self, text: impl Into<String>) -> ExpectAssertion {
        ExpectAssertion::ContainsText {
            locator: self.locator.clone(),
            expected: text.into(),
        }
    }
}

/// Assertion types for `expect()`
#[derive(Debug, Clone)]
pub enum ExpectAssertion {
    /// Element has exact text
    HasText {
        /// The locator
        locator: Locator,
        /// Expected text
        expected: String,
    },
    /// Element is visible
    IsVisible {
        /// The locator
        locator: Locator,
    },
    /// Element is hidden
    IsHidden {
        /// The locator
        locator: Locator,
    },
    /// Element count matches
    HasCount {
        /// The locator
        locator: Locator,
        /// Expected count
        expected: usize,
    },
    /// Element contains text
    ContainsText {
        /// The locator
        locator: Locator,
        /// Text to find
        expected: String,
    },
}

impl ExpectAssertion {
    /// The locator under test
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        match self {
            Self::HasText { locator, .. }
            | Self::IsVisible { locator }
            | Self::IsHidden { locator }
            | Self::HasCount { locator, .. }
            | Self::ContainsText { locator, .. } => locator,
        }
    }

    fn describe(&self) -> String {
        let selector = self.locator().selector();
        match self {
            Self::HasText { expected, .. } => format!("{selector} to have text '{expected}'"),
            Self::IsVisible { .. } => format!("{selector} to be visible"),
            Self::IsHidden { .. } => format!("{selector} to be hidden"),
            Self::HasCount { expected, .. } => format!("{selector} to have count {expected}"),
            Self::ContainsText { expected, .. } => {
                format!("{selector} to contain text '{expected}'")
            }
        }
    }

    /// Validate a text assertion against an observed value
    ///
    /// # Errors
    ///
    /// Returns error if assertion fails
    pub fn validate(&self, actual: &str) -> HarnessResult<()> {
        match self {
            Self::HasText { expected, .. } => {
                if actual.trim() == expected {
                    Ok(())
                } else {
                    Err(HarnessError::assertion(format!(
                        "Expected text '{expected}' but got '{}'",
                        actual.trim()
                    )))
                }
            }
            Self::ContainsText { expected, .. } => {
                if actual.contains(expected.as_str()) {
                    Ok(())
                } else {
                    Err(HarnessError::assertion(format!(
                        "Expected text to contain '{expected}' but got '{actual}'"
                    )))
                }
            }
            Self::IsVisible { .. } | Self::IsHidden { .. } | Self::HasCount { .. } => Ok(()),
        }
    }

    /// Validate count assertion
    ///
    /// # Errors
    ///
    /// Returns error if count doesn't match
    pub fn validate_count(&self, actual: usize) -> HarnessResult<()> {
        match self {
            Self::HasCount { expected, .. } if actual != *expected => Err(HarnessError::assertion(
                format!("Expected count {expected} but got {actual}"),
            )),
            _ => Ok(()),
        }
    }

    async fn evaluate(&self, driver: &dyn PageDriver) -> HarnessResult<()> {
        let locator = self.locator();
        match self {
            Self::HasText { .. } | Self::ContainsText { .. } => {
                match locator.text(driver).await? {
                    Some(text) => self.validate(&text),
                    None => Err(HarnessError::assertion(format!(
                        "Expected {} to have text but it is not on the page",
                        locator.selector()
                    ))),
                }
            }
            Self::IsVisible { .. } => {
                if locator.is_visible(driver).await? {
                    Ok(())
                } else {
                    Err(HarnessError::assertion(format!(
                        "Expected {} to be visible",
                        locator.selector()
                    )))
                }
            }
            Self::IsHidden { .. } => {
                if locator.is_visible(driver).await? {
                    Err(HarnessError::assertion(format!(
                        "Expected {} to be hidden",
                        locator.selector()
                    )))
                } else {
                    Ok(())
                }
            }
            Self::HasCount { .. } => self.validate_count(locator.count(driver).await?),
        }
    }

    /// Poll until the assertion holds, bounded by the locator timeout
    ///
    /// # Errors
    ///
    /// `AssertionFailed` with the last observation when the timeout runs out;
    /// driver errors are returned as-is.
    pub async fn check(&self, driver: &dyn PageDriver) -> HarnessResult<()> {
        let options = self.locator().options().wait_options();
        let outcome = poll_until(&options, &self.describe(), || async {
            match self.evaluate(driver).await {
                Ok(()) => Ok(Some(())),
                Err(e) if e.is_assertion() => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await;

        match outcome {
            Err(HarnessError::Timeout { ms, .. }) => {
                self.evaluate(driver).await.map_err(|e| match e {
                    HarnessError::AssertionFailed { message } => {
                        HarnessError::assertion(format!("{message} (waited {ms}ms)"))
                    }
                    other => other,
                })
            }
            other => other,
        }
    }
}

/// Create an expectation for a locator
#[must_use]
pub fn expect(locator: Locator) -> Expect {
    Expect::new(locator)
}
