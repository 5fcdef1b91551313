//! PNG screenshots written under the configured directory.
//!
//! Files are named `{phase}-{page}.png`, each part reduced to `[a-z0-9-]`.

use crate::driver::PageDriver;
use crate::result::{HarnessError, HarnessResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes screenshots to one directory, creating it on first use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    /// Store rooted at `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `{phase}-{page}.png` goes
    #[must_use]
    pub fn path_for(&self, phase: &str, page: &str) -> PathBuf {
        self.dir
            .join(format!("{}-{}.png", sanitize(phase), sanitize(page)))
    }

    /// Write PNG bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, phase: &str, page: &str, png: &[u8]) -> HarnessResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| HarnessError::Screenshot {
                message: format!("{}: {e}", self.dir.display()),
            })?;
        let path = self.path_for(phase, page);
        tokio::fs::write(&path, png)
            .await
            .map_err(|e| HarnessError::Screenshot {
                message: format!("{}: {e}", path.display()),
            })?;
        debug!(path = %path.display(), bytes = png.len(), "screenshot saved");
        Ok(path)
    }

    /// Capture the current page and save it
    ///
    /// # Errors
    ///
    /// Returns an error if capture or writing fails.
    pub async fn capture(
        &self,
        driver: &dyn PageDriver,
        phase: &str,
        page: &str,
    ) -> HarnessResult<PathBuf> {
        let png = driver.screenshot().await?;
        self.save(phase, page, &png).await
    }
}

/// Reduce a name to lowercase ASCII letters, digits and single dashes
#[must_use]
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        let _ = out.pop();
    }
    if out.is_empty() {
        out.push_str("page");
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockPage};
    use proptest::prelude::*;

    mod naming_tests {
        use super::*;

        #[test]
        fn test_sanitize() {
            assert_eq!(sanitize("Responsive Layout: iPhone SE"), "responsive-layout-iphone-se");
            assert_eq!(sanitize("settings/axis_customization"), "settings-axis-customization");
            assert_eq!(sanitize("--"), "page");
            assert_eq!(sanitize(""), "page");
        }

        #[test]
        fn test_path_for() {
            let store = ScreenshotStore::new("/tmp/shots");
            assert_eq!(
                store.path_for("failure", "dashboard_shows_hexagon"),
                PathBuf::from("/tmp/shots/failure-dashboard-shows-hexagon.png")
            );
        }

        proptest! {
            #[test]
            fn prop_sanitized_names_are_file_safe(name in ".{0,40}") {
                let s = sanitize(&name);
                prop_assert!(!s.is_empty());
                prop_assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
                prop_assert!(!s.starts_with('-') && !s.ends_with('-'));
                prop_assert!(!s.contains("--"));
            }
        }
    }

    mod io_tests {
        use super::*;

        #[tokio::test]
        async fn test_save_creates_directory() {
            let tmp = tempfile::tempdir().unwrap();
            let store = ScreenshotStore::new(tmp.path().join("nested").join("shots"));
            let path = store.save("after", "landing", b"\x89PNG").await.unwrap();
            assert!(path.ends_with("after-landing.png"));
            assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
        }

        #[tokio::test]
        async fn test_capture_from_driver() {
            let tmp = tempfile::tempdir().unwrap();
            let store = ScreenshotStore::new(tmp.path());
            let driver = MockDriver::new()
                .with_page("/", MockPage::new())
                .with_screenshot(vec![1, 2, 3]);
            let path = store.capture(&driver, "before", "Landing").await.unwrap();
            assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
        }
    }
}
