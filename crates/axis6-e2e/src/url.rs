//! URL matching for navigation waits and page identification.

use serde::{Deserialize, Serialize};

/// Pattern a page URL is matched against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Path equals the given path, or continues below it (`/settings` matches
    /// `/settings/privacy` but not `/settingsx`)
    Path(String),
    /// Route template with `:param` and `*` segments, each consuming exactly
    /// one path segment (`/chat/:id`)
    Route(String),
    /// Substring of the full URL
    Contains(String),
    /// Regex over the full URL
    Regex(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Path pattern
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Route template pattern
    #[must_use]
    pub fn route(template: impl Into<String>) -> Self {
        Self::Route(template.into())
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Path(expected) => {
                let path = path_of(url);
                let expected = expected.trim_end_matches('/');
                if expected.is_empty() {
                    return path == "/" || path.is_empty();
                }
                let path = path.trim_end_matches('/');
                path == expected
                    || path
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Self::Route(template) => route_matches(template, path_of(url)),
            Self::Contains(needle) => url.contains(needle.as_str()),
            Self::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(url))
                .unwrap_or(false),
            Self::Any => true,
        }
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "path {p}"),
            Self::Route(r) => write!(f, "route {r}"),
            Self::Contains(c) => write!(f, "url containing {c:?}"),
            Self::Regex(r) => write!(f, "url matching /{r}/"),
            Self::Any => write!(f, "any url"),
        }
    }
}

/// The path component of a URL: no scheme, host, query or fragment.
///
/// Relative inputs (`/dashboard?tab=1`) are accepted as-is.
#[must_use]
pub fn path_of(url: &str) -> &str {
    let after_scheme = match url.find("://") {
        Some(idx) => {
            let rest = &url[idx + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "/",
            }
        }
        None => url,
    };
    let end = after_scheme
        .find(|c| c == '?' || c == '#')
        .unwrap_or(after_scheme.len());
    &after_scheme[..end]
}

fn route_matches(template: &str, path: &str) -> bool {
    let pattern: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
    let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    pattern.len() == actual.len()
        && pattern
            .iter()
            .zip(&actual)
            .all(|(p, a)| *p == "*" || p.starts_with(':') || p == a)
}
