//! Path matching logic.
//!
//! # Responsibilities
//! - Match a path against a single prefix (case-sensitive)
//! - Combine prefixes with OR semantics for route tables
//! - Decide which paths skip the gate entirely (assets, API, framework internals)
//!
//! # Design Decisions
//! - Plain `starts_with`: `/dashboardX` matches `/dashboard`
//! - Empty set = never matches
//! - No regex to guarantee O(n) matching

/// Trait for matching request paths against conditions.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl PathMatcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// An ordered route table; matches when any prefix does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSet {
    prefixes: Vec<PathPrefixMatcher>,
}

impl PrefixSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }

    /// First prefix matching `path`, for logging.
    pub fn find(&self, path: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|m| m.matches(path))
            .map(PathPrefixMatcher::prefix)
    }
}

impl PathMatcher for PrefixSet {
    fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|m| m.matches(path))
    }
}

/// Selects paths the gate never sees.
///
/// Equivalent to the page matcher `/((?!api|trpc|_next|_vercel|.*\..*).*)`:
/// the text after the leading slash must not start with an excluded segment
/// prefix and, when `exclude_dotted` is set, must not contain a dot.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    segment_prefixes: Vec<String>,
    exclude_dotted: bool,
}

impl ExclusionMatcher {
    pub fn new(segment_prefixes: Vec<String>, exclude_dotted: bool) -> Self {
        Self {
            segment_prefixes,
            exclude_dotted,
        }
    }

    pub fn from_config(config: &crate::config::ExclusionConfig) -> Self {
        Self::new(config.segment_prefixes.clone(), config.exclude_dotted)
    }
}

impl PathMatcher for ExclusionMatcher {
    fn matches(&self, path: &str) -> bool {
        let tail = path.strip_prefix('/').unwrap_or(path);
        if self.exclude_dotted && tail.contains('.') {
            return true;
        }
        self.segment_prefixes
            .iter()
            .any(|p| !p.is_empty() && tail.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusionConfig;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/dashboard");
        assert!(matcher.matches("/dashboard"));
        assert!(matcher.matches("/dashboard/products"));
        // plain prefix semantics
        assert!(matcher.matches("/dashboardX"));
        assert!(!matcher.matches("/Dashboard"));
        assert!(!matcher.matches("/en/dashboard"));
    }

    #[test]
    fn test_prefix_set_any() {
        let set = PrefixSet::new(["/auth/login", "/auth/register"]);
        assert!(set.matches("/auth/register?step=2"));
        assert_eq!(set.find("/auth/login/otp"), Some("/auth/login"));
        assert!(!set.matches("/auth"));
        assert!(!PrefixSet::default().matches("/anything"));
    }

    #[test]
    fn test_exclusions_default() {
        let matcher = ExclusionMatcher::from_config(&ExclusionConfig::default());
        for path in [
            "/api/products",
            "/trpc/x",
            "/_next/static/chunk.js",
            "/_vercel/insights",
            "/favicon.ico",
            "/images/logo.png",
            "/en/report.pdf",
            "/apiary",
        ] {
            assert!(matcher.matches(path), "{path} should be excluded");
        }
        for path in ["/", "/en", "/dashboard/products", "/auth/login", "/en/api"] {
            assert!(!matcher.matches(path), "{path} should reach the gate");
        }
    }

    #[test]
    fn test_exclusions_without_dots() {
        let matcher = ExclusionMatcher::new(vec!["api".into()], false);
        assert!(!matcher.matches("/favicon.ico"));
        assert!(matcher.matches("/api/v1"));
    }
}
