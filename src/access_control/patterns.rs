//! Path pattern matching for route access
//!
//! Two pattern forms are supported:
//! - exact: `/employees` matches `/employees` and `/employees/`
//! - prefix wildcard: `/admin/*` matches `/admin` and anything below it
//!
//! There is no other wildcard syntax. Paths are compared case-sensitively.

use crate::error::ConfigError;
use std::fmt;

const WILDCARD_SUFFIX: &str = "/*";

/// A single compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches the path itself, tolerating one trailing slash
    Exact(String),
    /// Matches `base`, or `base` followed by `/` and anything
    Prefix { source: String, base: String },
}

impl PathPattern {
    /// Parse and validate a pattern string
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: String::new(),
                reason: "pattern is empty".to_string(),
            });
        }

        let (body, is_prefix) = match pattern.strip_suffix(WILDCARD_SUFFIX) {
            Some(base) => (base, true),
            None => (pattern, false),
        };

        if body.contains('*') {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "only a single trailing '/*' wildcard is supported".to_string(),
            });
        }

        if is_prefix {
            Ok(PathPattern::Prefix {
                source: pattern.to_string(),
                base: body.to_string(),
            })
        } else {
            Ok(PathPattern::Exact(pattern.to_string()))
        }
    }

    /// Check whether a concrete path satisfies this pattern
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => {
                path == exact || path.strip_suffix('/') == Some(exact.as_str())
            }
            // Segment boundary is strict: `/admin/*` does not match `/administration`
            PathPattern::Prefix { base, .. } => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }

    /// The pattern as it was configured
    pub fn as_str(&self) -> &str {
        match self {
            PathPattern::Exact(source) => source,
            PathPattern::Prefix { source, .. } => source,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Match a raw pattern string against a path
///
/// An empty or otherwise invalid pattern matches nothing.
pub fn matches(pattern: &str, path: &str) -> bool {
    PathPattern::parse(pattern)
        .map(|p| p.matches(path))
        .unwrap_or(false)
}

/// Ordered list of compiled path patterns
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<PathPattern>,
}

impl PatternMatcher {
    /// Compile a list of pattern strings, failing on the first invalid one
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let compiled = patterns
            .iter()
            .map(|p| PathPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns: compiled })
    }

    /// Create an empty pattern matcher (matches nothing)
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Check if a path matches any pattern
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// Return the first pattern, in declaration order, that matches a path
    pub fn find_match(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(path))
            .map(PathPattern::as_str)
    }

    pub fn as_slice(&self) -> &[PathPattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
