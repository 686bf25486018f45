//! Recognising hostnames the platform assigned automatically.

use std::fmt;

/// Suffix of hostnames handed out by the platform.
pub const DEFAULT_AUTO_SUFFIX: &str = ".test.functioncompute.com";

/// Decides whether a hostname was generated by the platform.
pub trait AutoDomainMatcher: Send + Sync + fmt::Debug {
    /// Returns true if `domain` is a platform-generated hostname.
    fn is_auto_domain(&self, domain: &str) -> bool;
}

/// Matches hostnames ending in a fixed suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMatcher {
    suffix: String,
}

impl SuffixMatcher {
    /// Create a matcher for `suffix`.
    #[must_use]
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// The suffix being matched.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Default for SuffixMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_SUFFIX)
    }
}

impl AutoDomainMatcher for SuffixMatcher {
    fn is_auto_domain(&self, domain: &str) -> bool {
        !self.suffix.is_empty() && domain.ends_with(&self.suffix)
    }
}
