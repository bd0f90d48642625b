//! Dependency tagging for semantic categorization.

use std::time::Duration;

/// Data sources the storefront depends on.
///
/// Each tag carries default timeouts and retry counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Product catalog listing and lookups.
    Catalog,
    /// Reliability scoring service.
    Reliability,
}

impl DependencyTag {
    /// Get the default timeout for one attempt against this dependency.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Catalog => Duration::from_millis(3000),
            Self::Reliability => Duration::from_millis(5000),
        }
    }

    /// Get the default max retries for this dependency type.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::Catalog => 2,
            // Scoring is advisory; a failure just skips the warnings.
            Self::Reliability => 0,
        }
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Reliability => "reliability",
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_retries_twice() {
        assert_eq!(DependencyTag::Catalog.default_max_retries(), 2);
        assert_eq!(DependencyTag::Reliability.default_max_retries(), 0);
    }

    #[test]
    fn test_names() {
        assert_eq!(DependencyTag::Catalog.to_string(), "catalog");
        assert_eq!(DependencyTag::Reliability.to_string(), "reliability");
    }
}
