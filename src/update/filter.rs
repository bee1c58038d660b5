//! Suggestion options
//!
//! This module provides the SuggestOptions struct that encapsulates
//! the user constraints applied while suggesting versions.

/// Constraints for version suggestion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestOptions {
    /// Skip requirements tagged as non-production (`test` scope)
    pub ignore_non_production: bool,
    /// Packages that never receive a suggestion
    pub excluded: Vec<String>,
    /// Packages that must never receive a major-version bump
    pub major_bump_exceptions: Vec<String>,
    /// Drop prerelease candidates unless the current version is a prerelease
    pub stable_only: bool,
}

impl SuggestOptions {
    /// Create options with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether non-production requirements are skipped
    pub fn with_ignore_non_production(mut self, ignore: bool) -> Self {
        self.ignore_non_production = ignore;
        self
    }

    /// Set packages to exclude
    pub fn with_excluded(mut self, excluded: Vec<String>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Set packages that must keep their major version
    pub fn with_major_bump_exceptions(mut self, packages: Vec<String>) -> Self {
        self.major_bump_exceptions = packages;
        self
    }

    /// Set whether prereleases are dropped from the candidates
    pub fn with_stable_only(mut self, stable_only: bool) -> Self {
        self.stable_only = stable_only;
        self
    }

    /// Check if a package is excluded
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|p| p == name)
    }

    /// Check if a package must keep its major version
    pub fn forbids_major_bump(&self, name: &str) -> bool {
        self.major_bump_exceptions.iter().any(|p| p == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_options() {
        let options = SuggestOptions::new();
        assert!(!options.ignore_non_production);
        assert!(options.excluded.is_empty());
        assert!(options.major_bump_exceptions.is_empty());
        assert!(!options.stable_only);
    }

    #[test]
    fn test_with_excluded() {
        let options = SuggestOptions::new().with_excluded(vec!["org.example:abc".to_string()]);
        assert!(options.is_excluded("org.example:abc"));
        assert!(!options.is_excluded("org.example:def"));
    }

    #[test]
    fn test_with_major_bump_exceptions() {
        let options =
            SuggestOptions::new().with_major_bump_exceptions(vec!["org.example:abc".to_string()]);
        assert!(options.forbids_major_bump("org.example:abc"));
        assert!(!options.forbids_major_bump("org.example:xyz"));
    }

    #[test]
    fn test_builder_chain() {
        let options = SuggestOptions::new()
            .with_ignore_non_production(true)
            .with_stable_only(true)
            .with_excluded(vec!["a:b".to_string()]);
        assert!(options.ignore_non_production);
        assert!(options.stable_only);
        assert_eq!(options.excluded, vec!["a:b"]);
    }
}
