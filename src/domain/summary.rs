//! Per-manifest update summary

use super::{Ecosystem, ManifestPatch, UpdateResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Update result for a single manifest file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestUpdateResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Ecosystem of this manifest
    pub ecosystem: Ecosystem,
    /// Root project coordinates (`group:artifact:version`)
    pub root: String,
    /// Individual requirement results in declaration order
    pub results: Vec<UpdateResult>,
    /// Consolidated patch handed to the writer
    pub patch: ManifestPatch,
    /// Whether the file was actually modified
    pub modified: bool,
}

impl ManifestUpdateResult {
    /// Creates a new ManifestUpdateResult
    pub fn new(path: impl Into<PathBuf>, ecosystem: Ecosystem, root: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ecosystem,
            root: root.into(),
            results: Vec::new(),
            patch: ManifestPatch::new(),
            modified: false,
        }
    }

    /// Adds an update result
    pub fn add_result(&mut self, result: UpdateResult) {
        self.results.push(result);
    }

    /// Returns the number of updates
    pub fn update_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_update()).count()
    }

    /// Returns the number of skips
    pub fn skip_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skip()).count()
    }

    /// Returns all updates
    pub fn updates(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_update())
    }

    /// Returns all skips
    pub fn skips(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_skip())
    }

    /// Returns skips caused by failed or aborted version lookups
    pub fn lookup_failures(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| {
            matches!(r, UpdateResult::Skip { reason, .. } if reason.is_lookup_failure())
        })
    }

    /// Returns true if any requirement was updated
    pub fn has_updates(&self) -> bool {
        self.update_count() > 0
    }

    /// Returns true if some lookups failed and their packages were left untouched
    pub fn is_partial(&self) -> bool {
        self.lookup_failures().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyOrigin, PackageKey, Requirement, SkipReason, UpdateVia};

    fn sample_requirement(artifact: &str) -> Requirement {
        Requirement::new(
            PackageKey::maven("org.example", artifact),
            "1.0.0",
            DependencyOrigin::Direct,
        )
    }

    fn sample_update(artifact: &str) -> UpdateResult {
        UpdateResult::update(sample_requirement(artifact), "2.0.0", UpdateVia::Direct)
    }

    fn sample_skip(artifact: &str, reason: SkipReason) -> UpdateResult {
        UpdateResult::skip(sample_requirement(artifact), reason)
    }

    fn new_result() -> ManifestUpdateResult {
        ManifestUpdateResult::new("/path/to/pom.xml", Ecosystem::Maven, "com.acme:app:1.0")
    }

    #[test]
    fn test_manifest_update_result_new() {
        let result = new_result();
        assert_eq!(result.path, PathBuf::from("/path/to/pom.xml"));
        assert_eq!(result.ecosystem, Ecosystem::Maven);
        assert_eq!(result.root, "com.acme:app:1.0");
        assert!(result.results.is_empty());
        assert!(result.patch.is_empty());
        assert!(!result.modified);
    }

    #[test]
    fn test_manifest_update_result_mixed() {
        let mut result = new_result();
        result.add_result(sample_update("abc"));
        result.add_result(sample_skip("def", SkipReason::AlreadyLatest));
        result.add_result(sample_update("xyz"));

        assert_eq!(result.results.len(), 3);
        assert_eq!(result.update_count(), 2);
        assert_eq!(result.skip_count(), 1);
        assert!(result.has_updates());
        assert!(!result.is_partial());
    }

    #[test]
    fn test_iterators() {
        let mut result = new_result();
        result.add_result(sample_update("abc"));
        result.add_result(sample_skip("def", SkipReason::Excluded));

        let updates: Vec<_> = result.updates().collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].package_name(), "org.example:abc");

        let skips: Vec<_> = result.skips().collect();
        assert_eq!(skips.len(), 1);
        assert_eq!(skips[0].package_name(), "org.example:def");
    }

    #[test]
    fn test_partial_on_lookup_failure() {
        let mut result = new_result();
        result.add_result(sample_update("abc"));
        result.add_result(sample_skip("def", SkipReason::FetchFailed("boom".into())));
        result.add_result(sample_skip("ghi", SkipReason::Cancelled));

        assert!(result.is_partial());
        assert_eq!(result.lookup_failures().count(), 2);
    }

    #[test]
    fn test_serde_manifest_update_result() {
        let mut result = new_result();
        result.add_result(sample_update("abc"));

        let json = serde_json::to_string(&result).unwrap();
        let parsed: ManifestUpdateResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
