//! Version suggestion and patch assembly
//!
//! This module provides:
//! - Suggestion options from CLI args and project config
//! - `suggest_version`, the per-requirement choice of the best allowed version
//! - Placeholder template matching
//! - The Suggester, which judges every requirement and arbitrates shared properties

mod filter;
mod property;
mod template;

pub use filter::SuggestOptions;
pub use template::{match_template, Bindings, Segment, Template};

use crate::domain::{ManifestPatch, PackageKey, Requirement, SkipReason, UpdateResult, VersionSpecifier};
use crate::error::SuggestError;
use crate::manifest::{placeholder_names, Manifest};
use crate::parser::VersionScheme;
use crate::registry::VersionLookup;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{info, warn};

/// Suggest the best allowed specifier for a requirement
///
/// Returns `current` unchanged when nothing better is allowed.
pub fn suggest_version(
    scheme: &dyn VersionScheme,
    current: &VersionSpecifier,
    available: &[String],
    forbid_major_bump: bool,
) -> Result<VersionSpecifier, SuggestError> {
    let cmp = |a: &str, b: &str| scheme.compare(a, b);
    let max = |versions: Vec<&String>| -> Option<String> {
        versions
            .into_iter()
            .max_by(|a, b| scheme.compare(a, b))
            .cloned()
    };

    match current {
        VersionSpecifier::Concrete(version) => {
            let candidates: Vec<&String> = available
                .iter()
                .filter(|v| !forbid_major_bump || !scheme.is_major_bump(version, v))
                .collect();
            let best = max(candidates).ok_or(SuggestError::NoVersionsAvailable)?;
            if scheme.compare(&best, version) == Ordering::Greater {
                Ok(VersionSpecifier::Concrete(best))
            } else {
                Ok(current.clone())
            }
        }
        VersionSpecifier::Range(range) => {
            let reference = max(available.iter().filter(|v| range.contains(v, &cmp)).collect())
                .or_else(|| range.lowest_bound(&cmp).map(str::to_string));

            let candidates: Vec<&String> = available
                .iter()
                .filter(|v| match (&reference, forbid_major_bump) {
                    (Some(reference), true) => !scheme.is_major_bump(reference, v),
                    _ => true,
                })
                .collect();
            let best = max(candidates).ok_or(SuggestError::NoVersionsAvailable)?;

            if range.contains(&best, &cmp) {
                Ok(current.clone())
            } else {
                Ok(VersionSpecifier::Concrete(best))
            }
        }
    }
}

/// Outcome of judging one requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgement {
    /// Version text the requirement should end up with; its current text when skipped,
    /// `None` when it cannot be determined
    pub desired: Option<String>,
    /// Why no upgrade is proposed
    pub skip: Option<SkipReason>,
}

impl Judgement {
    fn upgrade(version: String) -> Self {
        Self {
            desired: Some(version),
            skip: None,
        }
    }

    fn keep(requirement: &Requirement, reason: SkipReason) -> Self {
        Self {
            desired: Some(requirement.resolved.clone()),
            skip: Some(reason),
        }
    }
}

/// Suggestion output for one manifest
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestReport {
    /// Consolidated patch for the writer
    pub patch: ManifestPatch,
    /// Per-requirement results in declaration order
    pub results: Vec<UpdateResult>,
}

/// Suggestion engine that judges requirements and assembles the manifest patch
pub struct Suggester<'a> {
    scheme: &'a dyn VersionScheme,
    options: SuggestOptions,
}

impl<'a> Suggester<'a> {
    /// Create a new Suggester
    pub fn new(scheme: &'a dyn VersionScheme, options: SuggestOptions) -> Self {
        Self { scheme, options }
    }

    /// Returns the options in effect
    pub fn options(&self) -> &SuggestOptions {
        &self.options
    }

    /// Check if a requirement should be skipped before any lookup
    pub fn should_skip(&self, requirement: &Requirement) -> Option<SkipReason> {
        if self.options.is_excluded(requirement.name()) {
            return Some(SkipReason::Excluded);
        }
        if self.options.ignore_non_production && requirement.is_non_production() {
            return Some(SkipReason::NonProduction);
        }
        if requirement.is_unresolved() {
            let name = placeholder_names(&requirement.resolved)
                .into_iter()
                .next()
                .unwrap_or_default();
            return Some(SkipReason::UnresolvedProperty(name));
        }
        None
    }

    /// Distinct packages whose versions must be looked up, in declaration order
    pub fn packages_to_fetch(&self, manifest: &Manifest) -> Vec<PackageKey> {
        let mut packages: Vec<PackageKey> = Vec::new();
        for requirement in &manifest.requirements {
            if self.should_skip(requirement).is_none() && !packages.contains(&requirement.package)
            {
                packages.push(requirement.package.clone());
            }
        }
        packages
    }

    /// Judge one requirement given the lookup result for its package
    pub fn judge(&self, requirement: &Requirement, lookup: Option<&VersionLookup>) -> Judgement {
        if let Some(reason) = self.should_skip(requirement) {
            if matches!(reason, SkipReason::UnresolvedProperty(_)) {
                return Judgement {
                    desired: None,
                    skip: Some(reason),
                };
            }
            return Judgement::keep(requirement, reason);
        }

        let current = match self.scheme.parse_specifier(&requirement.resolved) {
            Ok(spec) => spec,
            Err(message) => {
                warn!("Skipping {}: {}", requirement, message);
                return Judgement::keep(
                    requirement,
                    SkipReason::InvalidSpecifier(requirement.resolved.clone()),
                );
            }
        };

        let versions = match lookup {
            Some(VersionLookup::Found(versions)) => versions,
            Some(VersionLookup::Failed(error)) => {
                warn!("Skipping {}: {}", requirement.name(), error);
                return Judgement::keep(requirement, SkipReason::FetchFailed(error.to_string()));
            }
            Some(VersionLookup::Cancelled) => {
                warn!("Skipping {}: lookup cancelled", requirement.name());
                return Judgement::keep(requirement, SkipReason::Cancelled);
            }
            None => {
                return Judgement::keep(
                    requirement,
                    SkipReason::FetchFailed("no lookup result".to_string()),
                );
            }
        };

        // Prereleases stay eligible when the requirement already tracks one
        let filtered: Vec<String>;
        let available: &[String] = if self.options.stable_only
            && !self.scheme.is_prerelease(current.as_str())
        {
            filtered = versions
                .iter()
                .filter(|v| !self.scheme.is_prerelease(v))
                .cloned()
                .collect();
            &filtered
        } else {
            versions
        };

        let forbid_major = self.options.forbids_major_bump(requirement.name());
        match suggest_version(self.scheme, &current, available, forbid_major) {
            Ok(suggested) if suggested.as_str() != requirement.resolved => {
                info!(
                    "Suggesting {} {} → {}",
                    requirement.name(),
                    requirement.resolved,
                    suggested
                );
                Judgement::upgrade(suggested.as_str().to_string())
            }
            Ok(_) => Judgement::keep(requirement, SkipReason::AlreadyLatest),
            Err(SuggestError::NoVersionsAvailable) => {
                warn!("Skipping {}: no versions available", requirement.name());
                Judgement::keep(requirement, SkipReason::NoVersionsAvailable)
            }
            Err(SuggestError::InvalidSpecifier { text, .. }) => {
                Judgement::keep(requirement, SkipReason::InvalidSpecifier(text))
            }
        }
    }

    /// Judge every requirement and build the consolidated patch
    pub fn suggest(
        &self,
        manifest: &Manifest,
        lookups: &HashMap<PackageKey, VersionLookup>,
    ) -> SuggestReport {
        let judgements: Vec<Judgement> = manifest
            .requirements
            .iter()
            .map(|requirement| self.judge(requirement, lookups.get(&requirement.package)))
            .collect();
        let (patch, results) = property::arbitrate(manifest, &judgements);
        SuggestReport { patch, results }
    }
}
