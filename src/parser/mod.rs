//! Version schemes for supported package ecosystems
//!
//! A scheme supplies the ecosystem-specific pieces the suggestion engine needs:
//! - Parsing requirement text into a concrete version or a range
//! - A total ordering over version strings
//! - The "major component" and the major-bump predicate
//! - Prerelease detection

mod maven;

pub use maven::{ComparableVersion, MavenVersionScheme};

use crate::domain::{Ecosystem, VersionSpecifier};
use std::cmp::Ordering;

/// Ecosystem-specific version semantics
pub trait VersionScheme: Send + Sync {
    /// Returns the ecosystem this scheme handles
    fn ecosystem(&self) -> Ecosystem;

    /// Parse declared requirement text
    fn parse_specifier(&self, text: &str) -> Result<VersionSpecifier, String> {
        VersionSpecifier::parse(text)
    }

    /// Compare two version strings
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Leading component used for the major-bump restriction
    fn major(&self, version: &str) -> String;

    /// Returns true if moving from `from` to `to` changes the major component
    fn is_major_bump(&self, from: &str, to: &str) -> bool {
        self.major(from) != self.major(to)
    }

    /// Returns true for prerelease versions
    fn is_prerelease(&self, version: &str) -> bool;
}

/// Get the version scheme for the specified ecosystem
pub fn get_scheme(ecosystem: Ecosystem) -> Box<dyn VersionScheme> {
    match ecosystem {
        Ecosystem::Maven => Box::new(MavenVersionScheme),
    }
}
