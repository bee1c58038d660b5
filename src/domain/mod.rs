//! Core domain models for pomup
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystem and package identity
//! - Declaration origins and property scopes
//! - Version specifiers (concrete versions and ranges)
//! - Requirements, the computed manifest patch and per-requirement results

mod dependency;
mod ecosystem;
mod origin;
mod patch;
mod summary;
mod update_result;
mod version_spec;

pub use dependency::{PackageKey, Requirement, TEST_SCOPE};
pub use ecosystem::Ecosystem;
pub use origin::{DependencyOrigin, ProfileSection, PropertyScope};
pub use patch::{DependencyPatch, ManifestPatch, PropertyPatches};
pub use summary::ManifestUpdateResult;
pub use update_result::{SkipReason, UpdateResult, UpdateVia};
pub use version_spec::{Bound, Interval, VersionRange, VersionSpecifier};
