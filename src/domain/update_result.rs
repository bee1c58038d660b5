//! Update decision result types

use super::{PropertyScope, Requirement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a requirement received no upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Already at the best allowed version
    AlreadyLatest,
    /// Package was excluded via the exclusion list
    Excluded,
    /// Requirement is test-scoped and non-production requirements are ignored
    NonProduction,
    /// The version source returned no usable candidate
    NoVersionsAvailable,
    /// Failed to fetch version info from the version source
    FetchFailed(String),
    /// Lookup was aborted by the deadline or a cancellation signal
    Cancelled,
    /// The declared text references a property that is not declared anywhere
    UnresolvedProperty(String),
    /// The requirement text could not be parsed as a specifier
    InvalidSpecifier(String),
}

impl SkipReason {
    /// Returns true for skips caused by a failed or aborted lookup
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, SkipReason::FetchFailed(_) | SkipReason::Cancelled)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyLatest => write!(f, "already at latest"),
            SkipReason::Excluded => write!(f, "excluded by --exclude"),
            SkipReason::NonProduction => write!(f, "non-production dependency"),
            SkipReason::NoVersionsAvailable => write!(f, "no versions available"),
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::Cancelled => write!(f, "lookup cancelled"),
            SkipReason::UnresolvedProperty(name) => {
                write!(f, "unresolved property ${{{}}}", name)
            }
            SkipReason::InvalidSpecifier(msg) => write!(f, "invalid specifier: {}", msg),
        }
    }
}

/// How an upgrade is carried into the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdateVia {
    /// The requirement's own version element is rewritten
    Direct,
    /// A shared property is rewritten
    Property {
        /// Scope of the property declaration
        scope: PropertyScope,
        /// Property name
        name: String,
    },
    /// The requirement keeps its version but is detached from a property that moved
    Pinned,
}

/// Result of an update decision for a single requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateResult {
    /// Requirement will be changed
    Update {
        /// The requirement being changed
        requirement: Requirement,
        /// The new effective requirement text
        new_version: String,
        /// How the change is written
        via: UpdateVia,
    },
    /// Requirement is left as is
    Skip {
        /// The requirement that was skipped
        requirement: Requirement,
        /// The reason for skipping
        reason: SkipReason,
    },
}

impl UpdateResult {
    /// Creates an Update result
    pub fn update(requirement: Requirement, new_version: impl Into<String>, via: UpdateVia) -> Self {
        UpdateResult::Update {
            requirement,
            new_version: new_version.into(),
            via,
        }
    }

    /// Creates a Skip result
    pub fn skip(requirement: Requirement, reason: SkipReason) -> Self {
        UpdateResult::Skip {
            requirement,
            reason,
        }
    }

    /// Creates a Skip result for already at latest
    pub fn skip_already_latest(requirement: Requirement) -> Self {
        Self::skip(requirement, SkipReason::AlreadyLatest)
    }

    /// Returns true if this is an update result
    pub fn is_update(&self) -> bool {
        matches!(self, UpdateResult::Update { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, UpdateResult::Skip { .. })
    }

    /// Returns the requirement reference
    pub fn requirement(&self) -> &Requirement {
        match self {
            UpdateResult::Update { requirement, .. } => requirement,
            UpdateResult::Skip { requirement, .. } => requirement,
        }
    }

    /// Returns the package name
    pub fn package_name(&self) -> &str {
        self.requirement().name()
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateResult::Update {
                requirement,
                new_version,
                via,
            } => {
                write!(
                    f,
                    "{}: {} → {}",
                    requirement.name(),
                    requirement.resolved,
                    new_version
                )?;
                match via {
                    UpdateVia::Direct => Ok(()),
                    UpdateVia::Property { name, .. } => write!(f, " (via ${{{}}})", name),
                    UpdateVia::Pinned => write!(f, " (pinned)"),
                }
            }
            UpdateResult::Skip {
                requirement,
                reason,
            } => {
                write!(f, "{}: skipped ({})", requirement.name(), reason)
            }
        }
    }
}
