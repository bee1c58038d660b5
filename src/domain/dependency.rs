//! Package identity and requirement declaration structures

use super::{DependencyOrigin, Ecosystem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope tag marking a requirement as not shipped with the artifact
pub const TEST_SCOPE: &str = "test";

/// Identity of a dependency irrespective of where it is declared
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageKey {
    /// Ecosystem the package belongs to
    pub ecosystem: Ecosystem,
    /// Package name (`group:artifact` for Maven)
    pub name: String,
}

impl PackageKey {
    /// Creates a new package key
    pub fn new(ecosystem: Ecosystem, name: impl Into<String>) -> Self {
        Self {
            ecosystem,
            name: name.into(),
        }
    }

    /// Creates a Maven package key from group and artifact ids
    pub fn maven(group: &str, artifact: &str) -> Self {
        Self::new(Ecosystem::Maven, format!("{}:{}", group, artifact))
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One dependency declaration site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Package identity
    pub package: PackageKey,
    /// Version text exactly as declared (may contain `${...}` placeholders)
    pub declared: String,
    /// Version text after property interpolation
    pub resolved: String,
    /// Where the requirement is declared
    pub origin: DependencyOrigin,
    /// Scope tags such as `test` or `import`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope_tags: Vec<String>,
}

impl Requirement {
    /// Creates a requirement whose declared text is a literal
    pub fn new(package: PackageKey, version: impl Into<String>, origin: DependencyOrigin) -> Self {
        let version = version.into();
        Self {
            package,
            declared: version.clone(),
            resolved: version,
            origin,
            scope_tags: Vec::new(),
        }
    }

    /// Sets the declared template, keeping the resolved value (builder pattern)
    pub fn with_declared(mut self, declared: impl Into<String>) -> Self {
        self.declared = declared.into();
        self
    }

    /// Adds a scope tag (builder pattern)
    pub fn with_scope(mut self, tag: impl Into<String>) -> Self {
        self.scope_tags.push(tag.into());
        self
    }

    /// Returns true if the declared text references at least one property
    pub fn uses_placeholder(&self) -> bool {
        self.declared.contains("${")
    }

    /// Returns true if the resolved text still contains an unresolved placeholder
    pub fn is_unresolved(&self) -> bool {
        self.resolved.contains("${")
    }

    /// Returns true for requirements that do not ship with the artifact
    pub fn is_non_production(&self) -> bool {
        self.scope_tags.iter().any(|t| t == TEST_SCOPE)
    }

    /// Returns the package name
    pub fn name(&self) -> &str {
        &self.package.name
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.package, self.declared)?;
        if self.origin != DependencyOrigin::Direct {
            write!(f, " ({})", self.origin)?;
        }
        if self.is_non_production() {
            write!(f, " (test)")?;
        }
        Ok(())
    }
}
