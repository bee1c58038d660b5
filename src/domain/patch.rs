//! Computed manifest changes handed to the writer

use super::{DependencyOrigin, PackageKey, PropertyScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A direct per-dependency version override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyPatch {
    /// Package to change
    pub package: PackageKey,
    /// Declaration site to change
    pub origin: DependencyOrigin,
    /// New literal requirement text
    pub new_require: String,
}

/// Property value changes: scope → property name → new value
pub type PropertyPatches = BTreeMap<PropertyScope, BTreeMap<String, String>>;

/// The full set of changes for one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPatch {
    /// Direct overrides in declaration order
    pub deps: Vec<DependencyPatch>,
    /// Property value changes
    pub properties: PropertyPatches,
}

impl ManifestPatch {
    /// Creates an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a direct override
    pub fn add_dependency(
        &mut self,
        package: PackageKey,
        origin: DependencyOrigin,
        new_require: impl Into<String>,
    ) {
        self.deps.push(DependencyPatch {
            package,
            origin,
            new_require: new_require.into(),
        });
    }

    /// Sets a property value; returns the previous value if one was set
    pub fn set_property(
        &mut self,
        scope: PropertyScope,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.properties
            .entry(scope)
            .or_default()
            .insert(name.into(), value.into())
    }

    /// Looks up a property change
    pub fn property(&self, scope: &PropertyScope, name: &str) -> Option<&str> {
        self.properties
            .get(scope)
            .and_then(|props| props.get(name))
            .map(String::as_str)
    }

    /// Looks up a direct override
    pub fn dependency(
        &self,
        package: &PackageKey,
        origin: &DependencyOrigin,
    ) -> Option<&DependencyPatch> {
        self.deps
            .iter()
            .find(|d| &d.package == package && &d.origin == origin)
    }

    /// Number of property changes across all scopes
    pub fn property_count(&self) -> usize {
        self.properties.values().map(BTreeMap::len).sum()
    }

    /// Total number of edits this patch describes
    pub fn len(&self) -> usize {
        self.deps.len() + self.property_count()
    }

    /// Returns true if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
