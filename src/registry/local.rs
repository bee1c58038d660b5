//! Static version source
//!
//! Serves versions from an in-memory table, loaded from a JSON file of the form
//! `{ "group:artifact": ["1.0", "1.1"] }`. Used for offline runs and tests.

use crate::domain::PackageKey;
use crate::error::{ConfigError, RegistryError};
use crate::registry::VersionSource;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::Path;

const REGISTRY_NAME: &str = "versions file";

/// Version source backed by a fixed table
#[derive(Debug, Clone, Default)]
pub struct StaticVersionSource {
    versions: IndexMap<String, Vec<String>>,
}

impl StaticVersionSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the versions of one package (builder pattern)
    pub fn with_package<I, S>(mut self, name: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions
            .insert(name.into(), versions.into_iter().map(Into::into).collect());
        self
    }

    /// Parse a JSON versions table
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let versions: IndexMap<String, Vec<String>> = serde_json::from_str(content)?;
        Ok(Self { versions })
    }

    /// Load a JSON versions table from disk
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Number of packages known to the source
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[async_trait]
impl VersionSource for StaticVersionSource {
    fn registry_name(&self) -> &str {
        REGISTRY_NAME
    }

    async fn list_versions(&self, package: &PackageKey) -> Result<Vec<String>, RegistryError> {
        self.versions
            .get(&package.name)
            .cloned()
            .ok_or_else(|| RegistryError::package_not_found(&package.name, REGISTRY_NAME))
    }
}
