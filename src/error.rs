//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with reading, parsing or writing the manifest
//! - RegistryError: Issues with the version source
//! - SuggestError: Per-requirement suggestion failures (recovered)
//! - PatchError: Inconsistent patches detected by the writer (fatal for the write)
//! - ConfigError: Issues with CLI or project configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Version source related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Patch application errors
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed or lacks the root project coordinates
    #[error("malformed manifest: {message}")]
    MalformedDocument { message: String },
}

/// Errors related to the version source
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Package name cannot be mapped to a registry location
    #[error("invalid package name '{package}' for {registry}")]
    InvalidPackageName { package: String, registry: String },
}

/// Per-requirement suggestion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    /// No candidate version remained after filtering
    #[error("no versions available")]
    NoVersionsAvailable,

    /// Requirement text is not a valid specifier
    #[error("invalid version specifier '{text}': {message}")]
    InvalidSpecifier { text: String, message: String },
}

/// Errors raised while applying a patch to manifest text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Two patch entries target overlapping text
    #[error("edit conflict: {first} overlaps {second}")]
    EditConflict { first: String, second: String },

    /// A patch entry names a declaration absent from the document
    #[error("patch target not found: {target}")]
    TargetNotFound { target: String },

    /// The document could not be re-scanned
    #[error("cannot patch malformed document: {message}")]
    Malformed { message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '30s', '2m', '1h'")]
    InvalidDuration { value: String },

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Project config file could not be read or parsed
    #[error("invalid config file {path}: {message}")]
    InvalidFile { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new MalformedDocument error
    pub fn malformed(message: impl Into<String>) -> Self {
        ManifestError::MalformedDocument {
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidPackageName error
    pub fn invalid_package_name(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::InvalidPackageName {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// True when the registry could not be reached or answered unusably
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            RegistryError::NetworkError { .. }
                | RegistryError::RateLimitExceeded { .. }
                | RegistryError::InvalidResponse { .. }
                | RegistryError::Timeout { .. }
        )
    }

    /// True when the registry does not know the package
    pub fn is_unknown_package(&self) -> bool {
        matches!(
            self,
            RegistryError::PackageNotFound { .. } | RegistryError::InvalidPackageName { .. }
        )
    }
}

impl PatchError {
    /// Creates a new TargetNotFound error
    pub fn target_not_found(target: impl Into<String>) -> Self {
        PatchError::TargetNotFound {
            target: target.into(),
        }
    }

    /// Creates a new EditConflict error
    pub fn edit_conflict(first: impl Into<String>, second: impl Into<String>) -> Self {
        PatchError::EditConflict {
            first: first.into(),
            second: second.into(),
        }
    }
}
