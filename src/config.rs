//! Project configuration
//!
//! An optional `.pomup.toml` next to the manifest supplies defaults:
//!
//! ```toml
//! exclude = ["org.example:internal"]
//! avoid_major = ["com.google.guava:guava"]
//! ignore_dev = true
//! stable_only = false
//! concurrency = 8
//! timeout_secs = 60
//! registry_url = "https://search.maven.org/solrsearch/select"
//! ```
//!
//! Command line flags take precedence; list options are merged.

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::registry::DEFAULT_CONCURRENCY;
use crate::update::SuggestOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// File name of the project configuration
pub const CONFIG_FILE_NAME: &str = ".pomup.toml";

/// Contents of `.pomup.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub exclude: Vec<String>,
    pub avoid_major: Vec<String>,
    pub ignore_dev: bool,
    pub stable_only: bool,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub registry_url: Option<String>,
}

impl ProjectConfig {
    /// Read the configuration from a directory; a missing file yields defaults
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::InvalidFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!("Loaded project config from {}", path.display());
        Self::parse(&content, &path)
    }

    /// Parse configuration text; `path` is used for error reporting
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Effective settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Manifest to process
    pub manifest: PathBuf,
    pub dry_run: bool,
    /// Suggestion constraints
    pub options: SuggestOptions,
    /// Maximum lookups in flight
    pub concurrency: usize,
    /// Overall deadline for the lookup phase
    pub timeout: Option<Duration>,
    /// Offline version table
    pub versions_file: Option<PathBuf>,
    /// Search endpoint override
    pub registry_url: Option<String>,
}

impl Settings {
    /// Resolve the manifest path, load `.pomup.toml` beside it and merge with the flags
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let manifest = args.manifest_path()?;
        let dir = manifest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let config = ProjectConfig::from_dir(dir)?;
        Self::merge(args, manifest, config)
    }

    /// Combine flags with project configuration
    pub fn merge(
        args: &CliArgs,
        manifest: PathBuf,
        config: ProjectConfig,
    ) -> Result<Self, ConfigError> {
        let concurrency = args
            .concurrency
            .or(config.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::ConflictingOptions {
                message: "concurrency must be at least 1".to_string(),
            });
        }

        let options = SuggestOptions::new()
            .with_excluded(union(&args.exclude, &config.exclude))
            .with_major_bump_exceptions(union(&args.avoid_major, &config.avoid_major))
            .with_ignore_non_production(args.ignore_dev || config.ignore_dev)
            .with_stable_only(args.stable_only || config.stable_only);

        Ok(Self {
            manifest,
            dry_run: args.dry_run,
            options,
            concurrency,
            timeout: args
                .timeout
                .or_else(|| config.timeout_secs.map(Duration::from_secs)),
            versions_file: args.versions_file.clone(),
            registry_url: args.registry_url.clone().or(config.registry_url),
        })
    }
}

fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut merged = first.to_vec();
    for item in second {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["pomup"];
        argv.extend(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_parse_config() {
        let config = ProjectConfig::parse(
            r#"
exclude = ["a:b"]
avoid_major = ["c:d"]
ignore_dev = true
concurrency = 4
timeout_secs = 60
"#,
            Path::new(CONFIG_FILE_NAME),
        )
        .unwrap();
        assert_eq!(config.exclude, vec!["a:b"]);
        assert_eq!(config.avoid_major, vec!["c:d"]);
        assert!(config.ignore_dev);
        assert!(!config.stable_only);
        assert_eq!(config.concurrency, Some(4));
        assert_eq!(config.timeout_secs, Some(60));
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = ProjectConfig::parse("exclude = 3", Path::new(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));

        let err = ProjectConfig::parse("unknown_key = 1", Path::new(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            ProjectConfig::from_dir(dir.path()).unwrap(),
            ProjectConfig::default()
        );
    }

    #[test]
    fn test_from_dir_reads_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "stable_only = true\n").unwrap();
        assert!(ProjectConfig::from_dir(dir.path()).unwrap().stable_only);
    }

    #[test]
    fn test_merge_flags_take_precedence() {
        let config = ProjectConfig {
            exclude: vec!["a:b".to_string(), "x:y".to_string()],
            concurrency: Some(4),
            timeout_secs: Some(60),
            ..Default::default()
        };
        let settings = Settings::merge(
            &args(&["--exclude", "x:y", "--exclude", "c:d", "--concurrency", "2", "--timeout", "5s"]),
            PathBuf::from("pom.xml"),
            config,
        )
        .unwrap();

        assert_eq!(settings.options.excluded, vec!["x:y", "c:d", "a:b"]);
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_merge_defaults() {
        let settings =
            Settings::merge(&args(&[]), PathBuf::from("pom.xml"), ProjectConfig::default())
                .unwrap();
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
        assert!(settings.timeout.is_none());
        assert!(!settings.options.ignore_non_production);
    }

    #[test]
    fn test_merge_zero_concurrency() {
        let result = Settings::merge(
            &args(&["--concurrency", "0"]),
            PathBuf::from("pom.xml"),
            ProjectConfig::default(),
        );
        assert!(matches!(result, Err(ConfigError::ConflictingOptions { .. })));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "ignore_dev = true\n").unwrap();

        let settings = Settings::load(&args(&[dir.path().to_str().unwrap()])).unwrap();
        assert_eq!(settings.manifest, dir.path().join("pom.xml"));
        assert!(settings.options.ignore_non_production);
    }
}
