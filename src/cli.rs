//! CLI argument parsing module for pomup

use crate::domain::Ecosystem;
use crate::error::ConfigError;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parse duration string in format: Ns (seconds), Nm (minutes), Nh (hours) or plain seconds
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 60 * 60)
    } else {
        (s, 1)
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    if num == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(num * multiplier))
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

/// Safe, minimal dependency upgrades for Maven pom.xml manifests
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pomup",
    version,
    about = "Safe, minimal dependency upgrades for Maven pom.xml"
)]
pub struct CliArgs {
    /// pom.xml file or directory containing one (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Dry run mode - show what would be updated without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Package filters
    /// Exclude a package (`group:artifact`) from update (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Never bump the major version of a package (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub avoid_major: Vec<String>,

    /// Skip test-scoped dependencies
    #[arg(long)]
    pub ignore_dev: bool,

    /// Ignore prerelease versions unless the current version is one
    #[arg(long)]
    pub stable_only: bool,

    // Lookup options
    /// Maximum number of concurrent version lookups
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Give up on outstanding version lookups after this long (e.g., 30s, 2m, 1h)
    #[arg(long, value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Read available versions from a JSON file instead of Maven Central
    #[arg(long, value_name = "FILE")]
    pub versions_file: Option<PathBuf>,

    /// Maven Central compatible search endpoint
    #[arg(long, value_name = "URL", conflicts_with = "versions_file")]
    pub registry_url: Option<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long, conflicts_with = "diff")]
    pub json: bool,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,
}

impl CliArgs {
    /// Resolve the manifest file the arguments point at
    pub fn manifest_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_manifest_path(&self.path)
    }

    /// Progress bars are shown only for interactive text output
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// A directory resolves to its `pom.xml`; anything else is taken as the manifest itself
pub fn resolve_manifest_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_dir() {
        let manifest = path.join(Ecosystem::Maven.manifest_filename());
        if !manifest.is_file() {
            return Err(ConfigError::InvalidPath {
                path: path.to_path_buf(),
                message: "directory does not contain a pom.xml".to_string(),
            });
        }
        return Ok(manifest);
    }
    Ok(path.to_path_buf())
}
