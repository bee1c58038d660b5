//! Output formatting for update results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing
//! - Diff output for showing changes

mod diff;
mod json;
mod text;

pub use diff::DiffFormatter;
pub use json::JsonFormatter;
pub use text::{TextFormatter, VersionChangeType};

use crate::domain::ManifestUpdateResult;
use crate::orchestrator::OrchestratorResult;
use std::io::{IsTerminal, Write};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
    /// Line diff of the manifest
    Diff,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json, diff)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether this is a dry-run
    pub dry_run: bool,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            dry_run: false,
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, diff: bool, verbose: bool, quiet: bool, dry_run: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else if diff {
            OutputFormat::Diff
        } else {
            OutputFormat::Text
        };

        Self {
            format,
            verbosity: Verbosity::from_flags(verbose, quiet),
            dry_run,
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the orchestrator result
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write just the summary line
    fn format_summary(
        &self,
        summary: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(
            config.verbosity,
            config.dry_run,
            config.color,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
        OutputFormat::Diff => Box::new(DiffFormatter::new(config.dry_run)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{Ecosystem, ManifestUpdateResult};
    use crate::manifest::{apply_patch, Manifest, WriteResult};
    use crate::orchestrator::OrchestratorResult;
    use crate::parser::MavenVersionScheme;
    use crate::registry::VersionLookup;
    use crate::update::{SuggestOptions, Suggester};
    use std::collections::HashMap;
    use std::path::PathBuf;

    pub const POM: &str = r#"<project>
  <groupId>com.acme</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <properties>
    <shared.version>1.0.0</shared.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>shared</artifactId>
      <version>${shared.version}</version>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>direct</artifactId>
      <version>1.2.3</version>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>broken</artifactId>
      <version>4.0</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.12</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>
"#;

    /// Result of suggesting over `POM` without touching the file system
    pub fn sample_result(dry_run: bool) -> OrchestratorResult {
        let manifest = Manifest::parse(POM).unwrap();
        let scheme = MavenVersionScheme;
        let suggester = Suggester::new(
            &scheme,
            SuggestOptions::new().with_ignore_non_production(true),
        );
        let mut lookups = HashMap::new();
        for package in suggester.packages_to_fetch(&manifest) {
            let lookup = match package.name.as_str() {
                "org.example:shared" => VersionLookup::Found(vec!["1.0.0".into(), "1.1.0".into()]),
                "org.example:direct" => VersionLookup::Found(vec!["1.2.3".into(), "2.0.0".into()]),
                _ => VersionLookup::Failed(crate::error::RegistryError::timeout(
                    &package.name,
                    "test",
                )),
            };
            lookups.insert(package, lookup);
        }
        let report = suggester.suggest(&manifest, &lookups);
        let content = apply_patch(POM, &report.patch).unwrap();

        let path = PathBuf::from("pom.xml");
        let mut summary =
            ManifestUpdateResult::new(path.clone(), Ecosystem::Maven, manifest.root.to_string());
        summary.results = report.results;
        summary.patch = report.patch;
        summary.modified = !dry_run;

        OrchestratorResult {
            dry_run,
            summary,
            write: WriteResult {
                path,
                edits_applied: 2,
                file_modified: !dry_run,
                original: POM.to_string(),
                content,
            },
        }
    }
}
