//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Human-readable update result display with colors
//! - Version change type indication (major/minor/patch)
//! - Property and origin annotations for each change
//! - Skipped requirement display with reasons
//! - Summary with detailed breakdown

use crate::domain::{DependencyOrigin, ManifestUpdateResult, Requirement, UpdateResult, UpdateVia};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::parser::{MavenVersionScheme, VersionScheme};
use colored::Colorize;
use std::io::Write;

/// Version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major component changed
    Major,
    /// Second component changed
    Minor,
    /// Anything smaller
    Patch,
    /// Old text is a range
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two Maven versions
    pub fn from_versions(old: &str, new: &str) -> Self {
        if old.starts_with('[') || old.starts_with('(') {
            return VersionChangeType::Unknown;
        }
        let scheme = MavenVersionScheme;
        if scheme.is_major_bump(old, new) {
            return VersionChangeType::Major;
        }
        let minor = |v: &str| v.split(['.', '-']).nth(1).map(str::to_ascii_lowercase);
        if minor(old) != minor(new) {
            VersionChangeType::Minor
        } else {
            VersionChangeType::Patch
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "range".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "range",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    dry_run: bool,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self::with_color(verbosity, dry_run, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn dry_run_prefix(&self) -> String {
        match (self.dry_run, self.color) {
            (false, _) => String::new(),
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
        }
    }

    /// Requirement name with its origin when it is not the root section
    fn label(requirement: &Requirement) -> String {
        if requirement.origin == DependencyOrigin::Direct {
            requirement.name().to_string()
        } else {
            format!("{} ({})", requirement.name(), requirement.origin)
        }
    }

    fn max_label_length(results: &[&UpdateResult]) -> usize {
        results
            .iter()
            .map(|r| Self::label(r.requirement()).len())
            .max()
            .unwrap_or(0)
    }

    fn format_update_line(
        &self,
        result: &UpdateResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let UpdateResult::Update {
            requirement,
            new_version,
            via,
        } = result
        else {
            return Ok(());
        };
        let label = Self::label(requirement);
        let change = VersionChangeType::from_versions(&requirement.resolved, new_version);
        let via_text = match via {
            UpdateVia::Direct => String::new(),
            UpdateVia::Property { name, .. } => format!(" via property {}", name),
            UpdateVia::Pinned => " pinned".to_string(),
        };

        if self.color {
            writeln!(
                writer,
                "  {:width$} {} {} {} [{}]{}",
                label,
                requirement.resolved.dimmed(),
                "→".dimmed(),
                new_version.bright_white().bold(),
                change.colored_label(),
                via_text.dimmed(),
                width = width
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}",
                label,
                requirement.resolved,
                new_version,
                change.label(),
                via_text,
                width = width
            )
        }
    }

    fn format_skip_line(
        &self,
        result: &UpdateResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let UpdateResult::Skip {
            requirement,
            reason,
        } = result
        else {
            return Ok(());
        };
        let label = format!("{:width$}", Self::label(requirement), width = width);
        let reason = format!("({})", reason);
        if self.color {
            writeln!(writer, "  {} {}", label.dimmed(), reason.dimmed())
        } else {
            writeln!(writer, "  {} {}", label, reason)
        }
    }

    fn format_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let updates: Vec<&UpdateResult> = manifest.updates().collect();
        let skips: Vec<&UpdateResult> = manifest.skips().collect();
        let show_skips = self.verbosity == Verbosity::Verbose && !skips.is_empty();
        if updates.is_empty() && !show_skips {
            return Ok(());
        }

        let path_display = manifest.path.display().to_string();
        let prefix = self.dry_run_prefix();
        if self.color {
            writeln!(
                writer,
                "{}{} {}",
                prefix,
                path_display.bold(),
                format!("({})", manifest.root).dimmed()
            )?;
        } else {
            writeln!(writer, "{}{} ({})", prefix, path_display, manifest.root)?;
        }

        let width = Self::max_label_length(&updates).max(20);
        for result in &updates {
            self.format_update_line(result, width, writer)?;
        }

        if show_skips {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "  {}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "  Skipped:")?;
            }
            let width = Self::max_label_length(&skips).max(20);
            for result in &skips {
                self.format_skip_line(result, width, writer)?;
            }
        }

        writeln!(writer)
    }

    fn count_by_change_type(manifest: &ManifestUpdateResult) -> [usize; 4] {
        let mut counts = [0; 4];
        for result in manifest.updates() {
            if let UpdateResult::Update {
                requirement,
                new_version,
                ..
            } = result
            {
                let index = match VersionChangeType::from_versions(&requirement.resolved, new_version)
                {
                    VersionChangeType::Major => 0,
                    VersionChangeType::Minor => 1,
                    VersionChangeType::Patch => 2,
                    VersionChangeType::Unknown => 3,
                };
                counts[index] += 1;
            }
        }
        counts
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        self.format_manifest(&result.summary, writer)?;

        let errors = result.errors();
        if !errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let updates = summary.update_count();
        let skips = summary.skip_count();

        if self.verbosity == Verbosity::Quiet {
            return match (updates, self.color) {
                (0, true) => writeln!(writer, "{}{}", prefix, "No updates".dimmed()),
                (0, false) => writeln!(writer, "{}No updates", prefix),
                (n, true) => writeln!(writer, "{}{} updated", prefix, n.to_string().green()),
                (n, false) => writeln!(writer, "{}{} updated", prefix, n),
            };
        }

        if updates == 0 {
            if self.color {
                writeln!(writer, "{}{}", prefix, "All dependencies are up to date".green())?;
            } else {
                writeln!(writer, "{}All dependencies are up to date", prefix)?;
            }
        } else {
            let [major, minor, patch, range] = Self::count_by_change_type(summary);
            let parts: Vec<String> = [
                (major, "major"),
                (minor, "minor"),
                (patch, "patch"),
                (range, "range"),
            ]
            .iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, label)| format!("{} {}", count, label))
            .collect();
            let edits = summary.patch.len();
            if self.color {
                writeln!(
                    writer,
                    "{}{}: {} requirement(s) updated ({}) with {} edit(s)",
                    prefix,
                    "Summary".bold(),
                    updates.to_string().green(),
                    parts.join(", "),
                    edits
                )?;
            } else {
                writeln!(
                    writer,
                    "{}Summary: {} requirement(s) updated ({}) with {} edit(s)",
                    prefix,
                    updates,
                    parts.join(", "),
                    edits
                )?;
            }
        }

        if skips > 0 && self.verbosity == Verbosity::Verbose {
            writeln!(writer, "  {} requirement(s) skipped", skips)?;
        }
        Ok(())
    }
}
