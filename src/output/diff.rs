//! Diff output formatter for showing changes
//!
//! Edits only ever replace text inside a line, so the diff pairs lines by
//! number and prints each changed line as a one-line hunk.

use crate::domain::ManifestUpdateResult;
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use std::io::Write;

/// Diff formatter for showing manifest changes
pub struct DiffFormatter {
    dry_run: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn dry_run_prefix(&self) -> &'static str {
        if self.dry_run {
            "(dry-run) "
        } else {
            ""
        }
    }
}

/// Write the changed lines between two texts
pub fn write_line_diff(
    original: &str,
    patched: &str,
    writer: &mut dyn Write,
) -> std::io::Result<usize> {
    let before: Vec<&str> = original.lines().collect();
    let after: Vec<&str> = patched.lines().collect();

    if before.len() != after.len() {
        // Multi-line values changed shape; show the whole document
        writeln!(writer, "@@ -1,{} +1,{} @@", before.len(), after.len())?;
        for line in &before {
            writeln!(writer, "-{}", line)?;
        }
        for line in &after {
            writeln!(writer, "+{}", line)?;
        }
        return Ok(1);
    }

    let mut hunks = 0;
    for (index, (old, new)) in before.iter().zip(&after).enumerate() {
        if old != new {
            writeln!(writer, "@@ -{} +{} @@", index + 1, index + 1)?;
            writeln!(writer, "-{}", old)?;
            writeln!(writer, "+{}", new)?;
            hunks += 1;
        }
    }
    Ok(hunks)
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();

        if result.write.has_changes() {
            let path = result.write.path.display();
            writeln!(writer, "{}--- a/{}", prefix, path)?;
            writeln!(writer, "{}+++ b/{}", prefix, path)?;
            write_line_diff(&result.write.original, &result.write.content, writer)?;
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}# {} requirement(s) updated, {} skipped",
            self.dry_run_prefix(),
            summary.update_count(),
            summary.skip_count()
        )
    }
}
