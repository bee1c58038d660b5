//! JSON output formatter for machine processing
//!
//! The document carries the patch exactly as handed to the writer, so a
//! reporting layer can inspect or replay it:
//!
//! ```json
//! { "dry_run": true, "manifest": "pom.xml",
//!   "patch": { "deps": [{"package": "g:a", "origin": "", "new_require": "2.0"}],
//!              "properties": { "": { "v": "2.0" } } },
//!   "updates": [...], "skips": [...], "errors": [...] }
//! ```

use crate::domain::{ManifestPatch, ManifestUpdateResult, UpdateResult, UpdateVia};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

#[derive(Serialize)]
struct JsonOutput {
    dry_run: bool,
    manifest: String,
    root: String,
    patch: JsonPatch,
    updates: Vec<JsonUpdate>,
    skips: Vec<JsonSkip>,
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonPatch {
    deps: Vec<JsonDependencyPatch>,
    properties: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Serialize)]
struct JsonDependencyPatch {
    package: String,
    origin: String,
    new_require: String,
}

#[derive(Serialize)]
struct JsonUpdate {
    name: String,
    origin: String,
    from: String,
    to: String,
    via: UpdateVia,
}

#[derive(Serialize)]
struct JsonSkip {
    name: String,
    origin: String,
    version: String,
    reason: String,
}

impl JsonPatch {
    fn from_patch(patch: &ManifestPatch) -> Self {
        Self {
            deps: patch
                .deps
                .iter()
                .map(|d| JsonDependencyPatch {
                    package: d.package.name.clone(),
                    origin: d.origin.to_string(),
                    new_require: d.new_require.clone(),
                })
                .collect(),
            properties: patch
                .properties
                .iter()
                .map(|(scope, values)| (scope.to_string(), values.clone()))
                .collect(),
        }
    }
}

impl JsonFormatter {
    fn to_json(&self, summary: &ManifestUpdateResult, dry_run: bool, errors: Vec<String>) -> JsonOutput {
        let mut updates = Vec::new();
        let mut skips = Vec::new();
        for result in &summary.results {
            match result {
                UpdateResult::Update {
                    requirement,
                    new_version,
                    via,
                } => updates.push(JsonUpdate {
                    name: requirement.name().to_string(),
                    origin: requirement.origin.to_string(),
                    from: requirement.resolved.clone(),
                    to: new_version.clone(),
                    via: via.clone(),
                }),
                // Skips that only mean "nothing to do" are listed in verbose mode
                UpdateResult::Skip {
                    requirement,
                    reason,
                } if self.verbosity == Verbosity::Verbose || reason.is_lookup_failure() => {
                    skips.push(JsonSkip {
                        name: requirement.name().to_string(),
                        origin: requirement.origin.to_string(),
                        version: requirement.declared.clone(),
                        reason: reason.to_string(),
                    })
                }
                UpdateResult::Skip { .. } => {}
            }
        }

        JsonOutput {
            dry_run,
            manifest: summary.path.display().to_string(),
            root: summary.root.clone(),
            patch: JsonPatch::from_patch(&summary.patch),
            updates,
            skips,
            errors,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.to_json(&result.summary, result.dry_run, result.errors());
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }

    fn format_summary(
        &self,
        summary: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = serde_json::json!({
            "updates": summary.update_count(),
            "skips": summary.skip_count(),
            "edits": summary.patch.len(),
        });
        serde_json::to_writer(&mut *writer, &output)?;
        writeln!(writer)
    }
}
