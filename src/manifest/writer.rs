//! Manifest file writing and patch application
//!
//! This module provides:
//! - `apply_patch`, which rewrites only the version and property value spans a patch names
//! - ManifestWriter for applying a patch to a file on disk
//! - Dry-run mode support (no actual file modifications)

use crate::domain::{DependencyOrigin, ManifestPatch, PackageKey, PropertyScope};
use crate::error::{AppError, ManifestError, PatchError};
use crate::manifest::pom;
use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One literal substitution
#[derive(Debug)]
struct Edit {
    span: Range<usize>,
    replacement: String,
    target: String,
}

/// Apply a patch to manifest text
///
/// Every byte outside the targeted spans is copied verbatim. The whole patch is
/// validated before any output is produced, so a failure never yields partial text.
pub fn apply_patch(original: &str, patch: &ManifestPatch) -> Result<String, PatchError> {
    if patch.is_empty() {
        return Ok(original.to_string());
    }

    let scan = pom::scan(original).map_err(|e| PatchError::Malformed {
        message: e.to_string(),
    })?;

    // The first declaration of a target is the one edited
    let mut dep_spans: HashMap<(&PackageKey, &DependencyOrigin), Option<Range<usize>>> =
        HashMap::new();
    for dep in &scan.dependencies {
        dep_spans
            .entry((&dep.package, &dep.origin))
            .or_insert_with(|| dep.span.clone());
    }
    let mut prop_spans: HashMap<(&PropertyScope, &str), Option<Range<usize>>> = HashMap::new();
    for prop in &scan.properties {
        prop_spans
            .entry((&prop.scope, prop.name.as_str()))
            .or_insert_with(|| prop.span.clone());
    }

    let mut edits = Vec::with_capacity(patch.len());
    for dep in &patch.deps {
        let target = format!("dependency {} ({})", dep.package, origin_label(&dep.origin));
        let span = locate(dep_spans.get(&(&dep.package, &dep.origin)), &target)?;
        edits.push(Edit {
            span,
            replacement: escape_text(&dep.new_require),
            target,
        });
    }
    for (scope, props) in &patch.properties {
        for (name, value) in props {
            let target = format!("property {} ({})", name, scope_label(scope));
            let span = locate(prop_spans.get(&(scope, name.as_str())), &target)?;
            edits.push(Edit {
                span,
                replacement: escape_text(value),
                target,
            });
        }
    }

    edits.sort_by_key(|edit| (edit.span.start, edit.span.end));
    for pair in edits.windows(2) {
        if pair[0].span.end > pair[1].span.start || pair[0].span.start == pair[1].span.start {
            return Err(PatchError::edit_conflict(&pair[0].target, &pair[1].target));
        }
    }

    let mut output = String::with_capacity(original.len());
    let mut cursor = 0;
    for edit in &edits {
        debug!(target = %edit.target, value = %edit.replacement, "Applying edit");
        output.push_str(&original[cursor..edit.span.start]);
        output.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    output.push_str(&original[cursor..]);
    Ok(output)
}

fn locate(found: Option<&Option<Range<usize>>>, target: &str) -> Result<Range<usize>, PatchError> {
    match found {
        Some(Some(span)) => Ok(span.clone()),
        Some(None) => Err(PatchError::target_not_found(format!(
            "{} is not plain text",
            target
        ))),
        None => Err(PatchError::target_not_found(target)),
    }
}

fn origin_label(origin: &DependencyOrigin) -> String {
    match origin {
        DependencyOrigin::Direct => "dependencies".to_string(),
        other => other.to_string(),
    }
}

fn scope_label(scope: &PropertyScope) -> String {
    match scope {
        PropertyScope::Root => "root".to_string(),
        other => other.to_string(),
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Writer for manifest files that applies a patch
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying a patch to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Number of edits in the applied patch
    pub edits_applied: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Text before patching
    pub original: String,
    /// Text after patching
    pub content: String,
}

impl WriteResult {
    /// Returns true if the patched text differs from the original
    pub fn has_changes(&self) -> bool {
        self.original != self.content
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Read the file, apply the patch in memory and write it back unless in dry-run mode
    pub fn apply(&self, path: &Path, patch: &ManifestPatch) -> Result<WriteResult, AppError> {
        let original = read_manifest(path)?;
        self.apply_to(path, original, patch)
    }

    /// Apply the patch to text already read from `path`
    pub fn apply_to(
        &self,
        path: &Path,
        original: String,
        patch: &ManifestPatch,
    ) -> Result<WriteResult, AppError> {
        let content = apply_patch(&original, patch)?;

        let mut result = WriteResult {
            path: path.to_path_buf(),
            edits_applied: patch.len(),
            file_modified: false,
            original,
            content,
        };

        if result.has_changes() && !self.dry_run {
            write_manifest(path, &result.content)?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
