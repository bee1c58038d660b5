//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: read → parse → fetch → suggest → write
//! - Bounded concurrent version lookups with deadline and cancellation
//! - Dry-run mode support
//! - Partial-failure reporting for packages whose lookup failed

use crate::config::Settings;
use crate::domain::{Ecosystem, ManifestUpdateResult, UpdateResult};
use crate::error::AppError;
use crate::manifest::{read_manifest, Manifest, ManifestWriter, WriteResult};
use crate::parser::get_scheme;
use crate::progress::Progress;
use crate::registry::{
    fetch_all, FetchOptions, HttpClient, MavenCentralAdapter, StaticVersionSource, VersionSource,
};
use crate::update::Suggester;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    settings: Settings,
    source: Arc<dyn VersionSource>,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct OrchestratorResult {
    /// Whether the run left the file untouched on purpose
    pub dry_run: bool,
    /// Per-requirement results and the applied patch
    pub summary: ManifestUpdateResult,
    /// Original and patched text
    pub write: WriteResult,
}

impl OrchestratorResult {
    /// Messages for requirements skipped because their lookup failed or was cancelled
    pub fn errors(&self) -> Vec<String> {
        self.summary
            .lookup_failures()
            .map(|result| match result {
                UpdateResult::Skip { requirement, reason } => {
                    format!("{}: {}", requirement.name(), reason)
                }
                other => other.to_string(),
            })
            .collect()
    }

    /// True when some packages could not be checked
    pub fn is_partial(&self) -> bool {
        self.summary.is_partial()
    }
}

/// Pick the version source named by the settings
pub fn build_source(settings: &Settings) -> Result<Arc<dyn VersionSource>, AppError> {
    if let Some(path) = &settings.versions_file {
        let source = StaticVersionSource::from_json_file(path)?;
        debug!("Using {} packages from {}", source.len(), path.display());
        return Ok(Arc::new(source));
    }
    let client = HttpClient::new()?;
    let adapter = match &settings.registry_url {
        Some(url) => MavenCentralAdapter::with_base_url(client, url.clone()),
        None => MavenCentralAdapter::new(client),
    };
    Ok(Arc::new(adapter))
}

impl Orchestrator {
    /// Create an orchestrator using the version source the settings name
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let source = build_source(&settings)?;
        Ok(Self::with_source(settings, source))
    }

    /// Create an orchestrator with a custom version source (for testing)
    pub fn with_source(settings: Settings, source: Arc<dyn VersionSource>) -> Self {
        Self { settings, source }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the update workflow
    pub async fn run(&self, show_progress: bool) -> Result<OrchestratorResult, AppError> {
        self.run_until(show_progress, std::future::pending()).await
    }

    /// Run the update workflow, abandoning outstanding lookups once `cancel` resolves
    ///
    /// Fatal errors (unreadable or malformed manifest, inconsistent patch, failed
    /// write) are returned; lookup failures only mark the affected requirements as
    /// skipped.
    pub async fn run_until<C>(
        &self,
        show_progress: bool,
        cancel: C,
    ) -> Result<OrchestratorResult, AppError>
    where
        C: Future<Output = ()>,
    {
        let path = &self.settings.manifest;

        // Step 1: Read and parse the manifest
        let original = read_manifest(path)?;
        let manifest = Manifest::parse(&original)?;
        info!(
            "Parsed {} with {} requirements",
            manifest.root,
            manifest.requirements.len()
        );

        let scheme = get_scheme(Ecosystem::Maven);
        let suggester = Suggester::new(scheme.as_ref(), self.settings.options.clone());

        // Step 2: Fetch versions of every package that needs a suggestion
        let packages = suggester.packages_to_fetch(&manifest);
        let mut progress = Progress::new(show_progress);
        progress.start(packages.len() as u64, "Fetching versions");
        let options = FetchOptions {
            concurrency: self.settings.concurrency,
            deadline: self.settings.timeout.map(|timeout| Instant::now() + timeout),
        };
        let lookups = fetch_all(
            Arc::clone(&self.source),
            &packages,
            options,
            cancel,
            |package| progress.advance(&package.name),
        )
        .await;
        progress.finish_and_clear();

        // Step 3: Suggest versions and arbitrate shared properties
        let report = suggester.suggest(&manifest, &lookups);

        // Step 4: Apply the patch (unless dry-run)
        let writer = ManifestWriter::new(self.settings.dry_run);
        let write = writer.apply_to(path, original, &report.patch)?;

        let mut summary =
            ManifestUpdateResult::new(path.clone(), Ecosystem::Maven, manifest.root.to_string());
        summary.results = report.results;
        summary.patch = report.patch;
        summary.modified = write.file_modified;

        Ok(OrchestratorResult {
            dry_run: self.settings.dry_run,
            summary,
            write,
        })
    }
}
