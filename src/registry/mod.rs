//! Version sources for fetching available package versions
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - Maven Central Search API adapter
//! - A static, in-memory version source for offline runs and tests
//! - Bounded concurrent lookups with deadline and cancellation support

mod client;
mod local;
mod maven_central;

pub use client::HttpClient;
pub use local::StaticVersionSource;
pub use maven_central::MavenCentralAdapter;

use crate::domain::PackageKey;
use crate::error::RegistryError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default number of lookups in flight at once
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Capability returning the versions published for a package
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &str;

    /// List every published version of a package
    async fn list_versions(&self, package: &PackageKey) -> Result<Vec<String>, RegistryError>;
}

/// Outcome of looking up one package
#[derive(Debug)]
pub enum VersionLookup {
    /// Versions returned by the source
    Found(Vec<String>),
    /// The source failed for this package
    Failed(RegistryError),
    /// The deadline or a cancellation signal hit before the lookup finished
    Cancelled,
}

impl VersionLookup {
    /// Returns true when the lookup produced versions
    pub fn is_found(&self) -> bool {
        matches!(self, VersionLookup::Found(_))
    }
}

/// Limits applied to a batch of lookups
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Maximum lookups in flight
    pub concurrency: usize,
    /// Point in time after which outstanding lookups are abandoned
    pub deadline: Option<Instant>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }
}

/// Look up every package concurrently
///
/// Lookups still outstanding when `cancel` resolves or the deadline passes are
/// aborted and reported as [`VersionLookup::Cancelled`]. `on_done` is called once
/// per finished lookup, in completion order.
pub async fn fetch_all<C, F>(
    source: Arc<dyn VersionSource>,
    packages: &[PackageKey],
    options: FetchOptions,
    cancel: C,
    mut on_done: F,
) -> HashMap<PackageKey, VersionLookup>
where
    C: Future<Output = ()>,
    F: FnMut(&PackageKey),
{
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for package in packages {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        let package = package.clone();
        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (package, VersionLookup::Cancelled);
            };
            debug!("Fetching versions of {} from {}", package, source.registry_name());
            let lookup = match source.list_versions(&package).await {
                Ok(versions) => VersionLookup::Found(versions),
                Err(e) => VersionLookup::Failed(e),
            };
            (package, lookup)
        });
    }

    let expired = async {
        match options.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(cancel);
    tokio::pin!(expired);

    let mut results = HashMap::with_capacity(packages.len());
    loop {
        tokio::select! {
            joined = tasks.join_next() => match joined {
                Some(Ok((package, lookup))) => {
                    on_done(&package);
                    results.insert(package, lookup);
                }
                Some(Err(e)) => warn!("Version lookup task failed: {}", e),
                None => break,
            },
            _ = &mut cancel => {
                warn!("Version lookups cancelled, {} outstanding", tasks.len());
                break;
            }
            _ = &mut expired => {
                warn!("Version lookup deadline reached, {} outstanding", tasks.len());
                break;
            }
        }
    }
    tasks.abort_all();

    for package in packages {
        results
            .entry(package.clone())
            .or_insert(VersionLookup::Cancelled);
    }
    results
}
