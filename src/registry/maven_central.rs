//! Maven Central Search API adapter
//!
//! Fetches artifact versions from Maven Central.
//! API endpoint: https://search.maven.org/solrsearch/select
//!
//! Query format: q=g:{groupId}+AND+a:{artifactId}&core=gav&rows=200&wt=json

use crate::domain::PackageKey;
use crate::error::RegistryError;
use crate::registry::{HttpClient, VersionSource};
use async_trait::async_trait;
use serde::Deserialize;

/// Maven Central Search API base URL
pub const MAVEN_CENTRAL_API_URL: &str = "https://search.maven.org/solrsearch/select";

/// Maximum number of versions to fetch
const MAX_VERSIONS: u32 = 200;

/// Maven Central adapter
pub struct MavenCentralAdapter {
    client: HttpClient,
    base_url: String,
}

/// Maven Central search response
#[derive(Debug, Deserialize)]
struct MavenSearchResponse {
    response: MavenResponseBody,
}

#[derive(Debug, Deserialize)]
struct MavenResponseBody {
    docs: Vec<MavenVersionDoc>,
}

/// One `core=gav` document
#[derive(Debug, Deserialize)]
struct MavenVersionDoc {
    v: String,
}

impl MavenCentralAdapter {
    /// Create a new Maven Central adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, MAVEN_CENTRAL_API_URL)
    }

    /// Create an adapter querying a compatible search endpoint (mirrors, test servers)
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build search URL for group:artifact
    fn build_url(&self, package: &PackageKey) -> Result<String, RegistryError> {
        let (group, artifact) = package
            .name
            .split_once(':')
            .filter(|(g, a)| !g.is_empty() && !a.is_empty() && !a.contains(':'))
            .ok_or_else(|| {
                RegistryError::invalid_package_name(&package.name, self.registry_name())
            })?;
        Ok(format!(
            "{}?q=g:{}+AND+a:{}&core=gav&rows={}&wt=json",
            self.base_url.trim_end_matches('/'),
            group,
            artifact,
            MAX_VERSIONS
        ))
    }
}

#[async_trait]
impl VersionSource for MavenCentralAdapter {
    fn registry_name(&self) -> &str {
        "Maven Central"
    }

    async fn list_versions(&self, package: &PackageKey) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url(package)?;
        let response: MavenSearchResponse = self
            .client
            .get_json(&url, &package.name, self.registry_name())
            .await?;

        if response.response.docs.is_empty() {
            return Err(RegistryError::package_not_found(
                &package.name,
                self.registry_name(),
            ));
        }

        let mut versions: Vec<String> = Vec::with_capacity(response.response.docs.len());
        for doc in response.response.docs {
            if !versions.contains(&doc.v) {
                versions.push(doc.v);
            }
        }
        Ok(versions)
    }
}
