//! Remote metadata retrieval.

use crate::modrinth::{ModrinthClient, ModrinthError, Project, Version, newest_label};
use amble_core::UNKNOWN;
use async_trait::async_trait;

/// Read-only access to project summaries and version lists, keyed by slug.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn project(&self, slug: &str) -> Result<Project, ModrinthError>;

    async fn versions(&self, slug: &str) -> Result<Vec<Version>, ModrinthError>;
}

#[async_trait]
impl MetadataSource for ModrinthClient {
    async fn project(&self, slug: &str) -> Result<Project, ModrinthError> {
        ModrinthClient::project(self, slug).await
    }

    async fn versions(&self, slug: &str) -> Result<Vec<Version>, ModrinthError> {
        ModrinthClient::versions(self, slug).await
    }
}

/// What one successful retrieval yields for a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub version_label: String,
    pub downloads: u64,
    pub icon: Option<String>,
}

/// Retrieve the summary, then the version list, for `slug`.
///
/// Fails only when the summary cannot be fetched or carries no usable
/// download count. A failed version list falls back to the summary's
/// embedded versions, then to the unknown sentinel.
pub async fn fetch_metadata<S>(source: &S, slug: &str) -> Result<ProjectMetadata, ModrinthError>
where
    S: MetadataSource + ?Sized,
{
    let project = source.project(slug).await?;
    let downloads = project
        .download_count()
        .ok_or_else(|| ModrinthError::Malformed(format!("project {slug} has no download count")))?;
    let icon = project.icon_reference();

    let version_label = match source.versions(slug).await {
        Ok(versions) => newest_label(versions),
        Err(e) => {
            tracing::debug!(slug, error = %e, "version list unavailable, using embedded versions");
            project.embedded_version().unwrap_or(UNKNOWN).to_string()
        }
    };

    Ok(ProjectMetadata { version_label, downloads, icon })
}
