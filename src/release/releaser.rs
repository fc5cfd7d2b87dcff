use crate::core::{ReleaseError, ReleaseResult, ReleaseVersion, VersionNumber};
use crate::di::traits::{ReleasePublisher, ReleaseSource};
use crate::github::failure::format_failure;
use crate::github::types::{Artifact, ReleaseId};

/// Decide which version this build is.
///
/// An override wins and is used as given. Otherwise the latest published
/// release is looked up and incremented; if that lookup fails the build is
/// a development build.
pub async fn determine_version(
    version_override: Option<&str>,
    source: &dyn ReleaseSource,
) -> ReleaseResult<VersionNumber> {
    if let Some(requested) = version_override {
        let version = VersionNumber::parse(requested)?;
        tracing::info!(%version, "Using version override");
        return Ok(version);
    }

    match source.latest_release_version().await {
        Ok(latest) => {
            let version = VersionNumber::Release(latest.next());
            tracing::info!(%latest, %version, "Determined next version");
            Ok(version)
        }
        Err(failure) => {
            tracing::warn!(
                "Failed to get latest release version, using development version\n{}",
                format_failure(&failure)
            );
            Ok(VersionNumber::Development)
        }
    }
}

/// Create release `version` and attach `artifact` to it
///
/// There is no rollback: if the upload fails the created release stays.
pub async fn publish(
    version: &VersionNumber,
    artifact: &Artifact,
    publisher: &dyn ReleasePublisher,
) -> ReleaseResult<ReleaseId> {
    let release: ReleaseVersion = version
        .as_release()
        .copied()
        .ok_or_else(|| ReleaseError::Publish("Cannot release development version".to_string()))?;

    tracing::info!(version = %release, "Creating release");
    let release_id = publisher
        .create_release(&release)
        .await
        .map_err(|failure| ReleaseError::Publish(format_failure(&failure)))?;

    tracing::info!(
        release_id = %release_id,
        artifact = %artifact.path.display(),
        "Uploading artifact"
    );
    publisher
        .upload_artifact(&release_id, artifact)
        .await
        .map_err(|failure| ReleaseError::Publish(format_failure(&failure)))?;

    tracing::info!(version = %release, release_id = %release_id, "Released");
    Ok(release_id)
}
