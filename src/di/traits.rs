//! Trait definitions for the release service seams

use crate::core::ReleaseVersion;
use crate::github::types::{
    Artifact, ReleaseId, ReleaseOutcome, ReleaseVersionOutcome, UploadArtifactOutcome,
};
use async_trait::async_trait;

/// Source of the latest published release
///
/// Listing releases is public; implementations need no credentials.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Look up the newest published release version
    async fn latest_release_version(&self) -> ReleaseVersionOutcome;
}

/// Privileged operations that mutate the hosting service
#[async_trait]
pub trait ReleasePublisher: Send + Sync {
    /// Create a release tagged with `version`
    async fn create_release(&self, version: &ReleaseVersion) -> ReleaseOutcome;

    /// Attach an artifact to an existing release
    async fn upload_artifact(
        &self,
        release_id: &ReleaseId,
        artifact: &Artifact,
    ) -> UploadArtifactOutcome;
}
