//! Mock implementations of service traits for testing

use super::traits::{ReleasePublisher, ReleaseSource};
use crate::core::ReleaseVersion;
use crate::github::types::{
    Artifact, ReleaseId, ReleaseOutcome, ReleaseVersionOutcome, UploadArtifactOutcome,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock release source returning a fixed outcome
#[derive(Clone)]
pub struct MockReleaseSource {
    pub outcome: ReleaseVersionOutcome,
    calls: Arc<Mutex<usize>>,
}

impl MockReleaseSource {
    pub fn new(outcome: ReleaseVersionOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn returning(version: ReleaseVersion) -> Self {
        Self::new(Ok(version))
    }

    /// Number of lookups performed
    pub fn calls(&self) -> usize {
        self.calls.lock().map(|calls| *calls).unwrap_or_default()
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    async fn latest_release_version(&self) -> ReleaseVersionOutcome {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        self.outcome.clone()
    }
}

/// A call received by [`MockReleasePublisher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherCall {
    CreateRelease(ReleaseVersion),
    UploadArtifact(ReleaseId, Artifact),
}

/// Mock publisher returning fixed outcomes and recording every call
#[derive(Clone)]
pub struct MockReleasePublisher {
    pub create_outcome: ReleaseOutcome,
    pub upload_outcome: UploadArtifactOutcome,
    calls: Arc<Mutex<Vec<PublisherCall>>>,
}

impl MockReleasePublisher {
    pub fn new(create_outcome: ReleaseOutcome, upload_outcome: UploadArtifactOutcome) -> Self {
        Self {
            create_outcome,
            upload_outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A publisher whose operations all succeed, creating release `release_id`
    pub fn succeeding(release_id: &str) -> Self {
        Self::new(Ok(ReleaseId(release_id.to_string())), Ok(()))
    }

    pub fn calls(&self) -> Vec<PublisherCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: PublisherCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl ReleasePublisher for MockReleasePublisher {
    async fn create_release(&self, version: &ReleaseVersion) -> ReleaseOutcome {
        self.record(PublisherCall::CreateRelease(*version));
        self.create_outcome.clone()
    }

    async fn upload_artifact(
        &self,
        release_id: &ReleaseId,
        artifact: &Artifact,
    ) -> UploadArtifactOutcome {
        self.record(PublisherCall::UploadArtifact(
            release_id.clone(),
            artifact.clone(),
        ));
        self.upload_outcome.clone()
    }
}
