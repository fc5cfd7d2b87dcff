//! GitHub release API integration
//!
//! This module provides functionality for:
//! - Looking up the latest published release version
//! - Creating releases and uploading artifacts to them
//! - Classifying every way an exchange can fail, and rendering those failures
//! - Auditing each exchange the client attempts

pub mod audit;
pub mod client;
pub mod failure;
mod progress;
pub mod types;

pub use audit::{AuditEvent, Auditor, LoggingAuditor, NoopAuditor, RecordingAuditor};
pub use client::{GitHubHttp, PrivilegedGitHubHttp, Timeouts};
pub use failure::{format_failure, ExchangeError, Failure};
pub use types::{
    Artifact, GitHubApiAuthority, GitHubToken, GitHubUploadAuthority, ReleaseId, ReleaseOutcome,
    ReleaseVersionOutcome, Repository, UploadArtifactOutcome,
};
