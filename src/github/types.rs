//! GitHub release API type definitions

use crate::core::{ReleaseError, ReleaseResult, ReleaseVersion};
use crate::github::failure::Failure;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Response headers as received, one entry per value, names lower-cased
pub type Headers = Vec<(String, String)>;

/// Outcome of looking up the latest published release
pub type ReleaseVersionOutcome = Result<ReleaseVersion, Failure>;

/// Outcome of creating a release
pub type ReleaseOutcome = Result<ReleaseId, Failure>;

/// Outcome of uploading an artifact to a release
pub type UploadArtifactOutcome = Result<(), Failure>;

pub const PRODUCTION_API_URL: &str = "https://api.github.com";
pub const PRODUCTION_UPLOAD_URL: &str = "https://uploads.github.com";

/// Base URL of the REST API used for listing and creating releases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubApiAuthority(Url);

impl GitHubApiAuthority {
    pub fn production() -> Self {
        Self(Url::parse(PRODUCTION_API_URL).expect("production API URL is valid"))
    }

    pub fn parse(url: &str) -> ReleaseResult<Self> {
        parse_base_url(url).map(Self)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

/// Base URL of the host that accepts release asset uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubUploadAuthority(Url);

impl GitHubUploadAuthority {
    pub fn production() -> Self {
        Self(Url::parse(PRODUCTION_UPLOAD_URL).expect("production upload URL is valid"))
    }

    pub fn parse(url: &str) -> ReleaseResult<Self> {
        parse_base_url(url).map(Self)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

fn parse_base_url(url: &str) -> ReleaseResult<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| ReleaseError::Config(format!("Invalid base URL '{}': {}", url, e)))?;
    if parsed.cannot_be_a_base() {
        return Err(ReleaseError::Config(format!(
            "Base URL '{}' cannot carry a path",
            url
        )));
    }
    Ok(parsed)
}

/// Bearer token for privileged operations
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubToken(String);

impl GitHubToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GitHubToken(****)")
    }
}

/// The `owner/repository` whose releases are managed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Identifier the service assigned to a created release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseId(pub String);

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A local file to attach to a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// Asset file name shown on the release
    pub name: String,
    /// Human readable label shown next to the asset
    pub label: String,
    pub content_type: String,
}

/// Element of the release listing; only the tag is used
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseSummary {
    pub tag_name: String,
}

/// Body of a create-release request
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseRequest {
    pub tag_name: String,
}

/// The part of a create-release response that identifies the release
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRelease {
    pub id: u64,
}
