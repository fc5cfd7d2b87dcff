use crate::core::path::config_file;
use crate::core::{ReleaseError, ReleaseResult, VersionNumber};
use crate::github::client::{Timeouts, DEFAULT_USER_AGENT};
use crate::github::types::{
    Artifact, GitHubApiAuthority, GitHubToken, GitHubUploadAuthority, Repository,
    PRODUCTION_API_URL, PRODUCTION_UPLOAD_URL,
};
use crate::pki::TrustStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the version lookup when set
pub const VERSION_ENV: &str = "RELEASEKIT_VERSION";

/// Bearer token for privileged operations; wins over the config file
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the asset upload host
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Owner of the repository whose releases are managed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Repository whose releases are managed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_first_byte_timeout_ms")]
    pub first_byte_timeout_ms: u64,

    #[serde(default = "default_end_to_end_timeout_ms")]
    pub end_to_end_timeout_ms: u64,

    /// PEM bundle of trust anchors. When set, the built-in roots are not trusted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_anchors: Option<PathBuf>,

    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// Prefer the `GITHUB_TOKEN` environment variable over storing this on disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// How the uploaded artifact is presented on the release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Asset name; `{repository}` and `{version}` are substituted
    #[serde(default = "default_artifact_name")]
    pub name: String,

    #[serde(default = "default_artifact_label")]
    pub label: String,

    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_api_url() -> String {
    PRODUCTION_API_URL.to_string()
}

fn default_upload_url() -> String {
    PRODUCTION_UPLOAD_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

fn default_first_byte_timeout_ms() -> u64 {
    2000
}

fn default_end_to_end_timeout_ms() -> u64 {
    2000
}

fn default_artifact_name() -> String {
    "{repository}-{version}.jar".to_string()
}

fn default_artifact_label() -> String {
    "Jar".to_string()
}

fn default_content_type() -> String {
    "application/java-archive".to_string()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            name: default_artifact_name(),
            label: default_artifact_label(),
            content_type: default_content_type(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            upload_url: default_upload_url(),
            owner: None,
            repository: None,
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
            first_byte_timeout_ms: default_first_byte_timeout_ms(),
            end_to_end_timeout_ms: default_end_to_end_timeout_ms(),
            trust_anchors: None,
            artifact: ArtifactConfig::default(),
            token: None,
        }
    }
}

impl Config {
    /// Load config from `path`, or from the platform-specific config file
    ///
    /// An explicit path must exist. A missing platform file yields the defaults.
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\releasekit\config.yaml
    /// - Linux: ~/.config/releasekit/config.yaml
    /// - macOS: ~/Library/Application Support/releasekit/config.yaml
    pub fn load(path: Option<&Path>) -> ReleaseResult<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = config_file()?;
                if !default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "No config file, using defaults");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path)?;
        Self::from_yaml(&content).map_err(|e| {
            ReleaseError::Config(format!(
                "Failed to parse config {}: {}",
                config_path.display(),
                e
            ))
        })
    }

    pub fn from_yaml(content: &str) -> ReleaseResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.connect_timeout_ms),
            first_byte: Duration::from_millis(self.first_byte_timeout_ms),
            end_to_end: Duration::from_millis(self.end_to_end_timeout_ms),
        }
    }

    pub fn api_authority(&self) -> ReleaseResult<GitHubApiAuthority> {
        GitHubApiAuthority::parse(&self.api_url)
    }

    pub fn upload_authority(&self) -> ReleaseResult<GitHubUploadAuthority> {
        GitHubUploadAuthority::parse(&self.upload_url)
    }

    pub fn repository(&self) -> ReleaseResult<Repository> {
        match (self.owner.as_deref(), self.repository.as_deref()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Repository::new(owner, name))
            }
            _ => Err(ReleaseError::Config(
                "Both `owner` and `repository` must be configured".to_string(),
            )),
        }
    }

    pub fn trust_store(&self) -> ReleaseResult<TrustStore> {
        match &self.trust_anchors {
            Some(path) => TrustStore::from_pem_file(path),
            None => Ok(TrustStore::platform()),
        }
    }

    /// The bearer token, from `GITHUB_TOKEN` or the config file
    pub fn token(&self) -> ReleaseResult<GitHubToken> {
        non_empty_env(TOKEN_ENV)
            .or_else(|| self.token.clone().filter(|token| !token.is_empty()))
            .map(GitHubToken::new)
            .ok_or_else(|| {
                ReleaseError::Credentials(format!(
                    "No GitHub token found. Set {} or `token` in the config file",
                    TOKEN_ENV
                ))
            })
    }

    /// Version requested through `RELEASEKIT_VERSION`, unparsed
    pub fn version_override(&self) -> Option<String> {
        non_empty_env(VERSION_ENV)
    }

    /// Describe the file at `path` as the artifact of `version`
    pub fn artifact(&self, path: &Path, version: &VersionNumber) -> Artifact {
        let repository = self.repository.as_deref().unwrap_or_default();
        Artifact {
            path: path.to_path_buf(),
            name: self
                .artifact
                .name
                .replace("{repository}", repository)
                .replace("{version}", &version.to_string()),
            label: self.artifact.label.clone(),
            content_type: self.artifact.content_type.clone(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
