use crate::core::version::VersionError;
use thiserror::Error;

pub type ReleaseResult<T> = Result<T, ReleaseError>;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The HTTP client could not be constructed (TLS backend, invalid anchor).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version: {0}")]
    Version(#[from] VersionError),

    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Creating the release or uploading its artifact failed.
    /// Carries the formatted diagnostic for the operator.
    #[error("Release failed: {0}")]
    Publish(String),

    /// The latest release could not be looked up.
    #[error("Release lookup failed: {0}")]
    Lookup(String),
}
