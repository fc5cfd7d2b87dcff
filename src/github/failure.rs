//! Failure taxonomy for release API exchanges

use crate::core::VersionError;
use crate::github::types::Headers;
use reqwest::Url;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The underlying cause of a failed exchange.
///
/// Shared (`Arc`) between the [`Failure`] returned to the caller and the
/// audit event recorded for the same exchange.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connect, TLS, DNS or body transfer error raised by the transport
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A first-byte or end-to-end deadline elapsed
    #[error(transparent)]
    Deadline(#[from] tokio::time::error::Elapsed),

    /// A payload could not be encoded, or a response body was not the expected JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to read artifact {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A release tag is not a `major.minor` version
    #[error("invalid release tag: {0}")]
    Tag(#[from] VersionError),

    /// The release listing contained no releases
    #[error("no releases found")]
    NoReleases,
}

/// Every way a single exchange with the release API can fail.
///
/// Values are snapshots taken when the exchange concluded.
#[derive(Debug, Clone)]
pub enum Failure {
    /// The server answered with a status other than the one the operation expects
    InvalidResponseCode {
        uri: Url,
        status: u16,
        expected: u16,
        headers: Headers,
        body: String,
    },
    /// The expected status arrived but the body could not be interpreted
    ResponseHandling {
        uri: Url,
        status: u16,
        headers: Headers,
        body: String,
        cause: Arc<ExchangeError>,
    },
    /// No response was obtained: DNS, TLS, refused or reset connections
    RequestSubmitting { uri: Url, cause: Arc<ExchangeError> },
    ConnectTimeout {
        uri: Url,
        timeout: Duration,
        cause: Arc<ExchangeError>,
    },
    FirstByteTimeout {
        uri: Url,
        timeout: Duration,
        cause: Arc<ExchangeError>,
    },
    EndToEndTimeout {
        uri: Url,
        timeout: Duration,
        cause: Arc<ExchangeError>,
    },
}

impl Failure {
    pub fn uri(&self) -> &Url {
        match self {
            Failure::InvalidResponseCode { uri, .. }
            | Failure::ResponseHandling { uri, .. }
            | Failure::RequestSubmitting { uri, .. }
            | Failure::ConnectTimeout { uri, .. }
            | Failure::FirstByteTimeout { uri, .. }
            | Failure::EndToEndTimeout { uri, .. } => uri,
        }
    }

    /// The underlying error, if the failure was raised by one
    pub fn cause(&self) -> Option<&ExchangeError> {
        match self {
            Failure::InvalidResponseCode { .. } => None,
            Failure::ResponseHandling { cause, .. }
            | Failure::RequestSubmitting { cause, .. }
            | Failure::ConnectTimeout { cause, .. }
            | Failure::FirstByteTimeout { cause, .. }
            | Failure::EndToEndTimeout { cause, .. } => Some(cause.as_ref()),
        }
    }
}

/// Render a failure as a multi-line diagnostic for humans.
pub fn format_failure(failure: &Failure) -> String {
    let mut out = String::new();
    match failure {
        Failure::InvalidResponseCode {
            uri,
            status,
            expected,
            headers,
            body,
        } => {
            out.push_str(&format!(
                "Expected request to {} to respond with status code {} but got {}\n",
                uri, expected, status
            ));
            push_response(&mut out, headers, body);
        }
        Failure::ResponseHandling {
            uri,
            status,
            headers,
            body,
            cause,
        } => {
            out.push_str(&format!(
                "Request to {} responded with status code {} which could not be handled: {}\n",
                uri, status, cause
            ));
            push_causes(&mut out, cause.as_ref());
            push_response(&mut out, headers, body);
        }
        Failure::RequestSubmitting { uri, cause } => {
            out.push_str(&format!("Failed submitting request to {}: {}\n", uri, cause));
            push_causes(&mut out, cause.as_ref());
        }
        Failure::ConnectTimeout { uri, timeout, .. } => {
            out.push_str(&format!(
                "Request to {} exceeded connect timeout of {:?}\n",
                uri, timeout
            ));
        }
        Failure::FirstByteTimeout { uri, timeout, .. } => {
            out.push_str(&format!(
                "Request to {} exceeded first byte timeout of {:?}\n",
                uri, timeout
            ));
        }
        Failure::EndToEndTimeout { uri, timeout, .. } => {
            out.push_str(&format!(
                "Request to {} exceeded end to end timeout of {:?}\n",
                uri, timeout
            ));
        }
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_response(out: &mut String, headers: &Headers, body: &str) {
    out.push_str("response headers:\n");
    for (name, value) in headers {
        out.push_str(&format!("\t{}: {}\n", name, value));
    }
    out.push_str("response body:\n");
    out.push_str(body);
    out.push('\n');
}

fn push_causes(out: &mut String, cause: &ExchangeError) {
    let mut source = cause.source();
    while let Some(err) = source {
        out.push_str(&format!("caused by: {}\n", err));
        source = err.source();
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_failure(self))
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(|cause| cause as &(dyn StdError + 'static))
    }
}
