//! TLS trust configuration for release API clients
//!
//! Production traffic trusts the bundled webpki roots. Tests (or private
//! deployments) pin an explicit set of anchors; an empty set makes every
//! handshake fail.

use crate::core::{ReleaseError, ReleaseResult};
use reqwest::{Certificate, Client, ClientBuilder};
use std::fmt;
use std::path::Path;

#[derive(Clone, Default)]
pub enum TrustStore {
    /// Built-in root certificates
    #[default]
    Platform,
    /// Only these anchors are trusted
    Anchors(Vec<Certificate>),
}

impl TrustStore {
    pub fn platform() -> Self {
        TrustStore::Platform
    }

    pub fn anchors(anchors: Vec<Certificate>) -> Self {
        TrustStore::Anchors(anchors)
    }

    /// Load every certificate in a PEM bundle as a trust anchor
    pub fn from_pem_file(path: &Path) -> ReleaseResult<Self> {
        let pem = std::fs::read(path)?;
        let anchors = Certificate::from_pem_bundle(&pem).map_err(|e| {
            ReleaseError::Config(format!(
                "Invalid trust anchors in {}: {}",
                path.display(),
                e
            ))
        })?;
        if anchors.is_empty() {
            return Err(ReleaseError::Config(format!(
                "No certificates found in {}",
                path.display()
            )));
        }
        Ok(TrustStore::Anchors(anchors))
    }

    /// A client builder with this trust configuration applied
    pub fn client_builder(&self) -> ClientBuilder {
        let builder = Client::builder().use_rustls_tls();
        match self {
            TrustStore::Platform => builder,
            TrustStore::Anchors(anchors) => anchors
                .iter()
                .cloned()
                .fold(builder.tls_built_in_root_certs(false), |builder, anchor| {
                    builder.add_root_certificate(anchor)
                }),
        }
    }
}

impl fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustStore::Platform => f.write_str("TrustStore::Platform"),
            TrustStore::Anchors(anchors) => {
                write!(f, "TrustStore::Anchors({} certificates)", anchors.len())
            }
        }
    }
}
