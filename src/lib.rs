//! Releasekit: versioned GitHub releases with bounded, auditable HTTP exchanges
//!
//! This crate provides the release client and orchestration, re-exporting
//! the version and error types from `releasekit-core`.

pub use releasekit_core::{ReleaseError, ReleaseResult, ReleaseVersion, VersionNumber};

/// Core module re-exported from releasekit-core.
pub mod core {
    pub use releasekit_core::core::*;
    pub use releasekit_core::*;
}

/// Configuration management.
pub mod config;

/// GitHub release API client.
pub mod github;

/// TLS trust anchors.
pub mod pki;

/// Release service seams and their test doubles.
pub mod di;

/// Version determination and publishing.
pub mod release;
