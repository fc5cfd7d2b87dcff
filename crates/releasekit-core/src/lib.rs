//! Core types shared by the Releasekit library and binary.

pub mod core;

pub use crate::core::error::{ReleaseError, ReleaseResult};
pub use crate::core::version::{ReleaseVersion, VersionError, VersionNumber, MAX_COMPONENT};
