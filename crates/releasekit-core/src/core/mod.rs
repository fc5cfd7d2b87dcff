pub mod error;
pub mod path;
pub mod version;

pub use error::{ReleaseError, ReleaseResult};
pub use version::{ReleaseVersion, VersionError, VersionNumber, MAX_COMPONENT};
