//! Service seams for the release process
//!
//! The orchestration in [`crate::release`] talks to the hosting service only
//! through these traits, so it can be exercised against the mocks in
//! [`mocks`] as well as the real HTTP client.
//!
//! # Example (Testing)
//! ```
//! use releasekit::core::ReleaseVersion;
//! use releasekit::di::mocks::MockReleaseSource;
//! use releasekit::di::ReleaseSource;
//!
//! # async fn example() {
//! let source = MockReleaseSource::returning(ReleaseVersion::of(1, 82).unwrap());
//! let latest = source.latest_release_version().await.unwrap();
//! assert_eq!(latest.to_string(), "1.82");
//! # }
//! ```

pub mod mocks;
pub mod traits;

pub use traits::{ReleasePublisher, ReleaseSource};
