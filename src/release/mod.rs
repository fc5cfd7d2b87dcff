//! Release orchestration: pick the version to publish, then publish it

pub mod releaser;

pub use releaser::{determine_version, publish};
