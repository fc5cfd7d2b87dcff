//! Release version numbers.
//!
//! Releases are tagged `major.minor`. A build that has not been assigned a
//! release number uses [`VersionNumber::Development`], which sorts above
//! every release and never advances.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while constructing version numbers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The text is not `<non-negative int>.<non-negative int>`.
    /// Carries the literal input.
    #[error("{0}")]
    InvalidFormat(String),

    /// A component was out of range, e.g. `majorVersion -1`
    #[error("{0}")]
    InvalidArgument(String),
}

/// Largest major or minor component, the range of a signed 32-bit int
pub const MAX_COMPONENT: u32 = i32::MAX as u32;

/// A published `major.minor` release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    major: u32,
    minor: u32,
}

impl ReleaseVersion {
    /// Build a release version, rejecting components outside `0..=MAX_COMPONENT`
    pub fn of(major: i64, minor: i64) -> Result<Self, VersionError> {
        let in_range = |value: i64| u32::try_from(value).ok().filter(|v| *v <= MAX_COMPONENT);
        let major = in_range(major)
            .ok_or_else(|| VersionError::InvalidArgument(format!("majorVersion {}", major)))?;
        let minor = in_range(minor)
            .ok_or_else(|| VersionError::InvalidArgument(format!("minorVersion {}", minor)))?;
        Ok(Self { major, minor })
    }

    /// Parse a tag name such as `"1.82"`
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::InvalidFormat(text.to_string());

        if text.matches('.').count() != 1 {
            return Err(invalid());
        }
        let (major, minor) = text.split_once('.').ok_or_else(invalid)?;

        Ok(Self {
            major: parse_component(major).ok_or_else(invalid)?,
            minor: parse_component(minor).ok_or_else(invalid)?,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// The next minor release. Saturates at `MAX_COMPONENT`.
    pub fn next(&self) -> Self {
        Self {
            major: self.major,
            minor: (self.minor + 1).min(MAX_COMPONENT),
        }
    }
}

/// Digits only: rejects signs, whitespace, empty halves and values above `MAX_COMPONENT`
fn parse_component(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u32>().ok().filter(|value| *value <= MAX_COMPONENT)
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ReleaseVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

/// Either a release or the in-development sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionNumber {
    Release(ReleaseVersion),
    Development,
}

impl VersionNumber {
    /// Parse a release version; never yields `Development`
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        ReleaseVersion::parse(text).map(Self::Release)
    }

    pub fn increment(&self) -> Self {
        match self {
            Self::Release(release) => Self::Release(release.next()),
            Self::Development => Self::Development,
        }
    }

    pub fn as_release(&self) -> Option<&ReleaseVersion> {
        match self {
            Self::Release(release) => Some(release),
            Self::Development => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl From<ReleaseVersion> for VersionNumber {
    fn from(release: ReleaseVersion) -> Self {
        Self::Release(release)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release(release) => fmt::Display::fmt(release, f),
            Self::Development => write!(f, "development"),
        }
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Development, Self::Development) => Ordering::Equal,
            (Self::Development, Self::Release(_)) => Ordering::Greater,
            (Self::Release(_), Self::Development) => Ordering::Less,
            (Self::Release(a), Self::Release(b)) => a.cmp(b),
        }
    }
}
