//! Platform versions and closed version ranges.
//!
//! Versions are `semver::Version` values. Platform releases are usually
//! written with one or two components ("17", "14.2"), so parsing fills the
//! missing components with zero.

use crate::errors::ManifestError;
use serde::{Deserialize, Serialize};

/// A platform version.
pub type Version = semver::Version;

/// Parse a platform version string such as "14", "14.2" or "14.2.1".
///
/// Pre-release and build suffixes are rejected; platform releases never
/// carry them.
pub fn parse_version(input: &str) -> Result<Version, ManifestError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| ManifestError::InvalidVersion {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty version string"));
    }

    let mut parts = [0u64; 3];
    let mut count = 0;
    for component in trimmed.split('.') {
        if count == parts.len() {
            return Err(invalid("more than three components"));
        }
        if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("components must be non-negative integers"));
        }
        parts[count] = component
            .parse()
            .map_err(|e: std::num::ParseIntError| invalid(&e.to_string()))?;
        count += 1;
    }

    Ok(Version::new(parts[0], parts[1], parts[2]))
}

/// A closed range of versions, `lower..=upper`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionedRange {
    lower: Version,
    upper: Version,
}

impl VersionedRange {
    /// Create a range; fails when `lower` is above `upper`.
    pub fn new(lower: Version, upper: Version) -> Result<Self, ManifestError> {
        if lower > upper {
            return Err(ManifestError::InvertedRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Parse both bounds and create a range.
    pub fn parse(lower: &str, upper: &str) -> Result<Self, ManifestError> {
        Self::new(parse_version(lower)?, parse_version(upper)?)
    }

    pub fn lower(&self) -> &Version {
        &self.lower
    }

    pub fn upper(&self) -> &Version {
        &self.upper
    }

    /// True iff `lower <= version <= upper`.
    pub fn contains(&self, version: &Version) -> bool {
        self.lower <= *version && *version <= self.upper
    }
}
