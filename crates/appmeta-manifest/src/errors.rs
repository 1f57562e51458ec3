use crate::value::ValueKind;
use semver::Version;
use thiserror::Error;

/// Errors that can occur while building or validating manifest entries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Manifest entry key must not be empty")]
    EmptyKey,

    #[error("Inverted version range: {lower} is above {upper}")]
    InvertedRange { lower: Version, upper: Version },

    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("Entry '{key}' expects a {expected} value, got {found}")]
    ValueKindMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Validation failed with {count} finding(s), first: {first}")]
    Validation { count: usize, first: String },
}
