//! Application metadata manifest builder
//!
//! This crate provides the typed framework used to generate platform
//! application-metadata manifests (property-list style key/value documents).
//! Entries are composed bottom-up into an immutable tree, validated against
//! the platform versions a project targets, and folded into a `Dictionary`
//! that an external serializer writes to disk.
//!
//! Building blocks, leaf first:
//! - `VersionedRange` and `Availability`: per-platform version windows
//! - `ManifestEntry`: entry contract with `array`, `dict` and `dict_array`
//!   composition and recursive validation
//! - `assemble` / `extend`: dictionary assembly, last write wins
//! - `KeySpec`: declarative, `const` descriptions of individual keys

pub mod availability;
pub mod dictionary;
pub mod entry;
pub mod errors;
pub mod keyspec;
pub mod platform;
pub mod validation;
pub mod value;
pub mod version;

pub use availability::Availability;
pub use dictionary::{assemble, extend, extend_with_mode};
pub use entry::{Entry, EntryParts, ManifestEntry};
pub use errors::ManifestError;
pub use keyspec::{AvailabilitySpec, KeySpec};
pub use platform::{Platform, UnknownPlatform};
pub use validation::{
    CoverageCheck, Finding, FindingKind, Permissive, ValidationMode, ValidationReport, Validator,
};
pub use value::{Dictionary, Value, ValueKind};
pub use version::{parse_version, Version, VersionedRange};
