//! Declarative key specifications
//!
//! Manifest keys are described once, in `const` tables, instead of one
//! hand-written constructor per key:
//!
//! ```
//! use appmeta_manifest::{Entry, KeySpec, ManifestEntry, Platform, ValueKind};
//!
//! const SUPPORTS_DOCUMENT_BROWSER: KeySpec = KeySpec::new(
//!     "UISupportsDocumentBrowser",
//!     "Supports Document Browser",
//!     ValueKind::Boolean,
//! )
//! .since(&[(Platform::Ios, "11.0"), (Platform::Maccatalyst, "13.1")]);
//!
//! let entry: Result<Entry, _> = SUPPORTS_DOCUMENT_BROWSER.entry(true);
//! assert!(entry.is_ok_and(|e| e.availability().is_some()));
//! ```

use crate::availability::Availability;
use crate::entry::ManifestEntry;
use crate::errors::ManifestError;
use crate::platform::Platform;
use crate::value::{Value, ValueKind};

/// Availability of a key in `const`-friendly form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilitySpec {
    /// No availability declared; valid everywhere
    Everywhere,
    /// Minimum version per platform, open-ended
    Since(&'static [(Platform, &'static str)]),
    /// Historical window per platform (deprecated)
    Between(&'static [(Platform, &'static str, &'static str)]),
}

impl AvailabilitySpec {
    pub fn resolve(&self) -> Result<Option<Availability>, ManifestError> {
        match self {
            AvailabilitySpec::Everywhere => Ok(None),
            AvailabilitySpec::Since(minimums) => Availability::since(minimums).map(Some),
            AvailabilitySpec::Between(ranges) => Availability::between(ranges).map(Some),
        }
    }
}

/// Static description of one manifest key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub key: &'static str,
    pub name: &'static str,
    pub kind: ValueKind,
    pub availability: AvailabilitySpec,
    pub required: bool,
}

impl KeySpec {
    pub const fn new(key: &'static str, name: &'static str, kind: ValueKind) -> Self {
        KeySpec {
            key,
            name,
            kind,
            availability: AvailabilitySpec::Everywhere,
            required: false,
        }
    }

    pub const fn since(self, minimums: &'static [(Platform, &'static str)]) -> Self {
        KeySpec {
            availability: AvailabilitySpec::Since(minimums),
            ..self
        }
    }

    pub const fn between(self, ranges: &'static [(Platform, &'static str, &'static str)]) -> Self {
        KeySpec {
            availability: AvailabilitySpec::Between(ranges),
            ..self
        }
    }

    pub const fn required(self) -> Self {
        KeySpec {
            required: true,
            ..self
        }
    }

    /// Parsed availability, `None` for keys valid everywhere
    pub fn availability(&self) -> Result<Option<Availability>, ManifestError> {
        self.availability.resolve()
    }

    /// Leaf entry for this key; the value must be of the declared kind
    pub fn entry<E: ManifestEntry>(&self, value: impl Into<Value>) -> Result<E, ManifestError> {
        let value = value.into();
        self.expect_kind(value.kind())?;
        E::new(
            self.key,
            Some(self.name),
            value,
            None,
            self.availability()?,
            self.required,
        )
    }

    /// Array entry for this key, see [`ManifestEntry::array`]
    pub fn array<E: ManifestEntry>(&self, children: Vec<E>) -> Result<E, ManifestError> {
        self.expect_kind(ValueKind::Array)?;
        E::array(
            Some(self.name),
            self.key,
            children,
            self.availability()?,
            self.required,
        )
    }

    /// Dictionary entry for this key, see [`ManifestEntry::dict`]
    pub fn dict<E: ManifestEntry>(&self, children: Vec<E>) -> Result<E, ManifestError> {
        self.expect_kind(ValueKind::Dictionary)?;
        E::dict(
            Some(self.name),
            self.key,
            children,
            self.availability()?,
            self.required,
        )
    }

    /// Array-of-dictionaries entry for this key, see [`ManifestEntry::dict_array`]
    pub fn dict_array<E: ManifestEntry>(&self, groups: Vec<Vec<E>>) -> Result<E, ManifestError> {
        self.expect_kind(ValueKind::Array)?;
        E::dict_array(
            Some(self.name),
            self.key,
            groups,
            self.availability()?,
            self.required,
        )
    }

    fn expect_kind(&self, found: ValueKind) -> Result<(), ManifestError> {
        if found == self.kind {
            Ok(())
        } else {
            Err(ManifestError::ValueKindMismatch {
                key: self.key.to_string(),
                expected: self.kind,
                found,
            })
        }
    }
}
