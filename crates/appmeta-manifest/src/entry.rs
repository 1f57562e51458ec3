//! Manifest entries and their composition helpers
//!
//! A manifest entry is one node of the manifest tree: a key, an optional
//! display name, a typed value, optional child entries, an optional platform
//! availability and a required flag. Entries are immutable once built.
//!
//! Every manifest section can declare its own entry type with
//! [`manifest_entry!`](crate::manifest_entry); the composition helpers
//! (`array`, `dict`, `dict_array`) and validation are default methods of
//! [`ManifestEntry`] and are shared by all of them.

use crate::availability::Availability;
use crate::dictionary::assemble;
use crate::errors::ManifestError;
use crate::validation::{Permissive, ValidationReport, Validator};
use crate::value::Value;
use rayon::prelude::*;
use std::sync::Arc;

// =============================================================================
// ENTRY PARTS - Shared storage of every entry type
// =============================================================================

/// Fields shared by every manifest entry type
#[derive(Debug, Clone, PartialEq)]
pub struct EntryParts<E> {
    key: Arc<str>,
    name: Option<Arc<str>>,
    value: Value,
    /// Present when the value was built from these children
    children: Option<Vec<E>>,
    availability: Option<Availability>,
    is_required: bool,
}

impl<E: ManifestEntry> EntryParts<E> {
    /// Assemble entry fields verbatim; the key must not be empty.
    ///
    /// `value` is not checked against `children`. The composition helpers of
    /// [`ManifestEntry`] are the way to derive one from the other.
    pub fn new(
        key: &str,
        name: Option<&str>,
        value: Value,
        children: Option<Vec<E>>,
        availability: Option<Availability>,
        is_required: bool,
    ) -> Result<Self, ManifestError> {
        if key.is_empty() {
            return Err(ManifestError::EmptyKey);
        }
        Ok(Self {
            key: Arc::from(key),
            name: name.map(Arc::from),
            value,
            children,
            availability,
            is_required,
        })
    }
}

// =============================================================================
// MANIFEST ENTRY - Shared behaviour
// =============================================================================

/// Contract of a manifest entry type.
///
/// Implementors only provide conversion to and from [`EntryParts`]; all
/// construction, composition and validation is inherited.
pub trait ManifestEntry: Sized {
    fn from_parts(parts: EntryParts<Self>) -> Self;

    fn parts(&self) -> &EntryParts<Self>;

    /// Build an entry verbatim
    fn new(
        key: &str,
        name: Option<&str>,
        value: Value,
        children: Option<Vec<Self>>,
        availability: Option<Availability>,
        is_required: bool,
    ) -> Result<Self, ManifestError> {
        EntryParts::new(key, name, value, children, availability, is_required)
            .map(Self::from_parts)
    }

    /// Optional leaf entry with no name or availability
    fn leaf(key: &str, value: impl Into<Value>) -> Result<Self, ManifestError> {
        Self::new(key, None, value.into(), None, None, false)
    }

    /// Entry whose value is the array of the children's values, in order
    fn array(
        name: Option<&str>,
        key: &str,
        children: Vec<Self>,
        availability: Option<Availability>,
        is_required: bool,
    ) -> Result<Self, ManifestError> {
        let value = Value::Array(children.iter().map(|c| c.value().clone()).collect());
        EntryParts::new(key, name, value, Some(children), availability, is_required)
            .map(Self::from_parts)
    }

    /// Entry whose value is the dictionary assembled from the children
    fn dict(
        name: Option<&str>,
        key: &str,
        children: Vec<Self>,
        availability: Option<Availability>,
        is_required: bool,
    ) -> Result<Self, ManifestError> {
        let value = Value::Dictionary(assemble(&children));
        EntryParts::new(key, name, value, Some(children), availability, is_required)
            .map(Self::from_parts)
    }

    /// Entry whose value is an array with one dictionary per group.
    ///
    /// The children are stored flattened, group after group.
    fn dict_array(
        name: Option<&str>,
        key: &str,
        groups: Vec<Vec<Self>>,
        availability: Option<Availability>,
        is_required: bool,
    ) -> Result<Self, ManifestError> {
        let value = Value::Array(
            groups
                .iter()
                .map(|group| Value::Dictionary(assemble(group)))
                .collect(),
        );
        let children = groups.into_iter().flatten().collect();
        EntryParts::new(key, name, value, Some(children), availability, is_required)
            .map(Self::from_parts)
    }

    fn key(&self) -> &str {
        &self.parts().key
    }

    fn name(&self) -> Option<&str> {
        self.parts().name.as_deref()
    }

    fn value(&self) -> &Value {
        &self.parts().value
    }

    fn children(&self) -> Option<&[Self]> {
        self.parts().children.as_deref()
    }

    fn availability(&self) -> Option<&Availability> {
        self.parts().availability.as_ref()
    }

    fn is_required(&self) -> bool {
        self.parts().is_required
    }

    /// Number of entries in this subtree, this entry included
    fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .flatten()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }

    /// Validate this entry and every descendant with the default
    /// [`Permissive`] validator, which accepts every entry.
    fn validate(&self, reference: &Availability) -> ValidationReport {
        self.validate_with(reference, &Permissive)
    }

    /// Validate this entry and every descendant against `reference`.
    ///
    /// Depth-first pre-order; every entry is checked exactly once. Entries
    /// without availability are handed to the validator as `None`.
    fn validate_with<V>(&self, reference: &Availability, validator: &V) -> ValidationReport
    where
        V: Validator + ?Sized,
    {
        let mut report = ValidationReport::default();
        visit(self, reference, validator, &mut report);
        report
    }

    /// `validate_with` with sibling subtrees checked in parallel.
    ///
    /// Findings keep the pre-order of `validate_with`.
    fn validate_par<V>(&self, reference: &Availability, validator: &V) -> ValidationReport
    where
        Self: Sync,
        V: Validator + Sync + ?Sized,
    {
        let mut report = ValidationReport {
            visited: 1,
            findings: validator.check(self.key(), self.availability(), reference),
        };
        if let Some(children) = self.children() {
            let reports: Vec<ValidationReport> = children
                .par_iter()
                .map(|child| child.validate_par(reference, validator))
                .collect();
            for child_report in reports {
                report.merge(child_report);
            }
        }
        report
    }
}

fn visit<E, V>(entry: &E, reference: &Availability, validator: &V, report: &mut ValidationReport)
where
    E: ManifestEntry,
    V: Validator + ?Sized,
{
    report.visited += 1;
    report
        .findings
        .extend(validator.check(entry.key(), entry.availability(), reference));
    for child in entry.children().into_iter().flatten() {
        visit(child, reference, validator, report);
    }
}

/// Declare a manifest entry type backed by [`EntryParts`].
///
/// ```
/// use appmeta_manifest::{manifest_entry, ManifestEntry};
///
/// manifest_entry! {
///     /// Entries of the privacy section
///     pub struct PrivacyEntry;
/// }
///
/// let entry = PrivacyEntry::leaf("NSCameraUsageDescription", "Scan receipts");
/// assert!(entry.is_ok_and(|e| e.key() == "NSCameraUsageDescription"));
/// ```
#[macro_export]
macro_rules! manifest_entry {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name($crate::EntryParts<$name>);

        impl $crate::ManifestEntry for $name {
            fn from_parts(parts: $crate::EntryParts<Self>) -> Self {
                Self(parts)
            }

            fn parts(&self) -> &$crate::EntryParts<Self> {
                &self.0
            }
        }
    };
}

manifest_entry! {
    /// General-purpose manifest entry
    pub struct Entry;
}
