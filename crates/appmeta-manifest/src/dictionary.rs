//! Dictionary assembly
//!
//! Folds ordered entry lists into key to value mappings. Later entries with a
//! duplicate key silently overwrite earlier ones; tooling relies on "later
//! entries override", so this is never reported. Keys keep the position of
//! their first insertion.

use crate::availability::Availability;
use crate::entry::ManifestEntry;
use crate::errors::ManifestError;
use crate::validation::{ValidationMode, ValidationReport, Validator};
use crate::value::Dictionary;
use ahash::RandomState;
use std::sync::Arc;
use tracing::debug;

/// Fold entries into a dictionary, last write wins
pub fn assemble<E: ManifestEntry>(entries: &[E]) -> Dictionary {
    let mut dict = Dictionary::with_capacity_and_hasher(entries.len(), RandomState::default());
    insert_all(&mut dict, entries);
    dict
}

/// Merge entries into an existing dictionary.
///
/// When `reference` is given every entry (with its subtree) is validated
/// against it first. Keys are then inserted or overwritten in order. Findings
/// never stop the merge; use [`extend_with_mode`] for a strict merge.
pub fn extend<E, V>(
    target: &mut Dictionary,
    entries: &[E],
    reference: Option<&Availability>,
    validator: &V,
) -> ValidationReport
where
    E: ManifestEntry,
    V: Validator + ?Sized,
{
    let report = validate_all(entries, reference, validator);
    insert_all(target, entries);
    report
}

/// Merge entries under a validation mode.
///
/// In `Strict` mode a finding aborts the merge and `target` is left
/// untouched.
pub fn extend_with_mode<E: ManifestEntry>(
    target: &mut Dictionary,
    entries: &[E],
    reference: Option<&Availability>,
    mode: ValidationMode,
) -> Result<ValidationReport, ManifestError> {
    let report = mode.finish(validate_all(entries, reference, mode.validator()))?;
    insert_all(target, entries);
    Ok(report)
}

fn validate_all<E, V>(
    entries: &[E],
    reference: Option<&Availability>,
    validator: &V,
) -> ValidationReport
where
    E: ManifestEntry,
    V: Validator + ?Sized,
{
    let mut report = ValidationReport::default();
    if let Some(reference) = reference {
        for entry in entries {
            report.merge(entry.validate_with(reference, validator));
        }
        debug!(
            "Validated {} manifest entries, {} finding(s)",
            report.visited,
            report.findings.len()
        );
    }
    report
}

fn insert_all<E: ManifestEntry>(target: &mut Dictionary, entries: &[E]) {
    for entry in entries {
        target.insert(Arc::from(entry.key()), entry.value().clone());
    }
    debug!("Merged {} manifest entries", entries.len());
}
