//! Availability validation of manifest entries
//!
//! Validation compares the availability an entry declares with a reference
//! availability supplied by the caller (typically the deployment targets of
//! the project). Results are non-fatal findings collected in a
//! `ValidationReport`; callers decide whether findings are warnings or
//! errors through `ValidationMode`.
//!
//! The check itself is pluggable through the `Validator` trait:
//! - `Permissive` accepts every entry (the default)
//! - `CoverageCheck` reports platforms the entry does not cover
//! - any `Fn(&str, Option<&Availability>, &Availability) -> Vec<Finding>`

use crate::availability::Availability;
use crate::errors::ManifestError;
use crate::platform::Platform;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

// =============================================================================
// FINDINGS
// =============================================================================

/// Why an entry does not fit the reference availability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    /// The entry declares availability but not for this platform
    NotDeclared,
    /// The targeted version predates the key
    Introduced { since: Version, target: Version },
    /// The key was removed before the targeted version
    Removed { until: Version, target: Version },
}

/// A single validation finding for one entry on one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub key: Arc<str>,
    pub platform: Platform,
    pub kind: FindingKind,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FindingKind::NotDeclared => {
                write!(f, "'{}' is not available on {}", self.key, self.platform)
            }
            FindingKind::Introduced { since, target } => write!(
                f,
                "'{}' requires {} {} but {} is targeted",
                self.key, self.platform, since, target
            ),
            FindingKind::Removed { until, target } => write!(
                f,
                "'{}' was only honoured up to {} {} but {} is targeted",
                self.key, self.platform, until, target
            ),
        }
    }
}

// =============================================================================
// VALIDATORS
// =============================================================================

/// Compatibility check applied to every visited entry
pub trait Validator {
    fn check(
        &self,
        key: &str,
        declared: Option<&Availability>,
        reference: &Availability,
    ) -> Vec<Finding>;
}

impl<F> Validator for F
where
    F: Fn(&str, Option<&Availability>, &Availability) -> Vec<Finding>,
{
    fn check(
        &self,
        key: &str,
        declared: Option<&Availability>,
        reference: &Availability,
    ) -> Vec<Finding> {
        self(key, declared, reference)
    }
}

/// Accepts every entry
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissive;

impl Validator for Permissive {
    fn check(
        &self,
        key: &str,
        declared: Option<&Availability>,
        _reference: &Availability,
    ) -> Vec<Finding> {
        trace!(key = key, declared = declared.is_some(), "Visited manifest entry");
        Vec::new()
    }
}

/// Reports every reference platform the entry does not cover.
///
/// The reference's minimum version per platform is the targeted version.
/// Entries without availability (or with an empty one) are valid everywhere.
/// The upper bound is only checked for deprecated availability; open-ended
/// ranges keep applying past the latest known release.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageCheck;

impl Validator for CoverageCheck {
    fn check(
        &self,
        key: &str,
        declared: Option<&Availability>,
        reference: &Availability,
    ) -> Vec<Finding> {
        let Some(declared) = declared.filter(|a| !a.is_empty()) else {
            return Vec::new();
        };

        let mut findings = Vec::new();
        for (platform, targeted) in reference.iter() {
            let target = targeted.lower();
            let kind = match declared.range(platform) {
                None => Some(FindingKind::NotDeclared),
                Some(range) if target < range.lower() => Some(FindingKind::Introduced {
                    since: range.lower().clone(),
                    target: target.clone(),
                }),
                Some(range) if declared.is_deprecated() && target > range.upper() => {
                    Some(FindingKind::Removed {
                        until: range.upper().clone(),
                        target: target.clone(),
                    })
                }
                Some(_) => None,
            };
            if let Some(kind) = kind {
                findings.push(Finding {
                    key: Arc::from(key),
                    platform,
                    kind,
                });
            }
        }
        findings
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Outcome of a validation walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of entries visited
    pub visited: usize,
    /// Findings in visiting order
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        self.visited += other.visited;
        self.findings.extend(other.findings);
    }

    /// Turn findings into a hard error
    pub fn into_result(self) -> Result<Self, ManifestError> {
        match self.findings.first() {
            None => Ok(self),
            Some(first) => Err(ManifestError::Validation {
                count: self.findings.len(),
                first: first.to_string(),
            }),
        }
    }
}

// =============================================================================
// MODE
// =============================================================================

/// How strictly findings are treated
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// No checks; every entry is accepted
    #[default]
    Permissive,
    /// Coverage checks, findings are logged and returned
    Warn,
    /// Coverage checks, any finding is an error
    Strict,
}

impl ValidationMode {
    /// Validator backing this mode
    pub fn validator(self) -> &'static (dyn Validator + Sync) {
        match self {
            ValidationMode::Permissive => &Permissive,
            ValidationMode::Warn | ValidationMode::Strict => &CoverageCheck,
        }
    }

    /// Apply the mode's policy to a finished report
    pub fn finish(self, report: ValidationReport) -> Result<ValidationReport, ManifestError> {
        match self {
            ValidationMode::Permissive => Ok(report),
            ValidationMode::Warn => {
                for finding in &report.findings {
                    warn!("{}", finding);
                }
                Ok(report)
            }
            ValidationMode::Strict => report.into_result(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(pairs: &[(Platform, &str)]) -> Availability {
        match Availability::since(pairs) {
            Ok(a) => a,
            Err(e) => panic!("invalid test targets: {e}"),
        }
    }

    #[test]
    fn test_permissive_accepts_everything() {
        let reference = targets(&[(Platform::Ios, "12.0")]);
        let declared = targets(&[(Platform::Macos, "14.0")]);
        assert!(Permissive
            .check("NSCameraUsageDescription", Some(&declared), &reference)
            .is_empty());
    }

    #[test]
    fn test_coverage_without_declaration_is_valid() {
        let reference = targets(&[(Platform::Ios, "12.0"), (Platform::Watchos, "6.0")]);
        assert!(CoverageCheck.check("CFBundleName", None, &reference).is_empty());

        let empty = targets(&[]);
        assert!(CoverageCheck
            .check("CFBundleName", Some(&empty), &reference)
            .is_empty());
    }

    #[test]
    fn test_coverage_reports_missing_platform() {
        let reference = targets(&[(Platform::Ios, "15.0"), (Platform::Tvos, "15.0")]);
        let declared = targets(&[(Platform::Ios, "14.0")]);
        let findings = CoverageCheck.check("UIRequiresFullScreen", Some(&declared), &reference);
        assert_eq!(
            findings,
            vec![Finding {
                key: Arc::from("UIRequiresFullScreen"),
                platform: Platform::Tvos,
                kind: FindingKind::NotDeclared,
            }]
        );
    }

    #[test]
    fn test_coverage_reports_too_old_target() {
        let reference = targets(&[(Platform::Ios, "13.0")]);
        let declared = targets(&[(Platform::Ios, "14.0")]);
        let findings =
            CoverageCheck.check("NSUserTrackingUsageDescription", Some(&declared), &reference);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].kind,
            FindingKind::Introduced {
                since: Version::new(14, 0, 0),
                target: Version::new(13, 0, 0),
            }
        );
        assert_eq!(
            findings[0].to_string(),
            "'NSUserTrackingUsageDescription' requires iOS 14.0.0 but 13.0.0 is targeted"
        );
    }

    #[test]
    fn test_coverage_upper_bound_only_for_deprecated() {
        let reference = targets(&[(Platform::Ios, "17.0")]);

        let historical = match Availability::between(&[(Platform::Ios, "3.2", "9.0")]) {
            Ok(a) => a,
            Err(e) => panic!("invalid ranges: {e}"),
        };
        let findings = CoverageCheck.check("UIStatusBarHidden", Some(&historical), &reference);
        assert!(matches!(
            findings.as_slice(),
            [Finding {
                kind: FindingKind::Removed { .. },
                ..
            }]
        ));

        let open = targets(&[(Platform::Ios, "9.0")]);
        assert!(CoverageCheck
            .check("UIStatusBarHidden", Some(&open), &reference)
            .is_empty());
    }

    #[test]
    fn test_closure_validator() {
        let reject_all = |key: &str, _: Option<&Availability>, _: &Availability| {
            vec![Finding {
                key: Arc::from(key),
                platform: Platform::Macos,
                kind: FindingKind::NotDeclared,
            }]
        };
        let reference = targets(&[]);
        assert_eq!(reject_all.check("LSUIElement", None, &reference).len(), 1);
    }

    #[test]
    fn test_report_into_result() {
        let clean = ValidationReport {
            visited: 3,
            findings: Vec::new(),
        };
        assert!(clean.into_result().is_ok_and(|r| r.visited == 3));

        let dirty = ValidationReport {
            visited: 1,
            findings: vec![Finding {
                key: Arc::from("LSUIElement"),
                platform: Platform::Ios,
                kind: FindingKind::NotDeclared,
            }],
        };
        assert_eq!(
            dirty.into_result(),
            Err(ManifestError::Validation {
                count: 1,
                first: "'LSUIElement' is not available on iOS".to_string(),
            })
        );
    }

    #[test]
    fn test_mode_policies() {
        let report = ValidationReport {
            visited: 1,
            findings: vec![Finding {
                key: Arc::from("LSUIElement"),
                platform: Platform::Ios,
                kind: FindingKind::NotDeclared,
            }],
        };
        assert!(ValidationMode::Permissive.finish(report.clone()).is_ok());
        assert!(ValidationMode::Warn
            .finish(report.clone())
            .is_ok_and(|r| r.findings.len() == 1));
        assert!(ValidationMode::Strict.finish(report).is_err());
        assert_eq!(ValidationMode::default(), ValidationMode::Permissive);
    }
}
