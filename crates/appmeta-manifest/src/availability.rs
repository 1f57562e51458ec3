//! Platform availability of manifest keys
//!
//! An `Availability` records, per platform, the closed range of versions in
//! which a key is honoured. It comes in two flavours:
//! - open-ended: built from minimum versions, every range ends at the
//!   platform's latest known release and the record is not deprecated
//! - historical: built from explicit ranges, stored verbatim and always
//!   flagged deprecated (the key was later removed or superseded)

use crate::errors::ManifestError;
use crate::platform::Platform;
use crate::version::{parse_version, Version, VersionedRange};
use smallvec::SmallVec;

/// Per-platform version ranges of a manifest key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    /// Sorted by platform, at most one range per platform
    ranges: SmallVec<[(Platform, VersionedRange); 2]>,
    deprecated: bool,
}

impl Availability {
    /// Build an open-ended availability from per-platform minimum versions.
    ///
    /// A minimum above the platform's latest known release is rejected as an
    /// inverted range. When a platform appears twice the later pair wins.
    pub fn from_minimums<I>(minimums: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = (Platform, Version)>,
    {
        let mut ranges = SmallVec::new();
        for (platform, minimum) in minimums {
            let range = VersionedRange::new(minimum, platform.latest_known())?;
            upsert(&mut ranges, platform, range);
        }
        Ok(Self {
            ranges,
            deprecated: false,
        })
    }

    /// Build a historical availability from explicit ranges.
    ///
    /// The result is deprecated regardless of the ranges supplied.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (Platform, VersionedRange)>,
    {
        let mut stored = SmallVec::new();
        for (platform, range) in ranges {
            upsert(&mut stored, platform, range);
        }
        Self {
            ranges: stored,
            deprecated: true,
        }
    }

    /// `from_minimums` over version strings, e.g. `[(Platform::Ios, "14.0")]`
    pub fn since(minimums: &[(Platform, &str)]) -> Result<Self, ManifestError> {
        let parsed = minimums
            .iter()
            .map(|&(platform, version)| parse_version(version).map(|v| (platform, v)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_minimums(parsed)
    }

    /// `from_ranges` over version strings, e.g. `[(Platform::Ios, "3.2", "9.0")]`
    pub fn between(ranges: &[(Platform, &str, &str)]) -> Result<Self, ManifestError> {
        let parsed = ranges
            .iter()
            .map(|&(platform, lower, upper)| {
                VersionedRange::parse(lower, upper).map(|r| (platform, r))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_ranges(parsed))
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Lower bound of the platform's range, `None` when the platform is absent
    pub fn minimum_version(&self, platform: Platform) -> Option<&Version> {
        self.range(platform).map(VersionedRange::lower)
    }

    pub fn range(&self, platform: Platform) -> Option<&VersionedRange> {
        self.ranges
            .binary_search_by_key(&platform, |(p, _)| *p)
            .ok()
            .map(|idx| &self.ranges[idx].1)
    }

    /// Whether `version` of `platform` lies inside the declared range
    pub fn supports(&self, platform: Platform, version: &Version) -> bool {
        self.range(platform).is_some_and(|r| r.contains(version))
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.ranges.iter().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &VersionedRange)> + '_ {
        self.ranges.iter().map(|(p, r)| (*p, r))
    }
}

fn upsert(
    ranges: &mut SmallVec<[(Platform, VersionedRange); 2]>,
    platform: Platform,
    range: VersionedRange,
) {
    match ranges.binary_search_by_key(&platform, |(p, _)| *p) {
        Ok(idx) => ranges[idx].1 = range,
        Err(idx) => ranges.insert(idx, (platform, range)),
    }
}
