//! Target platforms and their latest known releases.

use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform of an application manifest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Platform {
    Ios = 0,
    Ipados = 1,
    Maccatalyst = 2,
    Macos = 3,
    Tvos = 4,
    Visionos = 5,
    Watchos = 6,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Ios,
        Platform::Ipados,
        Platform::Maccatalyst,
        Platform::Macos,
        Platform::Tvos,
        Platform::Visionos,
        Platform::Watchos,
    ];

    /// Newest release this library knows about; open-ended availability
    /// windows end here.
    pub fn latest_known(self) -> Version {
        match self {
            Platform::Ios => Version::new(18, 0, 0),
            Platform::Ipados => Version::new(18, 0, 0),
            Platform::Maccatalyst => Version::new(18, 0, 0),
            Platform::Macos => Version::new(15, 0, 0),
            Platform::Tvos => Version::new(18, 0, 0),
            Platform::Visionos => Version::new(2, 0, 0),
            Platform::Watchos => Version::new(11, 0, 0),
        }
    }

    /// Identifier used in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Ipados => "ipados",
            Platform::Maccatalyst => "maccatalyst",
            Platform::Macos => "macos",
            Platform::Tvos => "tvos",
            Platform::Visionos => "visionos",
            Platform::Watchos => "watchos",
        }
    }

    /// Marketing name
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Ipados => "iPadOS",
            Platform::Maccatalyst => "Mac Catalyst",
            Platform::Macos => "macOS",
            Platform::Tvos => "tvOS",
            Platform::Visionos => "visionOS",
            Platform::Watchos => "watchOS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a platform identifier is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Accepts identifiers and marketing names, case-insensitively
    /// ("ios", "iOS", "Mac Catalyst", "mac-catalyst").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}
