//! Validation profiles
//!
//! A validation profile tells manifest generation which platform versions the
//! project targets and how strictly availability findings are treated:
//!
//! ```toml
//! mode = "strict"
//!
//! [targets]
//! ios = "15.0"
//! macos = "12"
//! ```
//!
//! Profiles are read from `<config dir>/appmeta/validation.toml` by default.
//! A missing file yields the default profile: no targets, permissive mode.

use appmeta_manifest::{
    extend_with_mode, parse_version, Availability, Dictionary, ManifestEntry, ManifestError,
    Platform, UnknownPlatform, ValidationMode, ValidationReport, VersionedRange,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory below the user config dir holding appmeta settings
pub const CONFIG_DIR_NAME: &str = "appmeta";

/// File name of the validation profile
pub const PROFILE_FILE_NAME: &str = "validation.toml";

/// Error type for profile loading and use
#[derive(Debug)]
pub enum ConfigError {
    /// The profile file exists but could not be read
    Io { path: PathBuf, source: io::Error },
    /// The profile is not valid TOML or has unknown fields
    Parse(toml::de::Error),
    /// A target names a platform that does not exist
    UnknownPlatform(UnknownPlatform),
    /// Two target names resolve to the same platform
    DuplicateTarget {
        platform: Platform,
        first: String,
        second: String,
    },
    /// A target version could not be turned into an availability
    InvalidTarget {
        platform: Platform,
        source: ManifestError,
    },
    /// The platform has no user config directory
    NoConfigDir,
    /// Manifest construction or strict validation failed
    Manifest(ManifestError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse(err) => write!(f, "Failed to parse validation profile: {}", err),
            ConfigError::InvalidTarget { platform, source } => {
                write!(f, "Invalid {} target: {}", platform, source)
            }
            ConfigError::UnknownPlatform(err) => write!(f, "Invalid target: {}", err),
            ConfigError::DuplicateTarget {
                platform,
                first,
                second,
            } => write!(
                f,
                "Targets '{}' and '{}' both name {}",
                first, second, platform
            ),
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Manifest(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::UnknownPlatform(err) => Some(err),
            ConfigError::InvalidTarget { source, .. } => Some(source),
            ConfigError::Manifest(err) => Some(err),
            ConfigError::DuplicateTarget { .. } | ConfigError::NoConfigDir => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Targets and strictness used when merging generated entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub mode: ValidationMode,
    /// Deployment target per platform, e.g. `ios = "15.0"`; platform names
    /// are matched case-insensitively
    pub targets: BTreeMap<String, String>,
}

impl ValidationConfig {
    /// Parse a profile from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Default location of the profile
    ///
    /// - **Linux**: `~/.config/appmeta/validation.toml`
    /// - **macOS**: `~/Library/Application Support/appmeta/validation.toml`
    /// - **Windows**: `%APPDATA%\appmeta\validation.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(PROFILE_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the profile from its default location
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Self::load_from_path(&path)
    }

    /// Load a profile, returning the default profile if the file doesn't exist
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No validation profile at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            "Loaded validation profile from {:?} ({} target(s), mode {:?})",
            path,
            config.targets.len(),
            config.mode
        );
        Ok(config)
    }

    /// Availability spanned by the configured targets
    ///
    /// # Returns
    ///
    /// `None` when no targets are configured, so merging skips validation.
    /// Two names for the same platform (e.g. `ios` and `iOS`) are an error.
    pub fn reference_availability(&self) -> Result<Option<Availability>, ConfigError> {
        if self.targets.is_empty() {
            return Ok(None);
        }

        let mut minimums = Vec::with_capacity(self.targets.len());
        let mut seen: BTreeMap<Platform, &str> = BTreeMap::new();
        for (name, version) in &self.targets {
            let platform: Platform = name.parse().map_err(ConfigError::UnknownPlatform)?;
            if let Some(first) = seen.insert(platform, name) {
                return Err(ConfigError::DuplicateTarget {
                    platform,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
            let window = parse_version(version)
                .and_then(|v| VersionedRange::new(v, platform.latest_known()))
                .map_err(|source| ConfigError::InvalidTarget { platform, source })?;
            minimums.push((platform, window.lower().clone()));
        }

        Availability::from_minimums(minimums)
            .map(Some)
            .map_err(ConfigError::Manifest)
    }

    /// Merge entries into `target` under this profile
    ///
    /// Validates against the configured targets (if any) using the
    /// configured mode, then inserts every entry; strict mode leaves
    /// `target` untouched when a finding is reported.
    pub fn extend<E: ManifestEntry>(
        &self,
        target: &mut Dictionary,
        entries: &[E],
    ) -> Result<ValidationReport, ConfigError> {
        let reference = self.reference_availability()?;
        extend_with_mode(target, entries, reference.as_ref(), self.mode)
            .map_err(ConfigError::Manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appmeta_manifest::{Entry, Value, Version};
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_profile() {
        let config = ValidationConfig::from_toml_str(
            r#"
mode = "strict"

[targets]
ios = "15.0"
macos = "12"
"#,
        );
        assert!(config.is_ok_and(|c| c.mode == ValidationMode::Strict
            && c.targets.get("ios").map(String::as_str) == Some("15.0")
            && c.targets.get("macos").map(String::as_str) == Some("12")));
    }

    #[test]
    fn test_empty_profile_is_default() {
        let config = ValidationConfig::from_toml_str("");
        assert!(config.is_ok_and(|c| c == ValidationConfig::default()));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = ValidationConfig::from_toml_str("strictness = true");
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let result = ValidationConfig::from_toml_str("mode = \"lenient\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_yields_default() {
        let Ok(temp_dir) = TempDir::new() else {
            panic!("failed to create temp dir");
        };
        let path = temp_dir.path().join(PROFILE_FILE_NAME);
        let config = ValidationConfig::load_from_path(&path);
        assert!(config.is_ok_and(|c| c == ValidationConfig::default()));
    }

    #[test]
    fn test_load_from_file() {
        let Ok(temp_dir) = TempDir::new() else {
            panic!("failed to create temp dir");
        };
        let path = temp_dir.path().join(PROFILE_FILE_NAME);
        assert!(fs::write(&path, "mode = \"warn\"\n[targets]\nwatchos = \"9.0\"\n").is_ok());

        let config = ValidationConfig::load_from_path(&path);
        assert!(config.is_ok_and(|c| c.mode == ValidationMode::Warn
            && c.targets.len() == 1));
    }

    #[test]
    fn test_reference_availability() {
        let mut config = ValidationConfig::default();
        assert!(config.reference_availability().is_ok_and(|r| r.is_none()));

        config.targets.insert("iOS".to_string(), "15.2".to_string());
        let reference = config.reference_availability();
        assert!(reference.is_ok_and(|r| r.is_some_and(|a| !a.is_deprecated()
            && a.minimum_version(Platform::Ios) == Some(&Version::new(15, 2, 0)))));
    }

    #[test]
    fn test_invalid_target_version() {
        let mut config = ValidationConfig::default();
        config.targets.insert("tvos".to_string(), "latest".to_string());
        assert!(matches!(
            config.reference_availability(),
            Err(ConfigError::InvalidTarget {
                platform: Platform::Tvos,
                ..
            })
        ));

        config.targets.insert("tvos".to_string(), "99.0".to_string());
        assert!(matches!(
            config.reference_availability(),
            Err(ConfigError::InvalidTarget {
                platform: Platform::Tvos,
                source: ManifestError::InvertedRange { .. },
            })
        ));
    }

    #[test]
    fn test_unknown_platform_target() {
        let Ok(config) = ValidationConfig::from_toml_str("[targets]\nandroid = \"14\"") else {
            panic!("profile should parse");
        };
        assert!(matches!(
            config.reference_availability(),
            Err(ConfigError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_duplicate_platform_target() {
        let Ok(config) =
            ValidationConfig::from_toml_str("[targets]\niOS = \"14.0\"\nios = \"15.0\"\n")
        else {
            panic!("profile should parse");
        };
        let result = config.reference_availability();
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateTarget {
                platform: Platform::Ios,
                ..
            })
        ));
        assert!(result.is_err_and(|e| e.to_string() == "Targets 'iOS' and 'ios' both name iOS"));
    }

    #[test]
    fn test_strict_profile_rejects_uncovered_entries() {
        let profile = "mode = \"strict\"\n[targets]\nios = \"13.0\"\n";
        let Ok(config) = ValidationConfig::from_toml_str(profile) else {
            panic!("valid profile rejected");
        };
        let Ok(entry) = Entry::new(
            "NSUserTrackingUsageDescription",
            None,
            Value::from("Ads"),
            None,
            Availability::since(&[(Platform::Ios, "14.0")]).ok(),
            false,
        ) else {
            panic!("entry rejected");
        };

        let mut target = Dictionary::default();
        let result = config.extend(&mut target, &[entry]);
        assert!(matches!(
            result,
            Err(ConfigError::Manifest(ManifestError::Validation { .. }))
        ));
        assert!(target.is_empty());
    }

    #[test]
    fn test_default_profile_merges_everything() {
        let config = ValidationConfig::default();
        let entries = [Entry::leaf("CFBundleName", "App"), Entry::leaf("CFBundleName", "Final")];
        let Ok(entries) = entries.into_iter().collect::<Result<Vec<_>, _>>() else {
            panic!("leaves rejected");
        };

        let mut target = Dictionary::default();
        let report = config.extend(&mut target, &entries);
        assert!(report.is_ok_and(|r| r.visited == 0 && r.is_clean()));
        assert_eq!(target.get("CFBundleName"), Some(&Value::from("Final")));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let err = ConfigError::InvalidTarget {
            platform: Platform::Watchos,
            source: ManifestError::InvalidVersion {
                input: "x".to_string(),
                reason: "components must be non-negative integers".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid watchOS target: Invalid version 'x': components must be non-negative integers"
        );
    }
}
