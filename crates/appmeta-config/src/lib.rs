//! Configuration for appmeta manifest generation

pub mod profile;

pub use profile::{ConfigError, ValidationConfig, CONFIG_DIR_NAME, PROFILE_FILE_NAME};
