//! Configuration file loading and parsing.
//!
//! This module handles loading the configuration file from disk and parsing
//! it into validated, type-safe structures.
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path specified via `--config` CLI flag
//! 2. Default location:
//!    - **Linux/macOS:** `~/.bondpad-mapper/config.json`
//!    - **Windows:** `%USERPROFILE%\.bondpad-mapper\config.json`
//!
//! A missing file at the default location is not an error; built-in
//! defaults are used instead. A missing file at an explicit path is.
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "style": { "scale": 1.5, "color_scheme": { "palette": "grey" }, "line_scope": "all" },
//!   "rings": { "threshold": { "fixed": 2.0 } },
//!   "calibration": { "offsets": { "left": 0, "right": 0, "top": 0, "bottom": 0 } },
//!   "pins": { "pin_no": "pin_no", "pin_name": "pin_name", "x": "x", "y": "y" },
//!   "logging": { "level": "warn" }
//! }
//! ```

mod settings;

pub use settings::{
    CalibrationConfig, Config, LoggingConfig, RingsConfig, SidesConfig, StyleConfig,
    DEFAULT_PX_PER_UM,
};

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.bondpad-mapper/`
/// - **Windows:** `%USERPROFILE%\.bondpad-mapper\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".bondpad-mapper"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file.
///
/// If `path` is `None`, uses the platform-specific default location.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be found
/// - The file cannot be read
/// - The JSON is malformed
/// - Required fields are missing or invalid
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path().ok_or_else(|| ConfigError::NotFound {
            path: PathBuf::from("<default config path>"),
        })?,
    };

    if !config_path.exists() {
        return Err(ConfigError::NotFound { path: config_path });
    }

    let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}

/// Loads the configuration, falling back to defaults when no file exists at
/// the default location.
///
/// # Errors
///
/// Returns an error if an explicit `path` is missing, or if any existing
/// file cannot be read, parsed or validated.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::NotFound { path: missing }) if path.is_none() => {
            debug!(path = %missing.display(), "No configuration file, using defaults");
            Ok(Config::default())
        }
        other => other,
    }
}
