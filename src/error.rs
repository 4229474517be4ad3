//! Error types for bondpad-mapper.
//!
//! The geometric core never fails: degenerate inputs render an empty or
//! partially classified scene instead. Errors only arise at the edges, when
//! configuration, pin tables or job files are read and written.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Result type for input and output operations.
pub type InputResult<T> = Result<T, InputError>;

/// Errors that can occur while reading pin tables and job files, or writing reports.
#[derive(Error, Debug)]
pub enum InputError {
    /// An input file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The pin table is not valid CSV.
    #[error("malformed pin table")]
    Csv(#[from] csv::Error),

    /// A job file is not valid JSON, or does not match the job schema.
    #[error("failed to parse job file: {path}")]
    Json {
        /// Path to the job file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A required column is missing from the pin table header.
    #[error("pin table has no '{column}' column")]
    MissingColumn {
        /// Configured column name.
        column: String,
    },

    /// Chip size text could not be understood.
    #[error("invalid chip size '{text}': expected e.g. \"1200 um x 900 um\"")]
    InvalidChipSize {
        /// The offending text.
        text: String,
    },

    /// A report could not be written.
    #[error("failed to write {path}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("invalid setting"));
    }

    #[test]
    fn missing_column_display() {
        let error = InputError::MissingColumn {
            column: "pin_no".to_string(),
        };
        assert!(error.to_string().contains("'pin_no'"));
    }

    #[test]
    fn chip_size_error_display() {
        let error = InputError::InvalidChipSize {
            text: "huge".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("huge"));
        assert!(msg.contains("um x"));
    }
}
