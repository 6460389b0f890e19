//! # Error Handling
//!
//! Centralized error handling for the unification engine and its CLI,
//! built on `thiserror`. Per-record anomalies (unidentifiable records,
//! key collisions, identifier reuse) are deliberately *not* errors: the
//! engine recovers from them locally, counts them, and reports them
//! through the conflict report. The variants here cover the conditions
//! that do abort an operation:
//!
//! - An empty input collection (`NoData`): a run over nothing must not
//!   look like a successful run that produced nothing.
//! - Malformed configuration, link table or input files.
//! - Export failures.
//! - Wrapped I/O and (de)serialization errors.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for journal unification operations
#[derive(Error, Debug)]
pub enum Error {
    /// No source records were supplied to the engine.
    #[error("no journal records to unify; load source data first")]
    NoData,

    /// The priority override file could not be parsed or failed validation.
    ///
    /// Includes the specific issue and optionally a hint on how to fix it.
    #[error("priority configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The ISSN link table could not be loaded.
    #[error("link table error for {}: {message}", .path.display())]
    LinkTable { path: PathBuf, message: String },

    /// A record input file could not be read or contained no usable data.
    #[error("input error for {}: {message}", .path.display())]
    InputRead { path: PathBuf, message: String },

    /// An export target could not be written.
    #[error("export error for {}: {message}", .path.display())]
    Export { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_display() {
        let display = format!("{}", Error::NoData);
        assert!(display.contains("no journal records"));
    }

    #[test]
    fn test_config_parse_display_with_hint() {
        let error = Error::ConfigParse {
            message: "negative priority for source 'doaj'".to_string(),
            hint: Some("priorities must be non-negative integers".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("priority configuration error"));
        assert!(display.contains("negative priority"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_config_parse_display_without_hint() {
        let error = Error::ConfigParse {
            message: "unknown source tag".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("unknown source tag"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_input_read_display() {
        let error = Error::InputRead {
            path: PathBuf::from("data/raw/doaj.jsonl"),
            message: "not valid JSON Lines".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("data/raw/doaj.jsonl"));
        assert!(display.contains("not valid JSON Lines"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: Error = json_error.into();
        assert!(format!("{}", error).contains("JSON error"));
    }
}
