//! # Error Types
//!
//! Custom error types for the RTL433 reader using `thiserror`.
//!
//! Every variant is fatal to the query that produced it. Nothing is retried
//! internally and no partial snapshot is returned.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the RTL433 reader
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Device catalog could not be opened or read
    #[error("Device catalog unavailable at {}: {source}", path.display())]
    CatalogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Device catalog is not valid JSON or lacks the `devices` list
    #[error("Device catalog format error: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    /// Telemetry log could not be read, or could not be rewritten while trimming
    #[error("Telemetry log unavailable at {}: {source}", path.display())]
    LogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log line visited during the backward scan is not valid JSON
    #[error("Malformed log entry at index {index}: {source}")]
    EntryParse {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A log entry lacks a field its device mapping (or the scan) requires
    #[error("Log entry at index {index} is missing field '{field}'")]
    MissingField { index: usize, field: String },

    /// Trim boundary lies beyond the lines read from the log
    #[error("Trim boundary {boundary} exceeds log length {len}")]
    InvalidBoundary { boundary: usize, len: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the RTL433 reader
pub type Result<T> = std::result::Result<T, ReaderError>;
