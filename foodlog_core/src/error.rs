//! Error types for the foodlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for foodlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value violated a data model constraint
    #[error("Validation error: {0}")]
    Validation(String),

    /// A date string could not be parsed
    #[error("{0}")]
    InvalidDate(String),

    /// Requested entry, log or cached food does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API key missing, malformed or unknown
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The user has not configured goals yet
    #[error("No settings found. Please use setup_user first.")]
    SettingsMissing,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
