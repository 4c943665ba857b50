//! Error types for the outlive_core library.
//!
//! The synthesis pipeline itself is total and never fails; these errors only
//! surface at the loading boundary (config files, input bundles, lab CSVs).

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for outlive_core operations
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

    /// Input record could not be interpreted
    #[error("Input error: {0}")]
    Input(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
