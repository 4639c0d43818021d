//! Error types for the runplan_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for runplan_core operations
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

    /// Malformed duration, distance, pace or zone token
    #[error("Format error: {0}")]
    Format(String),

    /// A workout value violated one of its invariants
    #[error("Invalid workout: {0}")]
    Model(String),

    /// The plan document as a whole is unusable
    #[error("Plan error: {0}")]
    Plan(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
