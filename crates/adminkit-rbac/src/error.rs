//! Error types for the access-control core

use thiserror::Error;

/// Result type for access-control operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing or loading access-control data.
///
/// Evaluation itself never fails: malformed permission strings simply never
/// match. These variants only surface from strict parsing and configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid permission: {0}")]
    InvalidPermission(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Duplicate route rule for path: {0}")]
    DuplicateRoute(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
