//! Error types for pesv-sizing

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Persistence-related errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store file is corrupted: {0}")]
    Corrupted(String),

    #[error("Commit failed: {0}")]
    CommitFailed(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
