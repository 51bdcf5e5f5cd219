//! Error types for the adaptive landing engine.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Ranking error: {0}")]
    Rank(#[from] RankError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Section registry construction errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid section key: {0} (keys must be lowercase slugs)")]
    InvalidKey(String),

    #[error("Duplicate section key: {0}")]
    DuplicateKey(String),

    #[error("Registry must contain at least one section")]
    Empty,
}

/// Ranking collaborator errors. Transport and schema failures both land
/// here; the session treats every variant as "no usable order".
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("Ranker {backend} request failed: {reason}")]
    RequestFailed { backend: String, reason: String },

    #[error("Invalid response from ranker: {reason}")]
    InvalidResponse { reason: String },

    #[error("Ranker request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
