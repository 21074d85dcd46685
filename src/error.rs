//! Error types for the dashboard service

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Missing identity: {0}")]
    MissingIdentity(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Google credentials not configured: {0}")]
    MissingCredentials(String),

    #[error("Google account not connected for this user")]
    NotConnected,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
