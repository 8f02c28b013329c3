use thiserror::Error;

/// Main error type for the player intelligence service
#[derive(Error, Debug)]
pub enum ScoutError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream provider error: {0}")]
    Upstream(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Advisory errors
    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("Advisor not configured: {0}")]
    AdvisorNotConfigured(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ScoutError
pub type Result<T> = std::result::Result<T, ScoutError>;
