use thiserror::Error;

use crate::converge::ProbeError;

#[derive(Error, Debug)]
pub enum DatadogError {
    #[error("API request failed (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid provider configuration: {0}")]
    ConfigError(String),

    #[error("Invalid Terraform state: {0}")]
    StateError(String),

    #[error(transparent)]
    Convergence(#[from] ProbeError),

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Timeout occurred")]
    TimeoutError,
}

impl DatadogError {
    /// HTTP status behind this error, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DatadogError::ApiError { status, .. } => Some(*status),
            DatadogError::NotFound(_) => Some(404),
            DatadogError::RateLimitError => Some(429),
            DatadogError::TimeoutError => Some(408),
            DatadogError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, DatadogError>;
