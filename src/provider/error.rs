//! Provider error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key contains invalid characters")]
    InvalidApiKey,

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Http(e.to_string())
        }
    }
}

impl ProviderError {
    /// Whether a retry with backoff has any chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimitExceeded(_) | ProviderError::Timeout => true,
            ProviderError::Http(_) => true,
            ProviderError::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
