//! Failures of a text generation call

use thiserror::Error;

/// Why a completion could not be produced
#[derive(Error, Debug)]
pub enum LlmError {
    /// The provider refused the API key
    #[error("Provider rejected credentials: {0}")]
    Authentication(String),

    #[error("Provider quota exhausted: {message}{}", retry_hint(.retry_after))]
    RateLimited {
        /// Seconds the provider asked us to wait
        retry_after: Option<u64>,
        message: String,
    },

    /// The prompt or parameters were refused (context too long, unknown model)
    #[error("Provider refused the request: {0}")]
    InvalidRequest(String),

    #[error("Provider unreachable: {0}")]
    Network(String),

    #[error("Provider did not answer in time")]
    Timeout,

    #[error("Provider unavailable: {0}")]
    ServiceUnavailable(String),

    /// Any other non-success status
    #[error("Provider answered {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Unreadable provider response: {0}")]
    InvalidResponse(String),

    #[error("Empty response from language model")]
    EmptyCompletion,
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    retry_after
        .map(|secs| format!(" (retry after {secs}s)"))
        .unwrap_or_default()
}

impl LlmError {
    /// Transient failures a caller may retry later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. }
                | LlmError::Network(_)
                | LlmError::Timeout
                | LlmError::ServiceUnavailable(_)
        )
    }

    pub fn rate_limited(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimited {
            retry_after,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
