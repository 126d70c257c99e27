//! Error types for the translation module

use thiserror::Error;

/// Error type for translation requests
///
/// None of these are retried; a failed request fails the current run.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the API key
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The account's character quota is used up
    #[error("Translation quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Too many requests in a short period
    #[error("Rate limited by translation provider: {0}")]
    RateLimited(String),

    /// Bad parameters, e.g. an unsupported target language
    #[error("Invalid translation request: {0}")]
    InvalidRequest(String),

    /// Any other non-success response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}
