//! Error types for the webtranslator crate

use thiserror::Error;

/// Result type for webtranslator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for webtranslator operations
///
/// Each pipeline stage has its own error enum; they all convert into this
/// one so callers driving the whole pipeline can use a single `?`.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or HTTP status failure
    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::http::FetchError),

    /// Sitemap resolution failure
    #[error("Sitemap error: {0}")]
    Sitemap(String),

    /// Page extraction failure
    #[error("Page error: {0}")]
    Page(String),

    /// Translation provider rejected a request
    #[error("Translation error: {0}")]
    Translation(#[from] crate::translation::TranslationError),

    /// No usable API key
    #[error("Credential error: {0}")]
    Credential(#[from] crate::credentials::CredentialError),

    /// Configuration file problem
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Output directory or workbook could not be written
    #[error("Output error: {0}")]
    Output(String),
}
