//! Error types for the page module

use crate::error::Error as CrateError;
use crate::http::FetchError;
use thiserror::Error;

/// Error type for page extraction
#[derive(Debug, Error)]
pub enum PageError {
    /// The page could not be downloaded
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// HTML parsing error
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),
}

impl From<PageError> for CrateError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Fetch(e) => CrateError::Fetch(e),
            _ => CrateError::Page(err.to_string()),
        }
    }
}
