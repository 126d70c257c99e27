//! Error types for the sitemap module

use crate::error::Error as CrateError;
use crate::http::FetchError;
use thiserror::Error;

/// Error type for sitemap resolution
#[derive(Debug, Error)]
pub enum SitemapError {
    /// The site root is not a usable absolute URL
    #[error("invalid site root '{root}': {source}")]
    InvalidRoot {
        root: String,
        #[source]
        source: url::ParseError,
    },

    /// A sitemap could not be downloaded
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A sitemap body is not well-formed sitemap XML
    #[error("malformed sitemap XML at {url}: {source}")]
    Xml {
        url: String,
        #[source]
        source: quick_xml::errors::serialize::DeError,
    },
}

impl From<SitemapError> for CrateError {
    fn from(err: SitemapError) -> Self {
        match err {
            SitemapError::Fetch(e) => CrateError::Fetch(e),
            _ => CrateError::Sitemap(err.to_string()),
        }
    }
}
