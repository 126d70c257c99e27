//! Error types for the document module

use std::path::PathBuf;

use crate::error::Error as CrateError;
use crate::page::PageError;
use crate::translation::TranslationError;
use thiserror::Error;

/// Error type for document assembly
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A page could not be fetched or parsed
    #[error("failed to extract {url}: {source}")]
    Page {
        url: String,
        #[source]
        source: PageError,
    },

    /// The translation provider rejected a request
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// The spreadsheet writer failed
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// A sheet index that was never created
    #[error("no sheet with index {0}")]
    UnknownSheet(usize),

    /// Neither the preferred nor the fallback directory could be created
    #[error("cannot create output directory {fallback} (after {primary} failed): {source}")]
    OutputDir {
        primary: PathBuf,
        fallback: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<DocumentError> for CrateError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Page { source, .. } => source.into(),
            DocumentError::Translation(e) => CrateError::Translation(e),
            _ => CrateError::Output(err.to_string()),
        }
    }
}
