//! Page content extraction
//!
//! Fetches a single page and pulls out what ends up in the spreadsheet:
//! the document title, the meta description, and the ordered headings,
//! paragraphs and list items of the page's `<main>` region.

mod error;
mod extraction;

pub use error::PageError;
pub use extraction::parse_page;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::http::HttpClient;

/// Text written in place of a missing meta description
pub const MISSING_META_SENTINEL: &str = "None";

/// Kind of a content node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    /// `h1` to `h6`, with the level
    Heading(u8),
    /// `p`
    Paragraph,
    /// `li`
    ListItem,
}

/// A non-empty text element from the main content region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    pub kind: ContentKind,
    pub text: String,
}

impl ContentNode {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Heading(level),
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Paragraph,
            text: text.into(),
        }
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::ListItem,
            text: text.into(),
        }
    }

    /// Headings are rendered bold in every column
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, ContentKind::Heading(_))
    }
}

/// Extracted content of one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Trimmed `<title>` text, `None` when absent or blank
    pub title: Option<String>,

    /// `content` of `<meta name="description">`
    pub meta_description: Option<String>,

    /// Allow-listed elements of `<main>` in document order
    pub ordered_elements: Vec<ContentNode>,
}

impl PageContent {
    /// The meta description, or the `"None"` sentinel
    pub fn meta_description_or_sentinel(&self) -> &str {
        self.meta_description
            .as_deref()
            .unwrap_or(MISSING_META_SENTINEL)
    }
}

/// Fetches pages and extracts their content
#[derive(Debug, Clone, Default)]
pub struct PageExtractor {
    client: HttpClient,
}

impl PageExtractor {
    /// Create an extractor on top of an HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Download the raw HTML of a page
    pub async fn fetch_html(&self, url: &str) -> Result<String, PageError> {
        Ok(self.client.get_text(url).await?)
    }

    /// Fetch a page and extract its content
    #[instrument(skip(self))]
    pub async fn extract(&self, url: &str) -> Result<PageContent, PageError> {
        let html = self.fetch_html(url).await?;
        let content = parse_page(&html)?;
        debug!(
            "Extracted {} content nodes from {}",
            content.ordered_elements.len(),
            url
        );
        Ok(content)
    }
}
