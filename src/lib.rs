//! # webtranslator - website content to translated spreadsheets
//!
//! This crate discovers a website's pages through its sitemap, extracts the
//! title, meta description and main content of each page, optionally
//! translates that content with DeepL, and writes everything to an `.xlsx`
//! workbook with one sheet per page behind a table of contents.
//!
//! ## Pipeline
//!
//! - [`sitemap`]: resolve the set of page URLs from `sitemap.xml`
//! - [`page`]: fetch a page and extract its ordered content
//! - [`translation`]: cached, rate-limited translation through DeepL
//! - [`document`]: assemble and save the workbook, reporting progress
//!
//! ## Example
//!
//! ```rust,no_run
//! use webtranslator::document::{DocumentConfig, NoProgress, create_document};
//! use webtranslator::http::HttpClient;
//! use webtranslator::page::PageExtractor;
//! use webtranslator::sitemap::{ResolverConfig, SitemapResolver};
//! use webtranslator::translation::{DeeplTranslator, TranslationGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new();
//!     let resolver = SitemapResolver::new(client.clone(), ResolverConfig::default());
//!     let urls: Vec<String> = resolver
//!         .resolve("https://example.com")
//!         .await?
//!         .into_iter()
//!         .collect();
//!
//!     let gateway = TranslationGateway::new(DeeplTranslator::from_key("your-key:fx"));
//!     let config = DocumentConfig::builder()
//!         .company_name("Example")
//!         .source_language("EN-US")
//!         .target_languages(["FR", "DE"])
//!         .build();
//!
//!     let summary = create_document(
//!         PageExtractor::new(client),
//!         Some(gateway),
//!         config,
//!         &urls,
//!         std::path::Path::new("out"),
//!         NoProgress,
//!     )
//!     .await?;
//!     println!("Wrote {}", summary.path.display());
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod credentials;
pub mod document;
pub mod http;
pub mod page;
pub mod sitemap;
pub mod translation;

pub use error::{Error, Result};

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::document::{DocumentConfig, DocumentSummary, create_document};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::page::{PageContent, PageExtractor};
    pub use crate::sitemap::{ResolverConfig, SitemapResolver};
    pub use crate::translation::{TranslationGateway, TranslationProvider};
}
