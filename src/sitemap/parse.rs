//! Sitemap XML parsing
//!
//! Both sitemap flavours are read through one serde shape: the root element
//! name is not checked, so a `<sitemapindex>` fills `sitemap` entries and a
//! `<urlset>` fills `url` entries.

use quick_xml::de::from_str;
use quick_xml::errors::serialize::DeError;
use serde::Deserialize;

/// Serde view of either `<sitemapindex>` or `<urlset>`
#[derive(Deserialize, Debug, Default)]
struct RawSitemap {
    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<LocEntry>,

    #[serde(rename = "url", default)]
    urls: Vec<LocEntry>,
}

/// A `<sitemap>` or `<url>` element; only `<loc>` matters here
#[derive(Deserialize, Debug)]
struct LocEntry {
    #[serde(default)]
    loc: Option<String>,
}

/// Parsed sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Child sitemap locations (`<sitemap><loc>`)
    pub sitemaps: Vec<String>,

    /// Page locations (`<url><loc>`)
    pub urls: Vec<String>,
}

impl SitemapDocument {
    /// True when the document lists neither child sitemaps nor pages
    pub fn is_empty(&self) -> bool {
        self.sitemaps.is_empty() && self.urls.is_empty()
    }
}

/// Parse a sitemap index or url set
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, DeError> {
    let raw: RawSitemap = from_str(xml)?;
    Ok(SitemapDocument {
        sitemaps: collect_locations(raw.sitemaps),
        urls: collect_locations(raw.urls),
    })
}

fn collect_locations(entries: Vec<LocEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| entry.loc)
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}
