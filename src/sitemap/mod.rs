//! # Sitemap Resolver
//!
//! Discovers the pages of a site by reading its `sitemap.xml`. It is the
//! first stage of the pipeline: the resolved URL set is what the document
//! assembler later walks page by page.
//!
//! ## Key Components
//!
//! - `ResolverConfig`: blog inclusion, ignore list, nesting depth
//! - `SitemapResolver`: fetches the root sitemap and its children
//! - `resolve`: one-call form of the resolver contract
//!
//! ## Behavior
//!
//! - The root sitemap is fetched from `<root>/sitemap.xml`; any failure
//!   there fails the whole call.
//! - Every `<sitemap><loc>` child is fetched in order, except the blog
//!   sitemap when blog posts are excluded.
//! - A child that fails to fetch or parse also fails the whole call.
//! - Every `<url><loc>` is collected into a set, minus the ignore list.

mod config;
mod error;
mod parse;

pub use config::{
    DEFAULT_BLOG_SITEMAP, DEFAULT_IGNORED_PATHS, ResolverConfig, ResolverConfigBuilder,
};
pub use error::SitemapError;
pub use parse::{SitemapDocument, parse_sitemap};

use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::http::HttpClient;

/// Normalize a site root so relative joins land underneath it
///
/// `https://ex.com/en` becomes `https://ex.com/en/`.
pub fn normalize_root(root_url: &str) -> Result<Url, SitemapError> {
    let mut url = Url::parse(root_url.trim()).map_err(|source| SitemapError::InvalidRoot {
        root: root_url.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolves a site's page URLs from its sitemap tree
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: HttpClient,
    config: ResolverConfig,
}

impl SitemapResolver {
    /// Create a resolver
    pub fn new(client: HttpClient, config: ResolverConfig) -> Self {
        Self { client, config }
    }

    /// The resolver's configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve every page URL reachable from the site's root sitemap
    #[instrument(skip(self))]
    pub async fn resolve(&self, root_url: &str) -> Result<BTreeSet<String>, SitemapError> {
        let root = normalize_root(root_url)?;
        let root_sitemap = root
            .join("sitemap.xml")
            .map_err(|source| SitemapError::InvalidRoot {
                root: root_url.to_string(),
                source,
            })?
            .to_string();

        info!("Resolving sitemap {}", root_sitemap);

        let mut pages = BTreeSet::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(root_sitemap.clone());

        let document = self.fetch_document(&root_sitemap).await?;
        self.collect(&document, &mut pages);
        for child in document.sitemaps {
            queue.push_back((child, 1u32));
        }

        while let Some((location, depth)) = queue.pop_front() {
            if !seen.insert(location.clone()) {
                debug!("Skipping already fetched sitemap {}", location);
                continue;
            }
            if !self.config.include_blog_posts && self.config.is_blog_sitemap(&location) {
                debug!("Skipping blog sitemap {}", location);
                continue;
            }
            if depth > self.config.max_depth {
                warn!(
                    "Skipping sitemap {} nested deeper than {}",
                    location, self.config.max_depth
                );
                continue;
            }

            let document = self.fetch_document(&location).await?;
            debug!(
                "Sitemap {} lists {} pages and {} sitemaps",
                location,
                document.urls.len(),
                document.sitemaps.len()
            );
            self.collect(&document, &mut pages);
            for child in document.sitemaps {
                queue.push_back((child, depth + 1));
            }
        }

        info!("Resolved {} page URLs", pages.len());
        Ok(pages)
    }

    async fn fetch_document(&self, location: &str) -> Result<SitemapDocument, SitemapError> {
        let body = self.client.get_text(location).await?;
        parse_sitemap(&body).map_err(|source| SitemapError::Xml {
            url: location.to_string(),
            source,
        })
    }

    fn collect(&self, document: &SitemapDocument, pages: &mut BTreeSet<String>) {
        for url in &document.urls {
            if self.config.ignored_urls.contains(url) {
                debug!("Ignoring {}", url);
                continue;
            }
            pages.insert(url.clone());
        }
    }
}

/// Resolve a site's pages with an explicit blog flag and ignore list
pub async fn resolve(
    client: &HttpClient,
    root_url: &str,
    include_blog_posts: bool,
    ignored_urls: &BTreeSet<String>,
) -> Result<BTreeSet<String>, SitemapError> {
    let config = ResolverConfig::builder()
        .include_blog_posts(include_blog_posts)
        .ignored_urls(ignored_urls.iter().cloned())
        .build();
    SitemapResolver::new(client.clone(), config)
        .resolve(root_url)
        .await
}
