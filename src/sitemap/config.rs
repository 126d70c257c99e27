//! # Sitemap Resolver Configuration
//!
//! Controls which parts of a site's sitemap tree end up in the resolved URL
//! set. Built with the same builder pattern as the rest of the crate's
//! configuration types.
//!
//! ## Key Components
//!
//! - `ResolverConfig`: blog inclusion, explicit ignore list, nesting depth
//! - `ResolverConfigBuilder`: fluent construction

use std::collections::BTreeSet;

use url::Url;

/// File name WordPress/Yoast sites use for the blog post sitemap
pub const DEFAULT_BLOG_SITEMAP: &str = "post-sitemap.xml";

/// Paths (relative to the site root) that are usually legal boilerplate
pub const DEFAULT_IGNORED_PATHS: &[&str] = &[
    "disclaimer/",
    "privacy-statement-us/",
    "privacy-policy/",
    "opt-out-preferences/",
    "blog/",
];

/// Configuration for sitemap resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Whether URLs from the blog sitemap are included
    pub include_blog_posts: bool,

    /// Exact page URLs to leave out of the result
    pub ignored_urls: BTreeSet<String>,

    /// Last path segment identifying the blog sitemap
    pub blog_sitemap_name: String,

    /// How many levels of nested sitemap indexes to follow below the root
    pub max_depth: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            include_blog_posts: false,
            ignored_urls: BTreeSet::new(),
            blog_sitemap_name: DEFAULT_BLOG_SITEMAP.to_string(),
            max_depth: 2,
        }
    }
}

impl ResolverConfig {
    /// Create a new builder
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::new()
    }

    /// Add the standard boilerplate pages under `root` to the ignore list
    ///
    /// Paths that cannot be joined onto `root` are skipped.
    pub fn with_default_ignored_paths(mut self, root: &Url) -> Self {
        for path in DEFAULT_IGNORED_PATHS {
            if let Ok(url) = root.join(path) {
                self.ignored_urls.insert(url.to_string());
            }
        }
        self
    }

    /// Whether a child sitemap location points at the blog sitemap
    pub fn is_blog_sitemap(&self, location: &str) -> bool {
        let segment = match Url::parse(location) {
            Ok(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
                .unwrap_or_default(),
            Err(_) => location.rsplit('/').next().unwrap_or_default().to_string(),
        };
        segment == self.blog_sitemap_name
    }
}

/// Builder for ResolverConfig
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    /// Set whether blog posts are included
    pub fn include_blog_posts(mut self, include_blog_posts: bool) -> Self {
        self.config.include_blog_posts = include_blog_posts;
        self
    }

    /// Replace the ignore list
    pub fn ignored_urls<I, S>(mut self, ignored_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ignored_urls = ignored_urls.into_iter().map(Into::into).collect();
        self
    }

    /// Add one URL to the ignore list
    pub fn ignore_url(mut self, url: impl Into<String>) -> Self {
        self.config.ignored_urls.insert(url.into());
        self
    }

    /// Set the blog sitemap file name
    pub fn blog_sitemap_name(mut self, name: impl Into<String>) -> Self {
        self.config.blog_sitemap_name = name.into();
        self
    }

    /// Set the maximum nesting depth for sitemap indexes
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ResolverConfig {
        self.config
    }
}
