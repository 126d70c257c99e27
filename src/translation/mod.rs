//! Translation gateway
//!
//! A [`TranslationGateway`] pairs a [`TranslationProvider`] with a
//! [`TranslationCache`] so that each `(text, target language)` pair is sent
//! to the provider at most once per gateway.

mod cache;
mod deepl;
mod error;
pub mod languages;
mod ratelimited;

pub use cache::{CacheStats, TranslationCache};
pub use deepl::{DEEPL_FREE_API_URL, DEEPL_PRO_API_URL, DeeplConfig, DeeplTranslator};
pub use error::TranslationError;
pub use ratelimited::RateLimitedProvider;

use std::future::Future;

use tracing::{debug, instrument};

/// A service that translates text into a target language
pub trait TranslationProvider: Send + Sync {
    /// Translate `text` into `target_language` (a DeepL code such as `FR`)
    fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> impl Future<Output = Result<String, TranslationError>> + Send;
}

/// Memoizing front for a translation provider
#[derive(Debug)]
pub struct TranslationGateway<P: TranslationProvider> {
    provider: P,
    cache: TranslationCache,
}

impl<P: TranslationProvider> TranslationGateway<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: TranslationCache::new(),
        }
    }

    /// Translate through the cache
    ///
    /// Failed requests are not cached and are returned as-is.
    #[instrument(skip(self, text), fields(chars = text.len()), level = "debug")]
    pub async fn translate(
        &mut self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if let Some(cached) = self.cache.lookup(text, target_language) {
            debug!("Translation cache hit");
            return Ok(cached.to_string());
        }

        let translated = self.provider.translate(text, target_language).await?;
        self.cache
            .insert(text, target_language, translated.clone());
        Ok(translated)
    }

    /// Swap the provider, e.g. after the API key changed
    ///
    /// Cached translations belong to the old credential and are dropped.
    pub fn replace_provider(&mut self, provider: P) {
        self.provider = provider;
        self.cache.clear();
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
