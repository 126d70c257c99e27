use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{Instrument, debug_span, info_span};

use super::TranslationProvider;
use super::error::TranslationError;

/// Throttles requests to a wrapped provider
///
/// Requests wait for the limiter before being sent. Nothing is retried.
#[derive(Clone)]
pub struct RateLimitedProvider<P: TranslationProvider> {
    provider: P,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl<P> RateLimitedProvider<P>
where
    P: TranslationProvider,
{
    pub fn new(provider: P, limiter: DefaultDirectRateLimiter) -> Self {
        Self {
            provider,
            limiter: Arc::new(limiter),
        }
    }

    /// Allow at most `requests` calls per minute
    pub fn per_minute(provider: P, requests: NonZeroU32) -> Self {
        Self::new(provider, RateLimiter::direct(Quota::per_minute(requests)))
    }
}

impl<P: TranslationProvider> TranslationProvider for RateLimitedProvider<P> {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        self.limiter.until_ready().instrument(debug_span!("limiter")).await;
        self.provider
            .translate(text, target_language)
            .instrument(info_span!("translate", target_language))
            .await
    }
}
