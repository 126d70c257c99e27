//! DeepL translation provider
//!
//! Calls the DeepL v2 `/translate` endpoint with one text per request.
//! Free-tier keys (suffix `:fx`) are routed to the free API host.

use std::fmt;

use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::TranslationProvider;
use super::error::TranslationError;

/// Host for free-tier API keys
pub const DEEPL_FREE_API_URL: &str = "https://api-free.deepl.com";

/// Host for paid API keys
pub const DEEPL_PRO_API_URL: &str = "https://api.deepl.com";

/// DeepL-specific "quota exceeded" status
const QUOTA_EXCEEDED_STATUS: u16 = 456;

/// The API host matching a key
pub fn default_base_url(api_key: &str) -> &'static str {
    if api_key.trim().ends_with(":fx") {
        DEEPL_FREE_API_URL
    } else {
        DEEPL_PRO_API_URL
    }
}

/// Configuration for the DeepL provider
#[derive(Clone)]
pub struct DeeplConfig {
    /// DeepL authentication key
    pub api_key: String,

    /// API host, without a trailing slash
    pub base_url: String,
}

impl fmt::Debug for DeeplConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeeplConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DeeplConfig {
    /// Configuration for a key, pointing at the matching API host
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into().trim().to_string();
        let base_url = default_base_url(&api_key).to_string();
        Self { api_key, base_url }
    }

    /// Override the API host
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize, Debug)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    target_lang: &'a str,
}

#[derive(Deserialize, Debug)]
struct TranslateResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Deserialize, Debug)]
struct TranslatedText {
    #[serde(default)]
    detected_source_language: Option<String>,
    text: String,
}

/// Translation provider backed by the DeepL API
#[derive(Debug, Clone)]
pub struct DeeplTranslator {
    client: ReqwestClient,
    config: DeeplConfig,
}

impl DeeplTranslator {
    /// Create a provider for the given configuration
    pub fn new(config: DeeplConfig) -> Self {
        Self {
            client: ReqwestClient::new(),
            config,
        }
    }

    /// Create a provider from a bare API key
    pub fn from_key(api_key: impl Into<String>) -> Self {
        Self::new(DeeplConfig::new(api_key))
    }

    pub fn config(&self) -> &DeeplConfig {
        &self.config
    }

    #[instrument(skip(self, text), fields(chars = text.len()), level = "debug")]
    async fn request(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        let url = format!("{}/v2/translate", self.config.base_url);
        let body = TranslateRequest {
            text: vec![text],
            target_lang: target_language,
        };

        debug!("Sending translation request to {}", url);
        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.config.api_key),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("DeepL error: {} - {}", status, response_text);
            return Err(match status {
                StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                    TranslationError::Auth("Invalid DeepL API key".to_string())
                }
                StatusCode::TOO_MANY_REQUESTS => TranslationError::RateLimited(response_text),
                StatusCode::BAD_REQUEST => TranslationError::InvalidRequest(response_text),
                s if s.as_u16() == QUOTA_EXCEEDED_STATUS => {
                    TranslationError::QuotaExceeded(response_text)
                }
                s => TranslationError::Api {
                    status_code: s.as_u16(),
                    message: response_text,
                },
            });
        }

        let parsed: TranslateResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse response: {}", e);
            TranslationError::UnexpectedResponse(format!("Failed to parse response: {}", e))
        })?;

        let translation = parsed.translations.into_iter().next().ok_or_else(|| {
            TranslationError::UnexpectedResponse("response contained no translations".to_string())
        })?;
        if let Some(detected) = &translation.detected_source_language {
            debug!("DeepL detected source language {}", detected);
        }
        Ok(translation.text)
    }
}

impl TranslationProvider for DeeplTranslator {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        self.request(text, target_language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn translator(server_url: String) -> DeeplTranslator {
        DeeplTranslator::new(DeeplConfig::new("test-key:fx").base_url(server_url))
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(default_base_url("abc:fx"), DEEPL_FREE_API_URL);
        assert_eq!(default_base_url("abc"), DEEPL_PRO_API_URL);
        assert_eq!(DeeplConfig::new(" abc:fx ").base_url, DEEPL_FREE_API_URL);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = DeeplConfig::new("secret-key");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_translate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/translate")
            .match_header("authorization", "DeepL-Auth-Key test-key:fx")
            .match_body(Matcher::Json(serde_json::json!({
                "text": ["Hello"],
                "target_lang": "FR"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"translations":[{"detected_source_language":"EN","text":"Bonjour"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let result = translator(server.url()).translate("Hello", "FR").await.unwrap();
        assert_eq!(result, "Bonjour");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_forbidden_is_auth_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/translate")
            .with_status(403)
            .with_body(r#"{"message":"Wrong endpoint"}"#)
            .create_async()
            .await;

        let result = translator(server.url()).translate("Hello", "FR").await;
        assert!(matches!(result, Err(TranslationError::Auth(_))));
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/translate")
            .with_status(456)
            .with_body("Quota exceeded")
            .create_async()
            .await;

        let result = translator(server.url()).translate("Hello", "FR").await;
        assert!(matches!(result, Err(TranslationError::QuotaExceeded(_))));
    }

    #[tokio::test]
    async fn test_bad_request_is_invalid_request() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/translate")
            .with_status(400)
            .with_body(r#"{"message":"Value for 'target_lang' not supported."}"#)
            .create_async()
            .await;

        let result = translator(server.url()).translate("Hello", "XX").await;
        assert!(matches!(result, Err(TranslationError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_empty_translations_is_unexpected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/translate")
            .with_status(200)
            .with_body(r#"{"translations":[]}"#)
            .create_async()
            .await;

        let result = translator(server.url()).translate("Hello", "FR").await;
        assert!(matches!(
            result,
            Err(TranslationError::UnexpectedResponse(_))
        ));
    }
}
