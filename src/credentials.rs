//! DeepL API key sourcing
//!
//! Keys are looked up in order: an explicit value (CLI flag), the
//! `DEEPL_API_KEY` environment variable, the user config file, and finally
//! an interactive prompt when stdin is a terminal. The first key found is
//! cached for the lifetime of the [`Credentials`] value.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigError, default_config_path};

/// Environment variable holding the DeepL key
pub const API_KEY_ENV: &str = "DEEPL_API_KEY";

/// Error type for credential lookup
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No source produced a key
    #[error("no DeepL API key found; set DEEPL_API_KEY or run `set-key`")]
    Missing,

    /// The key could not be persisted
    #[error("failed to save API key: {0}")]
    Save(#[from] ConfigError),

    /// Reading the prompt answer failed
    #[error("failed to read API key from terminal: {0}")]
    Prompt(#[from] io::Error),
}

/// Where a key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Explicit,
    Environment,
    ConfigFile,
    Prompt,
}

/// Pick the first non-blank key from the non-interactive sources
pub fn resolve_key(
    explicit: Option<&str>,
    env: Option<&str>,
    config: &AppConfig,
) -> Option<(String, KeySource)> {
    fn non_blank(key: Option<&str>) -> Option<&str> {
        key.map(str::trim).filter(|key| !key.is_empty())
    }

    if let Some(key) = non_blank(explicit) {
        return Some((key.to_string(), KeySource::Explicit));
    }
    if let Some(key) = non_blank(env) {
        return Some((key.to_string(), KeySource::Environment));
    }
    config
        .api_key()
        .map(|key| (key.to_string(), KeySource::ConfigFile))
}

/// Cached access to the DeepL key
#[derive(Debug)]
pub struct Credentials {
    explicit: Option<String>,
    config_path: Option<PathBuf>,
    allow_prompt: bool,
    cached: Option<(String, KeySource)>,
}

impl Credentials {
    /// Credentials backed by the default config file
    pub fn new(explicit: Option<String>) -> Self {
        Self {
            explicit,
            config_path: default_config_path().ok(),
            allow_prompt: true,
            cached: None,
        }
    }

    /// Use a specific config file
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Enable or disable the interactive prompt
    pub fn allow_prompt(mut self, allow: bool) -> Self {
        self.allow_prompt = allow;
        self
    }

    fn load_config(&self) -> AppConfig {
        self.config_path
            .as_deref()
            .map(AppConfig::load_from)
            .unwrap_or_default()
    }

    /// The key and its source, looking it up on first use
    pub fn get(&mut self) -> Result<(&str, KeySource), CredentialError> {
        if self.cached.is_none() {
            let env = std::env::var(API_KEY_ENV).ok();
            let config = self.load_config();
            let found = match resolve_key(self.explicit.as_deref(), env.as_deref(), &config) {
                Some(found) => found,
                None => (self.prompt()?, KeySource::Prompt),
            };
            debug!("Using DeepL key from {:?}", found.1);
            self.cached = Some(found);
        }

        match &self.cached {
            Some((key, source)) => Ok((key.as_str(), *source)),
            None => Err(CredentialError::Missing),
        }
    }

    /// Forget the cached key so the next `get` looks it up again
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Replace the key and persist it to the config file
    pub fn replace(&mut self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Missing);
        }
        self.save_key(key)?;
        self.explicit = None;
        self.cached = Some((key.to_string(), KeySource::ConfigFile));
        info!("DeepL API key updated");
        Ok(())
    }

    fn save_key(&self, key: &str) -> Result<(), CredentialError> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        let mut config = AppConfig::load_from(&path);
        config.deepl_api_key = Some(key.to_string());
        config.save_to(&path)?;
        Ok(())
    }

    fn prompt(&self) -> Result<String, CredentialError> {
        let stdin = io::stdin();
        if !self.allow_prompt || !stdin.is_terminal() {
            return Err(CredentialError::Missing);
        }

        eprint!("Enter DeepL API key: ");
        io::stderr().flush()?;
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;

        let key = line.trim().to_string();
        if key.is_empty() {
            return Err(CredentialError::Missing);
        }
        if let Err(e) = self.save_key(&key) {
            warn!("Could not save API key: {}", e);
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_with_key(key: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.deepl_api_key = Some(key.to_string());
        config
    }

    #[test]
    fn test_resolve_order() {
        let config = config_with_key("from-config");

        assert_eq!(
            resolve_key(Some("flag"), Some("env"), &config),
            Some(("flag".to_string(), KeySource::Explicit))
        );
        assert_eq!(
            resolve_key(None, Some(" env "), &config),
            Some(("env".to_string(), KeySource::Environment))
        );
        assert_eq!(
            resolve_key(Some(""), Some("  "), &config),
            Some(("from-config".to_string(), KeySource::ConfigFile))
        );
        assert_eq!(resolve_key(None, None, &AppConfig::default()), None);
    }

    #[test]
    fn test_explicit_key_is_cached() {
        let dir = tempdir().unwrap();
        let mut credentials = Credentials::new(Some("flag-key".to_string()))
            .config_path(dir.path().join("config.json"))
            .allow_prompt(false);

        let (key, source) = credentials.get().unwrap();
        assert_eq!(key, "flag-key");
        assert_eq!(source, KeySource::Explicit);
    }

    #[test]
    fn test_replace_persists_and_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut credentials = Credentials::new(Some("old".to_string()))
            .config_path(&path)
            .allow_prompt(false);

        credentials.replace(" new-key ").unwrap();
        assert_eq!(credentials.get().unwrap().0, "new-key");
        assert_eq!(AppConfig::load_from(&path).api_key(), Some("new-key"));

        credentials.invalidate();
        assert!(credentials.cached.is_none());
    }

    #[test]
    fn test_replace_rejects_blank_key() {
        let dir = tempdir().unwrap();
        let mut credentials = Credentials::new(None)
            .config_path(dir.path().join("config.json"))
            .allow_prompt(false);

        assert!(matches!(
            credentials.replace("   "),
            Err(CredentialError::Missing)
        ));
    }
}
