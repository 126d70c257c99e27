//! Persisted user configuration
//!
//! A small JSON file in `~/.website-translation-tool/config.json` holding
//! the DeepL key and preferred output directory. Unknown keys written by
//! other versions of the tool are preserved on save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Directory under the home directory holding the config file
pub const CONFIG_DIR_NAME: &str = ".website-translation-tool";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error type for config file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory could be determined
    #[error("could not determine the home directory")]
    NoHomeDir,

    /// Reading or writing the file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// User configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Saved DeepL API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepl_api_key: Option<String>,

    /// Preferred directory for generated workbooks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Location of the config file in the user's home directory
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(dirs.home_dir().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl AppConfig {
    /// The saved key, trimmed, if it is non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.deepl_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::load_from(&default_config_path()?))
    }

    /// Load from a path
    ///
    /// A missing, unreadable or malformed file yields the default config.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config file at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Ignoring malformed config {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Save to a path, creating its directory
    ///
    /// On Unix the file is made readable by the owner only.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(io_err)?;
        }

        debug!("Saved config to {}", path.display());
        Ok(())
    }
}
