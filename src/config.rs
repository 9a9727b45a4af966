use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PriceWatchError;

/// Persisted CLI configuration.
///
/// Stored as JSON at `~/.pricewatch/config.json`. Market insertion order is
/// preserved, both in the file and in every snapshot rendered from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gilfoyle_mode: Option<bool>,
    #[serde(default)]
    pub markets: IndexMap<String, f64>,
}

/// Returns the pricewatch home directory (`~/.pricewatch/`).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pricewatch")
}

/// Returns the config file path (`~/.pricewatch/config.json`).
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

impl AppConfig {
    /// Loads the config file, creating an empty one on first use.
    pub fn load(path: &Path) -> Result<Self, PriceWatchError> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PriceWatchError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PriceWatchError::ConfigError(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), PriceWatchError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Both credentials must be present before the watch list can be edited.
    pub fn require_credentials(&self) -> Result<(), PriceWatchError> {
        let key_set = self.key.as_deref().map_or(false, |k| !k.is_empty());
        let secret_set = self.secret.as_deref().map_or(false, |s| !s.is_empty());

        if key_set && secret_set {
            Ok(())
        } else {
            Err(PriceWatchError::ConfigError(
                "API key and secret must be set prior to using the Binance API".into(),
            ))
        }
    }

    pub fn gilfoyle(&self) -> bool {
        self.gilfoyle_mode.unwrap_or(false)
    }
}

/// Normalizes a market symbol from CLI input: trimmed, `/` stripped,
/// uppercased.
pub fn sanitize_market(raw: &str) -> String {
    raw.trim().replace('/', "").to_uppercase()
}
