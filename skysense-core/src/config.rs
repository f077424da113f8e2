use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::{
    gateway::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL},
    model::Unit,
};

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "SKYSENSE_API_KEY";

pub const DEFAULT_CITY: &str = "London";

/// Credentials and endpoint for the Gemini backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// default_city = "London"
/// unit = "C"
///
/// [gemini]
/// api_key = "..."
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// City searched when an interactive session starts.
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default)]
    pub unit: Unit,

    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            unit: Unit::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    /// `SKYSENSE_API_KEY` takes precedence over the stored key.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from(&Self::config_file_path()?)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            cfg.apply_api_key_override(key);
        }

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skysense", "skysense")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn apply_api_key_override(&mut self, key: String) {
        let key = key.trim();
        if !key.is_empty() {
            self.gemini.api_key = Some(key.to_string());
        }
    }

    /// Returns the API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn model(&self) -> &str {
        self.gemini.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.gemini.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Default city with surrounding whitespace removed; falls back to
    /// [`DEFAULT_CITY`] when blank.
    pub fn default_city(&self) -> &str {
        match self.default_city.trim() {
            "" => DEFAULT_CITY,
            city => city,
        }
    }
}
