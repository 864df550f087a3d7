//! Configuration types, defaults, loading, and validation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the session credential.
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// LLM provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Session behaviour configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key. Usually left unset here and supplied via `DEEPSEEK_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f64 {
    0.4
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Session behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hard cap on turns before the session is cut off
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Fairness window: every roster member must speak within this many turns
    #[serde(default = "default_fairness_window")]
    pub fairness_window: usize,

    /// Sentinel phrase whose appearance ends the session
    #[serde(default = "default_sentinel")]
    pub sentinel: String,

    /// Path the evaluation report is written to at session end
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

fn default_max_turns() -> usize {
    100
}

fn default_fairness_window() -> usize {
    7
}

fn default_sentinel() -> String {
    "MISSION_ACCOMPLISHED".to_string()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("report.md")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            fairness_window: default_fairness_window(),
            sentinel: default_sentinel(),
            report_path: default_report_path(),
        }
    }
}

impl Config {
    /// Load configuration: explicit path, else the default location, else
    /// built-in defaults. The API key from the environment always wins over
    /// the file so credentials never need to live on disk.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)
                .with_context(|| format!("Failed to load config from {}", p.display()))?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)
                    .with_context(|| format!("Failed to load config from {}", p.display()))?,
                _ => Self::default(),
            },
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.provider.api_key = Some(key);
            }
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config location: `<config dir>/firedrill/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("firedrill").join("config.toml"))
    }

    /// Startup precondition: a credential must be present before any turn
    /// is taken.
    pub fn require_api_key(&self) -> Result<&str> {
        self.provider
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .with_context(|| {
                format!(
                    "{API_KEY_ENV} not found in environment or config file.\n\
                     Set it with: export {API_KEY_ENV}=your_key_here"
                )
            })
    }

    /// Render the config as TOML with the API key masked.
    pub fn display(&self) -> Result<String> {
        let mut masked = self.clone();
        if masked.provider.api_key.is_some() {
            masked.provider.api_key = Some("[REDACTED]".to_string());
        }
        toml::to_string_pretty(&masked).context("Failed to serialize config")
    }
}
