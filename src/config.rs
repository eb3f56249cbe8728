//! Configuration loader and validator for the newsletter ads dashboard.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub store: Store,
    pub gate: Gate,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    /// Directory the rendered dashboard is written into.
    pub out_dir: String,
}

/// Hosted record store (PostgREST-style REST surface).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    /// Project base URL, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,
    /// Anonymous API key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Table holding the ad rows.
    pub table: String,
}

/// Static password gate. Not a security boundary; the credential is a
/// plain literal checked client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gate {
    pub password: String,
}

impl Config {
    /// Ensure required directories exist (creates `app.out_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.app.out_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.app.out_dir)
    }

    /// Apply environment overrides for the store credentials. The YAML values
    /// act as defaults; `ADS_STORE_URL` and `ADS_STORE_KEY` win when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ADS_STORE_URL") {
            if !url.trim().is_empty() {
                self.store.url = url;
            }
        }
        if let Ok(key) = std::env::var("ADS_STORE_KEY") {
            if !key.trim().is_empty() {
                self.store.api_key = key;
            }
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.out_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.out_dir must be non-empty"));
    }

    if cfg.store.url.trim().is_empty() {
        return Err(ConfigError::Invalid("store.url must be non-empty"));
    }
    if cfg.store.api_key.trim().is_empty() {
        return Err(ConfigError::Invalid("store.api_key must be non-empty"));
    }
    if cfg.store.table.trim().is_empty() {
        return Err(ConfigError::Invalid("store.table must be non-empty"));
    }

    if cfg.gate.password.is_empty() {
        return Err(ConfigError::Invalid("gate.password must be non-empty"));
    }

    Ok(())
}

/// Returns a canonical example YAML config.
pub fn example() -> &'static str {
    r#"app:
  out_dir: "./html"

store:
  url: "https://YOUR_PROJECT.supabase.co"
  api_key: "YOUR_ANON_KEY"
  table: "newsletter_details"

gate:
  password: "muppet"
"#
}
