//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section is optional; anything left out falls back to the built-in
//! defaults, and a missing file means "all defaults".

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::pricing::{DEFAULT_TIERS, MAX_MARGIN_PCT};
use crate::types::StrategyKind;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub defaults: InputDefaults,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body (covers CSV uploads).
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 1024 * 1024,
        }
    }
}

/// Values the input form starts with.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputDefaults {
    pub strategy: StrategyKind,
    pub margin_pct: u32,
    pub tiers: String,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::CostPlus,
            margin_pct: 30,
            tiers: DEFAULT_TIERS.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.defaults.margin_pct > MAX_MARGIN_PCT {
            anyhow::bail!(
                "defaults.margin_pct must be between 0 and {MAX_MARGIN_PCT}, got {}",
                self.defaults.margin_pct
            );
        }
        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("server.max_upload_bytes must be positive");
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
