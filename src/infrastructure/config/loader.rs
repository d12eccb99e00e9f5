use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::EngineConfig;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Insight base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid insight timeout: {0}ms. Must be positive")]
    InvalidTimeout(u64),

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Unknown session kind in fallback_commentary: {0}")]
    UnknownFallbackKind(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .tandem/config.yaml (project config)
    /// 3. .tandem/local.yaml (project local overrides, optional)
    /// 4. Environment variables (TANDEM_* prefix, highest priority)
    pub fn load() -> Result<EngineConfig> {
        let config: EngineConfig = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::file(".tandem/config.yaml"))
            .merge(Yaml::file(".tandem/local.yaml"))
            .merge(Env::prefixed("TANDEM_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<EngineConfig> {
        let config: EngineConfig = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate a configuration
    pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
        match config.logging.format.as_str() {
            "json" | "pretty" => {}
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
        if config.insight.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if config.insight.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(config.insight.timeout_ms));
        }
        if config.insight.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(config.insight.max_tokens));
        }
        for kind in config.insight.fallback_commentary.keys() {
            if crate::domain::models::SessionKind::from_str(kind).is_none() {
                return Err(ConfigError::UnknownFallbackKind(kind.clone()));
            }
        }
        Ok(())
    }
}
