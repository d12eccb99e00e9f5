use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Main configuration structure for Tandem
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Insight generator configuration
    #[serde(default)]
    pub insight: InsightConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Insight generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InsightConfig {
    /// Base URL of the insight generator service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier passed through to the generator
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Upper bound on one generation call, in milliseconds. A hung downstream
    /// call falls back to canned commentary after this long.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens requested from the generator
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-kind fallback commentary overrides, keyed by session kind
    /// (`check_in`, `journal_prompt`, `quiz`). Built-in defaults apply for
    /// kinds not listed here.
    #[serde(default)]
    pub fallback_commentary: HashMap<String, String>,
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_api_key_env() -> String {
    "TANDEM_INSIGHT_API_KEY".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_max_tokens() -> u32 {
    1024
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            fallback_commentary: HashMap::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.insight.timeout_ms, 10_000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
        assert!(config.insight.fallback_commentary.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.insight.base_url, config.insight.base_url);
    }
}
