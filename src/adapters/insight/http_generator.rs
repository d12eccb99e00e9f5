//! HTTP adapter for the insight generator collaborator.
//!
//! Sends a completed-session snapshot as JSON and expects natural-language
//! commentary back. Response parsing is deliberately thin: the engine treats
//! the collaborator as opaque beyond success or failure.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::models::{InsightConfig, InsightRequest};
use crate::domain::ports::{InsightError, InsightGenerator};

/// Wire request sent to the generator service.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    session: &'a InsightRequest,
}

/// Wire reply expected from the generator service.
#[derive(Debug, Deserialize)]
struct GenerateReply {
    commentary: String,
}

/// HTTP client for the insight generator.
///
/// Uses a pooled `reqwest::Client` with a request timeout taken from the
/// insight config. No retry: a single bounded attempt, then the caller's
/// fallback policy applies.
pub struct HttpInsightGenerator {
    http_client: ReqwestClient,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl HttpInsightGenerator {
    /// Build a generator from config, reading the API key from the
    /// environment variable the config names.
    pub fn from_config(config: &InsightConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).with_context(|| {
            format!("insight API key env var {} is not set", config.api_key_env)
        })?;
        Self::new(config, api_key)
    }

    pub fn new(config: &InsightConfig, api_key: String) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl InsightGenerator for HttpInsightGenerator {
    #[instrument(skip(self, request), fields(session_id = %request.session_id, generation = request.generation))]
    async fn generate(&self, request: &InsightRequest) -> Result<String, InsightError> {
        let body = GenerateRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            session: request,
        };

        let response = self
            .http_client
            .post(format!("{}/v1/insights", self.base_url))
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|e| InsightError::MalformedReply(e.to_string()))?;

        if reply.commentary.trim().is_empty() {
            return Err(InsightError::EmptyReply);
        }

        debug!(chars = reply.commentary.len(), "insight generated");
        Ok(reply.commentary)
    }
}
