use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RecipeConfig;

use super::services::{build_prompt, demo_recipe, Ingredient};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service could not be reached or timed out.
    #[error("network: {0}")]
    Network(String),

    /// The service answered, but not with a usable recipe.
    #[error("upstream: {0}")]
    Upstream(String),
}

/// Turns the current ingredients into recipe text.
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate(&self, ingredients: &[Ingredient]) -> Result<String, GenerationError>;
}

/// Offline fallback used when no API key is configured.
pub struct DemoGenerator;

#[async_trait]
impl RecipeGenerator for DemoGenerator {
    async fn generate(&self, ingredients: &[Ingredient]) -> Result<String, GenerationError> {
        Ok(demo_recipe(ingredients))
    }
}

pub struct AnthropicClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(cfg: &RecipeConfig, api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build recipe http client")?;
        Ok(Self {
            http,
            endpoint: format!("{}/v1/messages", cfg.base_url.trim_end_matches('/')),
            api_key,
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
        })
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

fn first_text(resp: MessagesResponse) -> Option<String> {
    resp.content
        .into_iter()
        .filter(|b| b.kind == "text")
        .find_map(|b| b.text)
        .filter(|t| !t.trim().is_empty())
}

#[async_trait]
impl RecipeGenerator for AnthropicClient {
    async fn generate(&self, ingredients: &[Ingredient]) -> Result<String, GenerationError> {
        let prompt = build_prompt(ingredients);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        debug!(model = %self.model, ingredients = ingredients.len(), "requesting recipe");
        let res = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            warn!(%status, body = %text, "recipe service returned an error");
            return Err(GenerationError::Upstream(format!("status {status}")));
        }

        let parsed: MessagesResponse = res.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Network(e.to_string())
            } else {
                GenerationError::Upstream(format!("malformed response: {e}"))
            }
        })?;

        first_text(parsed).ok_or_else(|| GenerationError::Upstream("empty response".into()))
    }
}
