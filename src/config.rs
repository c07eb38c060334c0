use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` keeps the inventory in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub utc_offset: UtcOffset,
    pub allowed_origins: Vec<String>,
    pub recipe: RecipeConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = non_empty_var("DATABASE_URL");
        let utc_offset = match non_empty_var("APP_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)?,
            None => UtcOffset::UTC,
        };
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let recipe = RecipeConfig {
            api_key: non_empty_var("ANTHROPIC_API_KEY"),
            base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".into()),
            model: std::env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".into()),
            max_tokens: std::env::var("ANTHROPIC_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(1024),
            timeout_secs: std::env::var("RECIPE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60),
        };

        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("APP_PORT must be a port number")?
                .unwrap_or(8000),
            utc_offset,
            allowed_origins,
            recipe,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `+09:00`, `-05:30` or `Z`.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid APP_UTC_OFFSET {raw:?}"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
