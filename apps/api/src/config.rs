use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::LlmProvider;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm_api_key: String,
    pub llm_provider: LlmProvider,
    pub llm_model: String,
    /// Overrides the provider's public endpoint (proxies, local gateways).
    pub llm_base_url: Option<String>,
    pub llm_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_provider = match std::env::var("LLM_PROVIDER") {
            Ok(raw) => LlmProvider::from_str(&raw)?,
            Err(_) => LlmProvider::OpenAi,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| llm_provider.default_model().to_string()),
            llm_provider,
            llm_base_url: std::env::var("LLM_BASE_URL").ok().filter(|s| !s.is_empty()),
            llm_timeout: Duration::from_secs(
                std::env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
