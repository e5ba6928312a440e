use anyhow::{Context, Result};
use std::env;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,
    pub max_body_bytes: usize,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // LLM provider (OpenAI-compatible chat completions)
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_timeout_seconds: u64,

    // Save / notify hand-off
    pub notify_service_url: Option<String>,
    pub notify_service_token: Option<String>,
    pub notify_timeout_seconds: u64,

    // Autocomplete
    pub autocomplete_limit: usize,
    pub autocomplete_extra_destinations: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let max_body_bytes = parse_or("MAX_BODY_BYTES", 1024 * 1024);

        // CORS
        let cors_allow_origins = split_list(
            &env::var("CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        // LLM provider
        let llm_api_url = env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.aimlapi.com/v1".to_string());
        check_url("LLM_API_URL", &llm_api_url)?;
        let llm_api_key = env::var("LLM_API_KEY").context("LLM_API_KEY must be set")?;
        let llm_model = env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let llm_temperature = parse_or("LLM_TEMPERATURE", 0.7);
        let llm_max_tokens = parse_or("LLM_MAX_TOKENS", 2000);
        let llm_timeout_seconds = parse_or("LLM_TIMEOUT_SECONDS", 120); // LLM calls are slow

        // Save / notify
        let notify_service_url = env::var("NOTIFY_SERVICE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        if let Some(url) = &notify_service_url {
            check_url("NOTIFY_SERVICE_URL", url)?;
        }
        let notify_service_token = env::var("NOTIFY_SERVICE_TOKEN")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let notify_timeout_seconds = parse_or("NOTIFY_TIMEOUT_SECONDS", 10);

        // Autocomplete
        let autocomplete_limit = parse_or("AUTOCOMPLETE_LIMIT", 8);
        let autocomplete_extra_destinations =
            split_list(&env::var("AUTOCOMPLETE_EXTRA_DESTINATIONS").unwrap_or_default());

        Ok(Settings {
            env,
            server_addr,
            max_body_bytes,
            cors_allow_origins,
            llm_api_url,
            llm_api_key,
            llm_model,
            llm_temperature,
            llm_max_tokens,
            llm_timeout_seconds,
            notify_service_url,
            notify_service_token,
            notify_timeout_seconds,
            autocomplete_limit,
            autocomplete_extra_destinations,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("{} is not a valid URL", key))?;
    anyhow::ensure!(
        matches!(url.scheme(), "http" | "https"),
        "{} must use http or https",
        key
    );
    Ok(())
}
