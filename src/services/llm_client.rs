//! Client for an OpenAI-compatible chat-completion API.
//!
//! The credential and endpoint come from server configuration only; nothing
//! here is ever sent to a browser.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::config::Settings;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope used by OpenAI-compatible providers.
#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Client for the chat-completion provider.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.llm_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(
            base_url = %settings.llm_api_url,
            model = %settings.llm_model,
            "LLM client initialized"
        );

        Ok(Self {
            client,
            base_url: settings.llm_api_url.trim_end_matches('/').to_string(),
            api_key: settings.llm_api_key.clone(),
            model: settings.llm_model.clone(),
            temperature: settings.llm_temperature,
            max_tokens: settings.llm_max_tokens,
        })
    }

    /// Make a POST request to the provider. Every failure, whatever its
    /// cause, is a generation failure; nothing is retried.
    async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
        request_id: Option<&str>,
    ) -> Result<R, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self.client.post(&url).bearer_auth(&self.api_key).json(body);

        if let Some(rid) = request_id {
            req = req.header("x-request-id", rid);
        }

        debug!(url = %url, "LLM provider request");

        let response = req.send().await.map_err(|e| {
            error!(error = %e, "LLM provider request failed");
            ApiError::GenerationFailed(format!("provider unavailable: {}", e))
        })?;

        let status = response.status();

        if status.is_success() {
            response.json::<R>().await.map_err(|e| {
                ApiError::GenerationFailed(format!("invalid provider envelope: {}", e))
            })
        } else {
            let message = response
                .json::<ProviderErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "no error body".to_string());

            Err(ApiError::GenerationFailed(format!(
                "provider returned {}: {}",
                status, message
            )))
        }
    }

    /// Check that the provider answers and accepts our credential.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/models", self.base_url);

        self.client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("LLM provider health check failed")?
            .error_for_status()
            .context("LLM provider unhealthy")?;

        Ok(())
    }

    /// Run a chat completion and return the first choice's message content.
    #[instrument(skip(self, messages), fields(model = %self.model))]
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        request_id: Option<&str>,
    ) -> Result<String, ApiError> {
        let response: ChatCompletionResponse = self
            .post(
                "/chat/completions",
                &ChatCompletionRequest {
                    model: &self.model,
                    messages,
                    temperature: self.temperature,
                    max_tokens: self.max_tokens,
                },
                request_id,
            )
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApiError::GenerationFailed("completion had no content".to_string()))
    }
}
