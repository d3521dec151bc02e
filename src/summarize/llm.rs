use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{LlmConfig, DEFAULT_API_BASE};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const API_BASE_ENV: &str = "OPENAI_API_BASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One text-generation call. The model is a property of the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Anything that can turn a chat exchange into generated text.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

/// What `config show` reports about the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub api_base: String,
    pub api_key_set: bool,
}

/// Blocking client for an OpenAI-compatible chat completions API.
pub struct LlmClient {
    api_base: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl LlmClient {
    /// Create a client from config, falling back to the environment for the
    /// API key and base URL. Fails when no API key is available at all.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = if !config.api_key.trim().is_empty() {
            config.api_key.trim().to_string()
        } else {
            std::env::var(API_KEY_ENV)
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .with_context(|| {
                    format!(
                        "OpenAI API key is required. Set {} or [llm] api_key in yt-summarizer.toml",
                        API_KEY_ENV
                    )
                })?
        };

        let api_base = if !config.api_base.trim().is_empty() {
            config.api_base.trim().to_string()
        } else {
            std::env::var(API_BASE_ENV)
                .ok()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        };
        let parsed = url::Url::parse(&api_base)
            .with_context(|| format!("Invalid API base URL: {}", api_base))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must use HTTP or HTTPS: {}", api_base);
        }

        if config.model.trim().is_empty() {
            anyhow::bail!("No model configured. Set [llm] model in yt-summarizer.toml or pass --model");
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.trim().to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            api_key_set: !self.api_key.is_empty(),
        }
    }
}

impl TextGenerator for LlmClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::info!("Sending chat completion request to {} ({})", self.api_base, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("Failed to send chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            anyhow::bail!("Chat completion returned HTTP {}: {}", status.as_u16(), error_body);
        }

        let chat_response: ChatResponse = response
            .json()
            .context("Failed to parse chat completion response")?;

        if let Some(usage) = &chat_response.usage {
            tracing::info!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .context("No choices in chat completion response")?;

        if let Some(reason) = &choice.finish_reason {
            if reason != "stop" {
                tracing::warn!("Chat completion finish_reason: {}", reason);
            }
        }

        choice
            .message
            .content
            .context("Chat completion response has no content")
    }
}
