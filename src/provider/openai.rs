//! OpenAI-Compatible Provider Implementation
//!
//! Implements the Provider trait for any endpoint that speaks the OpenAI
//! chat completions protocol: DeepSeek, official OpenAI, OpenRouter, local
//! LLMs via LM Studio/Ollama.

use super::error::{ProviderError, Result};
use super::r#trait::Provider;
use super::retry::{retry_with_backoff, RetryConfig};
use super::types::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider for OpenAI-compatible chat-completion APIs.
#[derive(Clone)]
pub struct OpenAIProvider {
    api_key: String,
    base_url: String,
    client: Client,
    default_model: String,
    name: String,
    retry: RetryConfig,
}

impl OpenAIProvider {
    /// Create a provider against a specific chat-completions endpoint.
    pub fn new(api_key: String, base_url: String, default_model: String) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_max_idle_per_host(2)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            base_url,
            client,
            default_model,
            name: "openai-compatible".to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Set provider name (for logging)
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Build request headers
    fn headers(&self) -> Result<reqwest::header::HeaderMap> {
        let mut headers = reqwest::header::HeaderMap::new();

        // Trim whitespace/newlines that may have leaked from the environment
        let clean_key = self.api_key.trim();
        let header_value: reqwest::header::HeaderValue = format!("Bearer {clean_key}")
            .parse()
            .map_err(|_| {
                tracing::error!(
                    "API key contains invalid characters (length={})",
                    clean_key.len()
                );
                ProviderError::InvalidApiKey
            })?;
        headers.insert(reqwest::header::AUTHORIZATION, header_value);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().expect("valid content-type"),
        );

        Ok(headers)
    }

    /// Convert our generic request to the OpenAI wire format.
    fn to_wire_request(&self, request: &ChatRequest) -> WireRequest {
        let mut messages = Vec::new();

        if let Some(ref system) = request.system {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for msg in &request.messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            messages.push(WireMessage {
                role: role.to_string(),
                content: msg.content.clone(),
            });
        }

        WireRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.default_model.clone()),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    /// Convert a wire response to our generic format.
    fn from_wire_response(&self, response: WireResponse) -> Result<ChatResponse> {
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.map(|m| m.content))
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ChatResponse {
            model: response.model,
            text,
            usage: TokenUsage {
                input_tokens: response.usage.prompt_tokens.unwrap_or(0),
                output_tokens: response.usage.completion_tokens.unwrap_or(0),
            },
        })
    }

    /// Handle API error response
    async fn handle_error(&self, response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();

        // Retry-After can be either seconds or an HTTP date; try seconds
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok().and_then(|s| s.parse::<u64>().ok()));

        let message = match response.json::<WireErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => "Unknown error".to_string(),
        };

        if status == 429 {
            let message = match retry_after {
                Some(secs) => format!("{message} (retry after {secs} seconds)"),
                None => format!("{message} (rate limited, please retry later)"),
            };
            ProviderError::RateLimitExceeded(message)
        } else {
            ProviderError::ApiError { status, message }
        }
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let wire_request = self.to_wire_request(&request);

        tracing::info!(
            "{} API request: model={}, messages={}, max_tokens={:?}",
            self.name,
            wire_request.model,
            wire_request.messages.len(),
            wire_request.max_tokens,
        );

        // Retry the entire API call with exponential backoff
        let result = retry_with_backoff(
            || async {
                tracing::debug!("Sending request to {}", self.base_url);
                let response = self
                    .client
                    .post(&self.base_url)
                    .headers(self.headers()?)
                    .json(&wire_request)
                    .send()
                    .await?;

                let status = response.status();
                tracing::debug!("{} API response status: {}", self.name, status);

                if !status.is_success() {
                    return Err(self.handle_error(response).await);
                }

                let wire_response: WireResponse = response
                    .json()
                    .await
                    .map_err(|e| ProviderError::Http(format!("Bad response body: {e}")))?;
                let chat_response = self.from_wire_response(wire_response)?;

                tracing::info!(
                    "{} API response: input_tokens={}, output_tokens={}",
                    self.name,
                    chat_response.usage.input_tokens,
                    chat_response.usage.output_tokens,
                );

                Ok(chat_response)
            },
            &self.retry,
        )
        .await;

        if let Err(ref e) = result {
            tracing::error!("{} API request failed: {}", self.name, e);
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// ─── Wire format ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: Option<WireMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
}
