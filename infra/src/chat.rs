//! HTTP chat completion client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::error;

use ec_core::services::chat::{ChatCompletionClient, ChatDispatchError, ChatMessage};

use crate::InfrastructureError;

/// Chat completion client configuration.
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// Completion endpoint URL
    pub url: String,
    /// API key for the provider
    pub api_key: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Request timeout in seconds. Completions are slow; the timeout is
    /// generous but explicit, never unbounded.
    pub request_timeout_secs: u64,
}

impl ChatClientConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let url = std::env::var("CHAT_API_URL")
            .map_err(|_| InfrastructureError::Config("CHAT_API_URL not set".to_string()))?;
        let api_key = std::env::var("CHAT_API_KEY")
            .map_err(|_| InfrastructureError::Config("CHAT_API_KEY not set".to_string()))?;

        Ok(Self {
            url,
            api_key,
            model: std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            request_timeout_secs: std::env::var("CHAT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// HTTP client for the upstream completion API.
pub struct HttpChatClient {
    client: reqwest::Client,
    config: ChatClientConfig,
}

impl HttpChatClient {
    /// Create a new client with an explicit request timeout.
    pub fn new(config: ChatClientConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Http(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(ChatClientConfig::from_env()?)
    }
}

#[async_trait]
impl ChatCompletionClient for HttpChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatDispatchError> {
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "model": self.config.model,
                "messages": messages,
            }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion API unreachable");
                ChatDispatchError::Unavailable {
                    detail: e.to_string(),
                }
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(ChatDispatchError::Rejected {
                reason: format!("completion API returned {}", status),
            });
        }
        if !status.is_success() {
            return Err(ChatDispatchError::Unavailable {
                detail: format!("completion API returned {}", status),
            });
        }

        let body: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| ChatDispatchError::Unavailable {
                    detail: format!("malformed completion response: {}", e),
                })?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatDispatchError::Unavailable {
                detail: "completion response contained no choices".to_string(),
            })
    }
}

/// Replies with a canned echo; local development stand-in when no
/// completion API is configured.
pub struct EchoChatClient;

#[async_trait]
impl ChatCompletionClient for EchoChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatDispatchError> {
        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(format!("echo: {}", last))
    }
}

/// Runtime-selected chat completion backend.
pub enum ChatBackend {
    Http(HttpChatClient),
    Echo(EchoChatClient),
}

impl ChatBackend {
    /// Select a backend from the environment.
    ///
    /// Production requires a configured completion API; elsewhere a
    /// missing configuration falls back to the echo client.
    pub fn from_env(environment: ec_shared::config::Environment) -> Result<Self, InfrastructureError> {
        match HttpChatClient::from_env() {
            Ok(client) => Ok(ChatBackend::Http(client)),
            Err(e) if environment.is_production() => Err(e),
            Err(_) => {
                tracing::warn!("completion API not configured, using echo replies");
                Ok(ChatBackend::Echo(EchoChatClient))
            }
        }
    }
}

#[async_trait]
impl ChatCompletionClient for ChatBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatDispatchError> {
        match self {
            ChatBackend::Http(client) => client.complete(messages).await,
            ChatBackend::Echo(echo) => echo.complete(messages).await,
        }
    }
}
