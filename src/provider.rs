//! Generation Service
//!
//! Transport to the external language-model service. Two variants are supported: the
//! AgentFlow relay, which accepts `{messages}` and answers with `{content}` or `{error}`,
//! and a direct OpenAI-compatible provider whose completion replies are normalized into
//! the same envelope. Either way the raw body is handed back for validation.

use crate::config::{ServiceConfig, ServiceKind};
use crate::error::ApiError;
use crate::request::{ChatMessage, RequestPayload};
use crate::response::excerpt;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Generation service client trait
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Send a payload and return the raw reply body.
    async fn send(&self, payload: &RequestPayload) -> Result<Value, ApiError>;

    /// Get the service name
    fn service_name(&self) -> &str;

    /// Get the endpoint requests are sent to
    fn endpoint(&self) -> &str;
}

// Helper function to map transport errors to ApiError
fn map_http_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Network(format!("request timed out: {}", error))
    } else if error.is_connect() {
        ApiError::Network(format!("connection failed: {}", error))
    } else if error.is_builder() {
        ApiError::Precondition(format!("invalid request: {}", error))
    } else if let Some(status) = error.status() {
        ApiError::Network(format!("request failed with status {}: {}", status, error))
    } else {
        ApiError::Network(format!("HTTP error: {}", error))
    }
}

fn build_http_client(config: &ServiceConfig) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ApiError::Precondition(format!("Failed to create HTTP client: {}", e)))
}

/// Read a bearer credential from the environment. Empty values count as missing.
fn read_credential(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Decode a reply body.
///
/// JSON bodies are returned whatever the status, so an `{error}` envelope on a 4xx/5xx
/// still reaches the validator. A 2xx non-JSON body is returned as a JSON string and
/// ends up as an unexpected shape; a non-2xx non-JSON body is a transport failure.
async fn read_reply_body(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await.map_err(map_http_error)?;

    if !status.is_success() {
        warn!(status = %status, "Generation service returned an error status");
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Ok(value),
        Err(_) if status.is_success() => Ok(Value::String(text)),
        Err(_) => Err(ApiError::Network(format!(
            "request failed with status {}: {}",
            status,
            excerpt(&text)
        ))),
    }
}

/// AgentFlow relay client
pub struct RelayService {
    client: Client,
    endpoint: String,
    api_key_env: String,
    require_api_key: bool,
}

impl RelayService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_http_client(config)?,
            endpoint: config.resolved_endpoint(),
            api_key_env: config.api_key_env.clone(),
            require_api_key: config.require_api_key,
        })
    }
}

#[async_trait]
impl GenerationService for RelayService {
    async fn send(&self, payload: &RequestPayload) -> Result<Value, ApiError> {
        let api_key = read_credential(&self.api_key_env);
        if api_key.is_none() && self.require_api_key {
            return Err(ApiError::Precondition(format!(
                "environment variable {} is not set",
                self.api_key_env
            )));
        }

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");
        if let Some(api_key) = api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        debug!(endpoint = %self.endpoint, messages = payload.messages.len(), "Posting to relay");
        let response = request.json(payload).send().await.map_err(map_http_error)?;
        read_reply_body(response).await
    }

    fn service_name(&self) -> &str {
        "relay"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Direct OpenAI-compatible provider client
pub struct OpenAiService {
    client: Client,
    model: String,
    base_url: String,
    api_key_env: String,
}

impl OpenAiService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_http_client(config)?,
            model: config.model.clone(),
            base_url: config.resolved_endpoint().trim_end_matches('/').to_string(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    /// Map a chat-completions body onto the relay envelope.
    fn normalize_completion(raw: Value) -> Value {
        if raw.get("error").is_some() {
            return raw;
        }
        match raw
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(content) => json!({ "content": content }),
            None => raw,
        }
    }
}

#[async_trait]
impl GenerationService for OpenAiService {
    async fn send(&self, payload: &RequestPayload) -> Result<Value, ApiError> {
        let api_key = read_credential(&self.api_key_env).ok_or_else(|| {
            ApiError::Precondition(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))
        })?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &payload.messages,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "Posting chat completion");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        read_reply_body(response).await.map(Self::normalize_completion)
    }

    fn service_name(&self) -> &str {
        "openai"
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

/// Factory for creating service clients from configuration
pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create(config: &ServiceConfig) -> Result<Box<dyn GenerationService>, ApiError> {
        config.validate().map_err(ApiError::Precondition)?;
        match config.kind {
            ServiceKind::Relay => Ok(Box::new(RelayService::new(config)?)),
            ServiceKind::OpenAi => Ok(Box::new(OpenAiService::new(config)?)),
        }
    }
}

// Scripted service for testing
#[cfg(test)]
pub struct ScriptedService {
    replies: parking_lot::Mutex<std::collections::VecDeque<Result<Value, ApiError>>>,
    calls: std::sync::atomic::AtomicUsize,
    started: std::sync::Arc<tokio::sync::Notify>,
    hold: Option<std::sync::Arc<tokio::sync::Notify>>,
}

#[cfg(test)]
impl ScriptedService {
    pub fn new(replies: Vec<Result<Value, ApiError>>) -> Self {
        Self {
            replies: parking_lot::Mutex::new(replies.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
            started: std::sync::Arc::new(tokio::sync::Notify::new()),
            hold: None,
        }
    }

    /// Block each call until `release` is notified.
    pub fn held(mut self, release: std::sync::Arc<tokio::sync::Notify>) -> Self {
        self.hold = Some(release);
        self
    }

    pub fn started(&self) -> std::sync::Arc<tokio::sync::Notify> {
        self.started.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl GenerationService for ScriptedService {
    async fn send(&self, _payload: &RequestPayload) -> Result<Value, ApiError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.started.notify_one();
        if let Some(release) = &self.hold {
            release.notified().await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "error": "no scripted reply" })))
    }

    fn service_name(&self) -> &str {
        "scripted"
    }

    fn endpoint(&self) -> &str {
        "scripted://"
    }
}
