//! Configuration System
//!
//! Layered configuration for the generation service and logging. Sources, lowest to
//! highest precedence: built-in defaults, the global config file, workspace config files,
//! then `AGENTFLOW_*` environment variables.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://agentflow1-production.up.railway.app/chat";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentFlowConfig {
    /// Generation service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which wire protocol the generation service speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// AgentFlow relay: `{messages}` in, `{content}` or `{error}` out
    #[default]
    Relay,
    /// Direct OpenAI-compatible chat completions
    #[serde(rename = "openai")]
    OpenAi,
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub kind: ServiceKind,

    /// Endpoint URL; the kind's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name (openai only)
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Fail before any network call when the credential is missing (always on for openai)
    #[serde(default)]
    pub require_api_key: bool,

    /// Send the field instruction as a system message
    #[serde(default = "default_true")]
    pub system_instruction: bool,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            kind: ServiceKind::default(),
            endpoint: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            require_api_key: false,
            system_instruction: default_true(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Endpoint with the kind's default applied
    pub fn resolved_endpoint(&self) -> String {
        match (&self.endpoint, self.kind) {
            (Some(endpoint), _) if !endpoint.trim().is_empty() => endpoint.trim().to_string(),
            (_, ServiceKind::Relay) => DEFAULT_RELAY_ENDPOINT.to_string(),
            (_, ServiceKind::OpenAi) => DEFAULT_OPENAI_ENDPOINT.to_string(),
        }
    }

    /// Validate service configuration
    pub fn validate(&self) -> Result<(), String> {
        let endpoint = self.resolved_endpoint();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(format!(
                "Endpoint must be an http(s) URL, got '{}'",
                endpoint
            ));
        }

        if self.kind == ServiceKind::OpenAi && self.model.trim().is_empty() {
            return Err("Model cannot be empty for the openai service".to_string());
        }

        if self.api_key_env.trim().is_empty() {
            return Err("api_key_env cannot be empty".to_string());
        }

        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("Timeouts must be greater than zero".to_string());
        }

        Ok(())
    }
}
