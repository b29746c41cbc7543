//! Request Builder
//!
//! Turns the user's property description and a [`RequestMode`] into the outbound
//! message list. Empty input is rejected here so no network call is ever made for it.

use crate::error::ApiError;
use crate::types::RequestMode;
use serde::{Deserialize, Serialize};

/// Instruction sent with the system role when enabled.
pub const SYSTEM_INSTRUCTION: &str = "You are AgentFlow, a copywriting assistant for real estate agents. \
From the property description provided by the user, write three pieces of marketing copy: \
\"listing\" (a listing description), \"caption\" (an Instagram caption) and \
\"subject\" (an email subject line). Respond with only a JSON object whose keys are \
\"listing\", \"caption\" and \"subject\" and whose values are strings.";

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Outbound request body. The mode travels with the payload but is not serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPayload {
    pub messages: Vec<ChatMessage>,
    #[serde(skip)]
    pub mode: RequestMode,
}

/// Builds request payloads.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    system_instruction: bool,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RequestBuilder {
    /// `system_instruction` selects between a user message paired with the field
    /// instruction and a bare user message relying on the server-side agent.
    pub fn new(system_instruction: bool) -> Self {
        Self { system_instruction }
    }

    /// Build the payload. Targeted requests carry the same messages; only the mode differs.
    pub fn build(&self, text: &str, mode: RequestMode) -> Result<RequestPayload, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation("input text is empty".to_string()));
        }

        let mut messages = Vec::with_capacity(2);
        if self.system_instruction {
            messages.push(ChatMessage::system(SYSTEM_INSTRUCTION));
        }
        messages.push(ChatMessage::user(text));

        Ok(RequestPayload { messages, mode })
    }
}
