//! Response Validator
//!
//! Classifies a raw service reply into an error envelope, a content envelope, or an
//! unexpected shape, and extracts field values from content under the structured-field
//! contract: `content` must be a JSON object keyed by field name.

use crate::error::ApiError;
use crate::output::FieldPatch;
use crate::types::{ErrorKind, Field, RequestMode};
use serde_json::Value;

const EXCERPT_LIMIT: usize = 200;

/// Envelope carried by a reply body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    ErrorEnvelope { message: String },
    ContentEnvelope { raw_text: String },
}

impl ServiceReply {
    /// Recognize a known envelope. `None` means the body matches neither.
    ///
    /// An `error` member wins over `content`. Null, `false`, zero and empty-string
    /// members count as absent.
    pub fn classify(raw: &Value) -> Option<ServiceReply> {
        let object = raw.as_object()?;

        if let Some(error) = object.get("error").filter(|value| is_present(value)) {
            return Some(ServiceReply::ErrorEnvelope {
                message: error_message(error),
            });
        }

        match object.get("content") {
            Some(Value::String(text)) if !text.is_empty() => Some(ServiceReply::ContentEnvelope {
                raw_text: text.clone(),
            }),
            _ => None,
        }
    }
}

/// Result of validating one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success(FieldPatch),
    Failure { kind: ErrorKind, detail: String },
}

impl RequestOutcome {
    pub fn failure(kind: ErrorKind, detail: impl Into<String>) -> Self {
        RequestOutcome::Failure {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<ApiError> for RequestOutcome {
    fn from(err: ApiError) -> Self {
        RequestOutcome::failure(err.kind(), err.detail())
    }
}

/// Stateless validator for service replies.
pub struct ResponseValidator;

impl ResponseValidator {
    pub fn validate(raw: &Value, mode: RequestMode) -> RequestOutcome {
        match ServiceReply::classify(raw) {
            Some(ServiceReply::ErrorEnvelope { message }) => {
                RequestOutcome::failure(ErrorKind::Service, message)
            }
            Some(ServiceReply::ContentEnvelope { raw_text }) => Self::parse_content(&raw_text, mode),
            None => RequestOutcome::failure(ErrorKind::UnexpectedShape, excerpt(&raw.to_string())),
        }
    }

    /// Parse content text into a field patch. Unknown keys and non-string values are dropped.
    pub fn parse_content(raw_text: &str, mode: RequestMode) -> RequestOutcome {
        let parsed: Value = match serde_json::from_str(strip_code_fence(raw_text)) {
            Ok(value) => value,
            Err(err) => {
                return RequestOutcome::failure(
                    ErrorKind::MalformedResponse,
                    format!("content is not valid JSON ({}): {}", err, excerpt(raw_text)),
                )
            }
        };

        let Some(object) = parsed.as_object() else {
            return RequestOutcome::failure(
                ErrorKind::MalformedResponse,
                format!("content is not a JSON object: {}", excerpt(raw_text)),
            );
        };

        let mut patch: FieldPatch = Field::ALL
            .into_iter()
            .filter_map(|field| {
                object
                    .get(field.as_str())
                    .and_then(Value::as_str)
                    .map(|value| (field, value.to_string()))
            })
            .collect();

        match mode {
            RequestMode::Full => RequestOutcome::Success(patch),
            RequestMode::Targeted(target) => match patch.remove(&target) {
                Some(value) => RequestOutcome::Success(FieldPatch::from([(target, value)])),
                None => RequestOutcome::failure(
                    ErrorKind::MalformedResponse,
                    format!("reply did not include field '{}'", target),
                ),
            },
        }
    }
}

/// Truncate text for inclusion in user-facing messages.
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(object) => match object.get("message") {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            _ => error.to_string(),
        },
        other => other.to_string(),
    }
}

// Models often wrap JSON in a ```json fence despite the instruction.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match body.split_once('\n') {
        Some((_language, inner)) => inner.trim(),
        None => body.trim(),
    }
}
