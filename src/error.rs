//! Error types for the AgentFlow generation core.

use crate::types::ErrorKind;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown field '{0}' (expected listing, caption or subject)")]
    InvalidField(String),

    /// A generation attempt failed; `message` is the user-facing text.
    #[error("{message}")]
    Generation { kind: ErrorKind, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Place this error in the failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::InvalidField(_) => ErrorKind::Validation,
            ApiError::Precondition(_) | ApiError::ConfigError(_) => ErrorKind::Precondition,
            ApiError::Network(_) | ApiError::Io(_) => ErrorKind::Network,
            ApiError::Service(_) => ErrorKind::Service,
            ApiError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            ApiError::UnexpectedShape(_) => ErrorKind::UnexpectedShape,
            ApiError::Generation { kind, .. } => *kind,
        }
    }

    /// The message without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Validation(d)
            | ApiError::Precondition(d)
            | ApiError::Network(d)
            | ApiError::Service(d)
            | ApiError::MalformedResponse(d)
            | ApiError::UnexpectedShape(d)
            | ApiError::ConfigError(d) => d.clone(),
            ApiError::Generation { message, .. } => message.clone(),
            ApiError::InvalidField(_) => self.to_string(),
            ApiError::Io(err) => err.to_string(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
