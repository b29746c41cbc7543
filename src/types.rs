//! Core domain types shared across the generation pipeline.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three generated marketing artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Listing,
    Caption,
    Subject,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Listing, Field::Caption, Field::Subject];

    /// Wire name used as the JSON key in service replies.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Listing => "listing",
            Field::Caption => "caption",
            Field::Subject => "subject",
        }
    }

    /// Human-readable label for presentation.
    pub fn label(self) -> &'static str {
        match self {
            Field::Listing => "Listing Description",
            Field::Caption => "Instagram Caption",
            Field::Subject => "Email Subject Line",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "listing" => Ok(Field::Listing),
            "caption" => Ok(Field::Caption),
            "subject" => Ok(Field::Subject),
            other => Err(ApiError::InvalidField(other.to_string())),
        }
    }
}

/// What a request is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "field", rename_all = "lowercase")]
pub enum RequestMode {
    /// All three fields, no target.
    Full,
    /// Only the given field may be taken from the reply.
    Targeted(Field),
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMode::Full => f.write_str("full"),
            RequestMode::Targeted(field) => write!(f, "targeted:{}", field),
        }
    }
}

/// Failure taxonomy for a generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Precondition,
    Network,
    Service,
    MalformedResponse,
    UnexpectedShape,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Network => "network",
            ErrorKind::Service => "service",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::UnexpectedShape => "unexpected_shape",
        };
        f.write_str(name)
    }
}
