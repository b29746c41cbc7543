//! AgentFlow: marketing copy generation for real estate listings
//!
//! Turns one free-text property description into a listing description, a social
//! caption and an email subject line by delegating generation to a language-model
//! service. Any single field can be regenerated without disturbing the others.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod provider;
pub mod reporter;
pub mod request;
pub mod response;
pub mod types;

pub use error::ApiError;
pub use orchestrator::{GenerationOrchestrator, OperationReport, OperationStatus, Snapshot};
pub use output::{FieldPatch, OutputState, OutputStore};
pub use types::{ErrorKind, Field, RequestMode};
