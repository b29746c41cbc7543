//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;
use crate::reporter::ErrorReporter;
use crate::types::ErrorKind;

/// Map domain/service errors to a string for CLI output.
/// Failed generations already carry their user-facing message; precondition failures
/// caught before any request read the same as those reported by the orchestrator.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Generation { message, .. } => message.clone(),
        other if other.kind() == ErrorKind::Precondition => {
            ErrorReporter::render(ErrorKind::Precondition, &other.detail())
        }
        other => other.to_string(),
    }
}
