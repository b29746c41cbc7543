//! Error Reporter: the single user-facing message slot.

use crate::types::ErrorKind;

#[derive(Debug, Default, Clone)]
pub struct ErrorReporter {
    message: Option<String>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with the rendered message for a failure.
    pub fn report(&mut self, kind: ErrorKind, detail: &str) {
        self.message = Some(Self::render(kind, detail));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn render(kind: ErrorKind, detail: &str) -> String {
        match kind {
            ErrorKind::Service => format!("AI error: {}", detail),
            ErrorKind::Network => format!("Failed to connect to backend: {}", detail),
            ErrorKind::UnexpectedShape => format!("Unexpected AI response: {}", detail),
            ErrorKind::MalformedResponse => format!("Malformed AI response: {}", detail),
            ErrorKind::Precondition => format!("Service not configured: {}", detail),
            ErrorKind::Validation => format!("Invalid input: {}", detail),
        }
    }
}
